use std::collections::HashMap;
use std::sync::RwLock;

use tesoro_types::{ClientId, MovementId};

use crate::error::LedgerError;
use crate::movement::{Movement, NewMovement};
use crate::traits::{MovementReader, MovementWriter};

/// In-memory movement store for tests, local demos, and embedding.
///
/// Mirrors the backend of record: movements are appended once and never
/// edited. Reads hand out copies.
pub struct InMemoryMovementStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    accounts: HashMap<ClientId, Vec<Movement>>,
    index: HashMap<MovementId, (ClientId, usize)>,
    next_seq: u64,
}

impl StoreState {
    fn insert(&mut self, movement: Movement) -> Result<(), LedgerError> {
        if self.index.contains_key(&movement.id) {
            return Err(LedgerError::DuplicateMovement { id: movement.id });
        }
        self.next_seq = self.next_seq.max(movement.seq.saturating_add(1));
        let account = self.accounts.entry(movement.client_id).or_default();
        self.index
            .insert(movement.id, (movement.client_id, account.len()));
        account.push(movement);
        Ok(())
    }
}

impl InMemoryMovementStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState {
                next_seq: 1,
                ..StoreState::default()
            }),
        }
    }

    fn poisoned() -> LedgerError {
        LedgerError::StoreError("movement store lock poisoned".into())
    }
}

impl Default for InMemoryMovementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementWriter for InMemoryMovementStore {
    fn append(&self, movement: NewMovement) -> Result<Movement, LedgerError> {
        let mut state = self.inner.write().map_err(|_| Self::poisoned())?;
        let recorded = movement.into_movement(MovementId::new(), state.next_seq);
        recorded.validate()?;
        state.insert(recorded.clone())?;

        tracing::info!(
            client = %recorded.client_id,
            movement = %recorded.id,
            kind = %recorded.kind,
            amount = %recorded.amount,
            seq = recorded.seq,
            "movement recorded"
        );
        Ok(recorded)
    }

    fn import(&self, movement: Movement) -> Result<(), LedgerError> {
        movement.validate()?;
        let mut state = self.inner.write().map_err(|_| Self::poisoned())?;
        state.insert(movement)
    }
}

impl MovementReader for InMemoryMovementStore {
    fn movements_for(&self, client: &ClientId) -> Result<Vec<Movement>, LedgerError> {
        let state = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(state.accounts.get(client).cloned().unwrap_or_default())
    }

    fn get(&self, id: &MovementId) -> Result<Option<Movement>, LedgerError> {
        let state = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(state
            .index
            .get(id)
            .and_then(|(client, pos)| state.accounts.get(client)?.get(*pos))
            .cloned())
    }

    fn clients(&self) -> Result<Vec<ClientId>, LedgerError> {
        let state = self.inner.read().map_err(|_| Self::poisoned())?;
        let mut clients: Vec<ClientId> = state.accounts.keys().copied().collect();
        clients.sort();
        Ok(clients)
    }

    fn movement_count(&self, client: &ClientId) -> Result<u64, LedgerError> {
        let state = self.inner.read().map_err(|_| Self::poisoned())?;
        Ok(state.accounts.get(client).map_or(0, |a| a.len() as u64))
    }
}
