use tesoro_types::{ClientId, MovementId};

use crate::error::LedgerError;
use crate::movement::{Movement, NewMovement};

/// Write boundary for the movement store. Movements are append-only.
pub trait MovementWriter: Send + Sync {
    /// Record a new movement, assigning its id and creation sequence.
    fn append(&self, movement: NewMovement) -> Result<Movement, LedgerError>;

    /// Mirror a movement already recorded by the backend of record.
    ///
    /// Fails with `DuplicateMovement` if the id is already present.
    fn import(&self, movement: Movement) -> Result<(), LedgerError>;
}

/// Read boundary for the movement store.
pub trait MovementReader: Send + Sync {
    /// All movements of one client, in store order. Callers own the copy.
    fn movements_for(&self, client: &ClientId) -> Result<Vec<Movement>, LedgerError>;

    fn get(&self, id: &MovementId) -> Result<Option<Movement>, LedgerError>;

    fn clients(&self) -> Result<Vec<ClientId>, LedgerError>;

    fn movement_count(&self, client: &ClientId) -> Result<u64, LedgerError> {
        Ok(self.movements_for(client)?.len() as u64)
    }
}
