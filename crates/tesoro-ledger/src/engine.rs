use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoro_types::ClientId;

use crate::error::LedgerError;
use crate::movement::{Category, Movement, MovementKind};

/// One row of a balance timeline: the movement and the balance right after it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub movement: Movement,
    pub saldo_acumulado: Decimal,
}

/// Debe/haber totals for one category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub debe: Decimal,
    pub haber: Decimal,
}

impl CategoryTotals {
    /// `debe - haber`, `None` on overflow.
    pub fn net(&self) -> Option<Decimal> {
        self.debe.checked_sub(self.haber)
    }
}

/// Derived, chronologically ordered view of a client's account.
///
/// Positive `saldo_actual` is the amount the client owes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub entries: Vec<SnapshotEntry>,
    pub total_debe: Decimal,
    pub total_haber: Decimal,
    pub saldo_actual: Decimal,
}

impl LedgerSnapshot {
    /// The zero snapshot returned for an empty movement set.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            total_debe: Decimal::ZERO,
            total_haber: Decimal::ZERO,
            saldo_actual: Decimal::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Running balances in order, one per movement.
    pub fn timeline(&self) -> Vec<Decimal> {
        self.entries.iter().map(|e| e.saldo_acumulado).collect()
    }

    /// Date of the most recent movement.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.movement.date)
    }

    pub fn totals_by_category(&self) -> Result<BTreeMap<Category, CategoryTotals>, LedgerError> {
        let mut totals: BTreeMap<Category, CategoryTotals> = BTreeMap::new();
        for entry in &self.entries {
            let movement = &entry.movement;
            let slot = totals.entry(movement.category).or_default();
            let side = match movement.kind {
                MovementKind::Debe => &mut slot.debe,
                MovementKind::Haber => &mut slot.haber,
            };
            *side = side.checked_add(movement.amount).ok_or_else(|| {
                LedgerError::Overflow(format!(
                    "{} total of category {}",
                    movement.kind, movement.category
                ))
            })?;
        }
        Ok(totals)
    }

    /// BLAKE3 digest of the canonical JSON encoding. Two snapshots with the
    /// same fingerprint are bit-identical.
    pub fn fingerprint(&self) -> Result<[u8; 32], LedgerError> {
        let encoded =
            serde_json::to_vec(self).map_err(|e| LedgerError::Serialization(e.to_string()))?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tesoro-snapshot-v1:");
        hasher.update(&encoded);
        Ok(*hasher.finalize().as_bytes())
    }

    /// Hex form of [`Self::fingerprint`], shortened for display.
    pub fn short_fingerprint(&self) -> Result<String, LedgerError> {
        Ok(hex::encode(&self.fingerprint()?[..6]))
    }
}

/// Account statement for a period, continuing from the opening balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub opening_balance: Decimal,
    pub entries: Vec<SnapshotEntry>,
    pub period_debe: Decimal,
    pub period_haber: Decimal,
    pub closing_balance: Decimal,
}

/// Stateless balance computations over movement slices.
pub struct BalanceEngine;

impl BalanceEngine {
    /// Build the balance timeline for one client's movements.
    ///
    /// Input order is irrelevant and the slice is never modified. Movements
    /// are ordered by `(date, seq, id)` on a private copy. Totals or balances
    /// beyond the `Decimal` range are reported as `InvalidMovement`.
    pub fn compute_snapshot(movements: &[Movement]) -> Result<LedgerSnapshot, LedgerError> {
        if movements.is_empty() {
            return Ok(LedgerSnapshot::empty());
        }

        validate_input(movements)?;

        let mut ordered: Vec<&Movement> = movements.iter().collect();
        ordered.sort_by_key(|m| m.sort_key());

        let mut total_debe = Decimal::ZERO;
        let mut total_haber = Decimal::ZERO;
        let mut saldo = Decimal::ZERO;
        let mut entries = Vec::with_capacity(ordered.len());

        for movement in ordered {
            let overflow = || LedgerError::InvalidMovement {
                id: movement.id,
                reason: format!("amount {} overflows running balance", movement.amount),
            };
            match movement.kind {
                MovementKind::Debe => {
                    total_debe = total_debe.checked_add(movement.amount).ok_or_else(overflow)?
                }
                MovementKind::Haber => {
                    total_haber = total_haber.checked_add(movement.amount).ok_or_else(overflow)?
                }
            }
            saldo = saldo.checked_add(movement.signed_amount()).ok_or_else(overflow)?;
            entries.push(SnapshotEntry {
                movement: movement.clone(),
                saldo_acumulado: saldo,
            });
        }

        tracing::debug!(
            movements = entries.len(),
            %total_debe,
            %total_haber,
            saldo_actual = %saldo,
            "computed ledger snapshot"
        );

        Ok(LedgerSnapshot {
            entries,
            total_debe,
            total_haber,
            saldo_actual: saldo,
        })
    }

    /// Statement for the inclusive period `[from, to]`. Either bound may be
    /// open. The opening balance covers every movement dated before `from`.
    pub fn statement(
        movements: &[Movement],
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Statement, LedgerError> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(LedgerError::InvalidPeriod { from, to });
            }
        }

        let snapshot = Self::compute_snapshot(movements)?;

        let mut opening_balance = Decimal::ZERO;
        let mut period_debe = Decimal::ZERO;
        let mut period_haber = Decimal::ZERO;
        let mut entries = Vec::new();

        for entry in snapshot.entries {
            let date = entry.movement.date;
            if from.is_some_and(|f| date < f) {
                opening_balance = entry.saldo_acumulado;
                continue;
            }
            if to.is_some_and(|t| date > t) {
                break;
            }
            let side = match entry.movement.kind {
                MovementKind::Debe => &mut period_debe,
                MovementKind::Haber => &mut period_haber,
            };
            *side = side.checked_add(entry.movement.amount).ok_or_else(|| {
                LedgerError::InvalidMovement {
                    id: entry.movement.id,
                    reason: "amount overflows period total".into(),
                }
            })?;
            entries.push(entry);
        }

        let closing_balance = entries
            .last()
            .map(|e| e.saldo_acumulado)
            .unwrap_or(opening_balance);

        Ok(Statement {
            from,
            to,
            opening_balance,
            entries,
            period_debe,
            period_haber,
            closing_balance,
        })
    }
}

fn validate_input(movements: &[Movement]) -> Result<(), LedgerError> {
    let client: ClientId = movements[0].client_id;
    let mut seen = HashSet::with_capacity(movements.len());

    for movement in movements {
        movement.validate()?;
        if movement.client_id != client {
            return Err(LedgerError::InvalidMovement {
                id: movement.id,
                reason: format!(
                    "belongs to client {}, expected {}",
                    movement.client_id, client
                ),
            });
        }
        if !seen.insert(movement.id) {
            return Err(LedgerError::DuplicateMovement { id: movement.id });
        }
    }

    Ok(())
}
