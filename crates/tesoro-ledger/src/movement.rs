use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoro_types::{ClientId, MovementId};

use crate::error::LedgerError;

/// Side of the account a movement lands on.
///
/// `Debe` increases what the client owes; `Haber` decreases it. The sign of
/// a movement's effect comes from its kind alone, never from its amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Debit: amount owed by the client (invoice, debit note).
    Debe,
    /// Credit: amount paid or credited to the client.
    Haber,
}

impl MovementKind {
    /// The opposite side, used by compensating movements.
    pub fn opposite(self) -> Self {
        match self {
            Self::Debe => Self::Haber,
            Self::Haber => Self::Debe,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debe => write!(f, "debe"),
            Self::Haber => write!(f, "haber"),
        }
    }
}

/// Business origin of a movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Invoice,
    Payment,
    Check,
    CreditNote,
    DebitNote,
    OpeningBalance,
    Adjustment,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invoice => "invoice",
            Self::Payment => "payment",
            Self::Check => "check",
            Self::CreditNote => "credit_note",
            Self::DebitNote => "debit_note",
            Self::OpeningBalance => "opening_balance",
            Self::Adjustment => "adjustment",
            Self::Other => "other",
        };
        write!(f, "{name}")
    }
}

/// A recorded ledger entry. Immutable once recorded; corrections are new
/// compensating movements (see [`Movement::compensate`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub client_id: ClientId,
    /// Creation order assigned by the movement store. Breaks ties between
    /// movements on the same date.
    pub seq: u64,
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Movement {
    /// Check the amount invariant (`amount >= 0`).
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.amount.is_sign_negative() && !self.amount.is_zero() {
            return Err(LedgerError::InvalidMovement {
                id: self.id,
                reason: format!("amount {} is negative", self.amount),
            });
        }
        Ok(())
    }

    /// Effect on the running balance: `+amount` for debe, `-amount` for haber.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            MovementKind::Debe => self.amount,
            MovementKind::Haber => -self.amount,
        }
    }

    /// Ordering key used by the balance engine: date, then creation order,
    /// then id. Total over any set of distinct movements.
    pub fn sort_key(&self) -> (NaiveDate, u64, MovementId) {
        (self.date, self.seq, self.id)
    }

    /// Build the movement that cancels this one: same amount on the opposite
    /// side, referencing the original.
    pub fn compensate(&self, date: NaiveDate, reason: impl Into<String>) -> NewMovement {
        NewMovement {
            client_id: self.client_id,
            date,
            kind: self.kind.opposite(),
            amount: self.amount,
            category: Category::Adjustment,
            reference: Some(self.id.to_string()),
            notes: Some(reason.into()),
        }
    }
}

/// A movement not yet recorded. The store assigns `id` and `seq`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    pub client_id: ClientId,
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub category: Category,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewMovement {
    pub fn debe(client_id: ClientId, date: NaiveDate, amount: Decimal, category: Category) -> Self {
        Self {
            client_id,
            date,
            kind: MovementKind::Debe,
            amount,
            category,
            reference: None,
            notes: None,
        }
    }

    pub fn haber(
        client_id: ClientId,
        date: NaiveDate,
        amount: Decimal,
        category: Category,
    ) -> Self {
        Self {
            client_id,
            date,
            kind: MovementKind::Haber,
            amount,
            category,
            reference: None,
            notes: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Turn the draft into a recorded movement with the given identity.
    pub fn into_movement(self, id: MovementId, seq: u64) -> Movement {
        Movement {
            id,
            client_id: self.client_id,
            seq,
            date: self.date,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            reference: self.reference,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn movement(kind: MovementKind, amount: Decimal) -> Movement {
        NewMovement {
            client_id: ClientId::new(),
            date: date(2024, 1, 1),
            kind,
            amount,
            category: Category::Invoice,
            reference: None,
            notes: None,
        }
        .into_movement(MovementId::new(), 1)
    }

    #[test]
    fn sign_comes_from_kind() {
        assert_eq!(movement(MovementKind::Debe, dec!(10)).signed_amount(), dec!(10));
        assert_eq!(movement(MovementKind::Haber, dec!(10)).signed_amount(), dec!(-10));
    }

    #[test]
    fn negative_amount_is_invalid() {
        let m = movement(MovementKind::Debe, dec!(-0.01));
        assert!(matches!(
            m.validate(),
            Err(LedgerError::InvalidMovement { id, .. }) if id == m.id
        ));
    }

    #[test]
    fn zero_amount_is_valid() {
        assert!(movement(MovementKind::Haber, Decimal::ZERO).validate().is_ok());
        assert!(movement(MovementKind::Haber, -Decimal::ZERO).validate().is_ok());
    }

    #[test]
    fn compensate_flips_side() {
        let original = movement(MovementKind::Debe, dec!(250));
        let fix = original.compensate(date(2024, 2, 1), "duplicated invoice");
        assert_eq!(fix.kind, MovementKind::Haber);
        assert_eq!(fix.amount, dec!(250));
        assert_eq!(fix.client_id, original.client_id);
        assert_eq!(fix.reference, Some(original.id.to_string()));
        assert_eq!(fix.category, Category::Adjustment);
    }

    #[test]
    fn serde_uses_lowercase_kinds() {
        let json = serde_json::to_string(&MovementKind::Haber).unwrap();
        assert_eq!(json, "\"haber\"");
        let json = serde_json::to_string(&Category::CreditNote).unwrap();
        assert_eq!(json, "\"credit_note\"");
    }
}
