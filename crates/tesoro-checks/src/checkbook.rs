use std::fmt;

use serde::{Deserialize, Serialize};
use tesoro_types::CheckbookId;

use crate::error::{CheckError, Result};

/// Who assigns check numbers in a checkbook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckbookKind {
    /// Own checkbook: numbers are allocated sequentially from a range.
    Propia,
    /// Container for checks received from other issuers.
    Terceros,
}

impl fmt::Display for CheckbookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Propia => write!(f, "propia"),
            Self::Terceros => write!(f, "terceros"),
        }
    }
}

/// A checkbook ("chequera").
///
/// For own checkbooks `range_from <= next_number <= range_to + 1`; the
/// checkbook is exhausted once `next_number > range_to`. Third-party
/// checkbooks carry no range and no cursor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkbook {
    pub id: CheckbookId,
    pub kind: CheckbookKind,
    pub bank: String,
    pub holder: String,
    #[serde(default)]
    pub range_from: Option<u64>,
    #[serde(default)]
    pub range_to: Option<u64>,
    #[serde(default)]
    pub next_number: Option<u64>,
    pub active: bool,
    /// Store version, bumped on every persisted change. Used for
    /// compare-and-swap on the cursor.
    #[serde(default)]
    pub version: u64,
}

impl Checkbook {
    /// A fresh own checkbook with its cursor at the start of the range.
    pub fn own(
        bank: impl Into<String>,
        holder: impl Into<String>,
        range_from: u64,
        range_to: u64,
    ) -> Result<Self> {
        let checkbook = Self {
            id: CheckbookId::new(),
            kind: CheckbookKind::Propia,
            bank: bank.into(),
            holder: holder.into(),
            range_from: Some(range_from),
            range_to: Some(range_to),
            next_number: Some(range_from),
            active: true,
            version: 0,
        };
        checkbook.validate()?;
        Ok(checkbook)
    }

    pub fn third_party(bank: impl Into<String>, holder: impl Into<String>) -> Self {
        Self {
            id: CheckbookId::new(),
            kind: CheckbookKind::Terceros,
            bank: bank.into(),
            holder: holder.into(),
            range_from: None,
            range_to: None,
            next_number: None,
            active: true,
            version: 0,
        }
    }

    pub fn is_own(&self) -> bool {
        self.kind == CheckbookKind::Propia
    }

    /// Check the range/cursor invariant for this checkbook's kind.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            CheckbookKind::Propia => {
                let (from, to, next) = self.numbering()?;
                if from > to {
                    return Err(self.invalid(format!("range {from}..={to} is empty")));
                }
                if to == u64::MAX {
                    return Err(self.invalid("range end leaves no room for the cursor".into()));
                }
                if next < from || next > to + 1 {
                    return Err(self.invalid(format!(
                        "next number {next} outside {from}..={}",
                        to + 1
                    )));
                }
                Ok(())
            }
            CheckbookKind::Terceros => {
                if self.range_from.is_some()
                    || self.range_to.is_some()
                    || self.next_number.is_some()
                {
                    return Err(self.invalid("third-party checkbooks own no numbering".into()));
                }
                Ok(())
            }
        }
    }

    /// `(range_from, range_to, next_number)` of an own checkbook.
    pub fn numbering(&self) -> Result<(u64, u64, u64)> {
        match (self.range_from, self.range_to, self.next_number) {
            (Some(from), Some(to), Some(next)) => Ok((from, to, next)),
            _ => Err(self.invalid("own checkbook without a complete range and cursor".into())),
        }
    }

    /// `true` when no further numbers can be allocated.
    pub fn is_exhausted(&self) -> bool {
        match (self.range_to, self.next_number) {
            (Some(to), Some(next)) => next > to,
            _ => false,
        }
    }

    /// Numbers still available for issuance; zero for third-party checkbooks.
    pub fn remaining(&self) -> u64 {
        match (self.range_to, self.next_number) {
            (Some(to), Some(next)) => to.saturating_add(1).saturating_sub(next),
            _ => 0,
        }
    }

    /// Point the checkbook at a new range. The cursor never moves backwards:
    /// it becomes `max(next_number, range_from)`.
    pub fn reconfigure_range(&self, range_from: u64, range_to: u64) -> Result<Self> {
        if !self.is_own() {
            return Err(CheckError::NotApplicable {
                checkbook: self.id,
                kind: self.kind,
            });
        }
        let (_, _, next) = self.numbering()?;
        let updated = Self {
            range_from: Some(range_from),
            range_to: Some(range_to),
            next_number: Some(next.max(range_from)),
            ..self.clone()
        };
        updated.validate()?;
        Ok(updated)
    }

    pub fn deactivate(&self) -> Self {
        Self {
            active: false,
            ..self.clone()
        }
    }

    pub fn activate(&self) -> Self {
        Self {
            active: true,
            ..self.clone()
        }
    }

    fn invalid(&self, reason: String) -> CheckError {
        CheckError::InvalidCheckbook {
            checkbook: self.id,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_checkbook_starts_at_range_start() {
        let cb = Checkbook::own("Banco Nación", "ACME SRL", 100, 149).unwrap();
        assert_eq!(cb.next_number, Some(100));
        assert_eq!(cb.remaining(), 50);
        assert!(!cb.is_exhausted());
    }

    #[test]
    fn empty_range_is_rejected() {
        let err = Checkbook::own("Banco", "Titular", 10, 9).unwrap_err();
        assert!(matches!(err, CheckError::InvalidCheckbook { .. }));
    }

    #[test]
    fn cursor_outside_range_is_invalid() {
        let mut cb = Checkbook::own("Banco", "Titular", 10, 20).unwrap();
        cb.next_number = Some(22);
        assert!(cb.validate().is_err());
        cb.next_number = Some(21);
        assert!(cb.validate().is_ok());
        assert!(cb.is_exhausted());
        assert_eq!(cb.remaining(), 0);
        cb.next_number = Some(9);
        assert!(cb.validate().is_err());
    }

    #[test]
    fn third_party_has_no_numbering() {
        let cb = Checkbook::third_party("Banco Galicia", "Cartera");
        assert!(cb.validate().is_ok());
        assert_eq!(cb.remaining(), 0);
        assert!(!cb.is_exhausted());

        let mut bad = cb.clone();
        bad.next_number = Some(1);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn reconfigure_extends_without_rewinding() {
        let mut cb = Checkbook::own("Banco", "Titular", 1, 5).unwrap();
        cb.next_number = Some(6);
        let extended = cb.reconfigure_range(1, 10).unwrap();
        assert_eq!(extended.next_number, Some(6));
        assert_eq!(extended.remaining(), 5);

        let fresh = cb.reconfigure_range(501, 550).unwrap();
        assert_eq!(fresh.next_number, Some(501));

        // shrinking below the cursor would leave it past range end + 1
        assert!(cb.reconfigure_range(1, 3).is_err());
    }

    #[test]
    fn reconfigure_third_party_is_not_applicable() {
        let cb = Checkbook::third_party("Banco", "Cartera");
        assert!(matches!(
            cb.reconfigure_range(1, 2),
            Err(CheckError::NotApplicable { .. })
        ));
    }

    #[test]
    fn deactivate_roundtrip() {
        let cb = Checkbook::own("Banco", "Titular", 1, 5).unwrap();
        assert!(!cb.deactivate().active);
        assert!(cb.deactivate().activate().active);
    }
}
