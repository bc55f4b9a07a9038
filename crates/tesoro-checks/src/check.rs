use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoro_types::{CheckId, CheckbookId, ClientId};

use crate::checkbook::CheckbookKind;
use crate::error::{CheckError, Result};
use crate::status::CheckStatus;

/// The other party on a check: beneficiary of an own check, issuer of a
/// third-party check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub name: String,
    /// Tax identifier (CUIT/CUIL).
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Drawee bank, for third-party checks.
    #[serde(default)]
    pub bank: Option<String>,
}

impl Counterparty {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tax_id: None,
            bank: None,
        }
    }
}

/// A check ("cheque"). Mutated only through validated status transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub id: CheckId,
    pub checkbook_id: CheckbookId,
    pub number: u64,
    /// Who issued the check: `propia` for own issuance, `terceros` for a
    /// received check. Independent of the checkbook it is filed under.
    pub origin: CheckbookKind,
    pub amount: Decimal,
    pub issue_date: NaiveDate,
    /// Informational. Nothing transitions a check to `vencido` on its own.
    pub due_date: NaiveDate,
    pub status: CheckStatus,
    pub counterparty: Counterparty,
    /// Client account this check settles, if any.
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Caller-supplied data for a new check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDraft {
    pub amount: Decimal,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub counterparty: Counterparty,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckDraft {
    pub fn new(
        amount: Decimal,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        counterparty: Counterparty,
    ) -> Self {
        Self {
            amount,
            issue_date,
            due_date,
            counterparty,
            client_id: None,
            notes: None,
        }
    }

    pub fn for_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// `amount > 0` and `due_date >= issue_date`.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(CheckError::InvalidCheck {
                reason: format!("amount {} must be positive", self.amount),
            });
        }
        if self.due_date < self.issue_date {
            return Err(CheckError::InvalidCheck {
                reason: format!(
                    "due date {} precedes issue date {}",
                    self.due_date, self.issue_date
                ),
            });
        }
        if self.counterparty.name.trim().is_empty() {
            return Err(CheckError::InvalidCheck {
                reason: "counterparty name is empty".into(),
            });
        }
        Ok(())
    }

    /// Build the check in its initial status.
    pub(crate) fn into_check(
        self,
        checkbook_id: CheckbookId,
        number: u64,
        origin: CheckbookKind,
        status: CheckStatus,
    ) -> Check {
        Check {
            id: CheckId::new(),
            checkbook_id,
            number,
            origin,
            amount: self.amount,
            issue_date: self.issue_date,
            due_date: self.due_date,
            status,
            counterparty: self.counterparty,
            client_id: self.client_id,
            notes: self.notes,
        }
    }
}

impl Check {
    /// `true` when the due date plus `grace_days` is before `today`.
    pub fn is_overdue(&self, today: NaiveDate, grace_days: u32) -> bool {
        let limit = self
            .due_date
            .checked_add_days(chrono::Days::new(u64::from(grace_days)))
            .unwrap_or(NaiveDate::MAX);
        limit < today
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn draft(amount: Decimal, issue: NaiveDate, due: NaiveDate) -> CheckDraft {
        CheckDraft::new(amount, issue, due, Counterparty::named("Proveedor SA"))
    }

    #[test]
    fn valid_draft() {
        assert!(draft(dec!(10), date(1, 1), date(1, 1)).validate().is_ok());
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        assert!(draft(dec!(0), date(1, 1), date(1, 2)).validate().is_err());
        assert!(draft(dec!(-3), date(1, 1), date(1, 2)).validate().is_err());
    }

    #[test]
    fn due_before_issue_is_rejected() {
        let err = draft(dec!(10), date(2, 1), date(1, 31)).validate().unwrap_err();
        assert!(matches!(err, CheckError::InvalidCheck { .. }));
    }

    #[test]
    fn blank_counterparty_is_rejected() {
        let mut d = draft(dec!(10), date(1, 1), date(1, 2));
        d.counterparty.name = "  ".into();
        assert!(d.validate().is_err());
    }

    #[test]
    fn overdue_respects_grace() {
        let check = draft(dec!(10), date(1, 1), date(1, 10)).into_check(
            CheckbookId::new(),
            1,
            CheckbookKind::Terceros,
            CheckStatus::Emitido,
        );
        assert!(!check.is_overdue(date(1, 10), 0));
        assert!(check.is_overdue(date(1, 11), 0));
        assert!(!check.is_overdue(date(1, 11), 3));
        assert!(check.is_overdue(date(1, 14), 3));
    }
}
