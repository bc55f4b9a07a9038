use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tesoro_types::CheckbookId;

use crate::check::Check;
use crate::checkbook::Checkbook;
use crate::error::{CheckError, Result};
use crate::status::CheckStatus;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTotals {
    pub count: u64,
    pub amount: Decimal,
}

/// Per-status counts and amounts of the checks in one checkbook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckbookSummary {
    pub checkbook_id: CheckbookId,
    pub remaining_numbers: u64,
    pub by_status: BTreeMap<CheckStatus, StatusTotals>,
}

impl CheckbookSummary {
    /// Checks that belong to other checkbooks are ignored.
    pub fn build(checkbook: &Checkbook, checks: &[Check]) -> Result<Self> {
        let mut by_status: BTreeMap<CheckStatus, StatusTotals> = BTreeMap::new();
        for check in checks.iter().filter(|c| c.checkbook_id == checkbook.id) {
            let slot = by_status.entry(check.status).or_default();
            slot.count += 1;
            slot.amount = slot
                .amount
                .checked_add(check.amount)
                .ok_or_else(|| CheckError::AmountOverflow {
                    checkbook: checkbook.id,
                    what: format!("{} total", check.status),
                })?;
        }
        Ok(Self {
            checkbook_id: checkbook.id,
            remaining_numbers: checkbook.remaining(),
            by_status,
        })
    }

    /// Amount still in circulation (`emitido` plus `vencido`).
    pub fn outstanding(&self) -> Result<Decimal> {
        [CheckStatus::Emitido, CheckStatus::Vencido]
            .iter()
            .filter_map(|s| self.by_status.get(s))
            .try_fold(Decimal::ZERO, |acc, t| {
                acc.checked_add(t.amount)
                    .ok_or_else(|| CheckError::AmountOverflow {
                        checkbook: self.checkbook_id,
                        what: "outstanding amount".into(),
                    })
            })
    }

    pub fn count(&self, status: CheckStatus) -> u64 {
        self.by_status.get(&status).map_or(0, |t| t.count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::aggregate::CheckbookAggregate;
    use crate::check::{CheckDraft, Counterparty};
    use crate::lifecycle::CheckLifecycle;

    #[test]
    fn groups_by_status() {
        let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut checkbook = Checkbook::own("Banco", "ACME", 1, 10).unwrap();
        let mut checks = Vec::new();
        for amount in [dec!(100), dec!(250), dec!(40)] {
            let draft = CheckDraft::new(amount, day, day, Counterparty::named("Proveedor"));
            let issuance = CheckbookAggregate::issue_own_check(&checkbook, draft).unwrap();
            checkbook = issuance.checkbook;
            checks.push(issuance.check);
        }
        checks[1] = CheckLifecycle::transition(&checks[1], CheckStatus::Cobrado, None, day)
            .unwrap()
            .check;

        let summary = CheckbookSummary::build(&checkbook, &checks).unwrap();
        assert_eq!(summary.remaining_numbers, 7);
        assert_eq!(summary.count(CheckStatus::Emitido), 2);
        assert_eq!(summary.count(CheckStatus::Cobrado), 1);
        assert_eq!(summary.count(CheckStatus::Anulado), 0);
        assert_eq!(summary.outstanding().unwrap(), dec!(140));
    }

    #[test]
    fn oversized_totals_are_errors() {
        let day = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let checkbook = Checkbook::third_party("Banco", "Cartera");
        let checks: Vec<Check> = [1, 2]
            .into_iter()
            .map(|number| {
                let draft = CheckDraft::new(Decimal::MAX, day, day, Counterparty::named("Cliente"));
                CheckbookAggregate::receive_third_party_check(&checkbook, number, draft)
                    .unwrap()
                    .check
            })
            .collect();

        assert!(matches!(
            CheckbookSummary::build(&checkbook, &checks),
            Err(CheckError::AmountOverflow { .. })
        ));

        // each status fits on its own, their sum does not
        let mut split = checks.clone();
        split[1] = CheckLifecycle::transition(&split[1], CheckStatus::Vencido, None, day)
            .unwrap()
            .check;
        let summary = CheckbookSummary::build(&checkbook, &split).unwrap();
        assert!(summary.outstanding().is_err());
    }
}
