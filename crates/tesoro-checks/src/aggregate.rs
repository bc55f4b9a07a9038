use chrono::NaiveDate;
use tesoro_types::CheckbookId;

use crate::allocator::NumberAllocator;
use crate::check::{Check, CheckDraft};
use crate::checkbook::{Checkbook, CheckbookKind};
use crate::error::{CheckError, Result};
use crate::event::CheckStatusEvent;
use crate::lifecycle::{CheckLifecycle, Transition};
use crate::status::CheckStatus;

/// Result of issuing an own check: advanced checkbook, the emitted check and
/// its `disponible -> emitido` event. Persist all three together or none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issuance {
    pub checkbook: Checkbook,
    pub check: Check,
    pub event: CheckStatusEvent,
}

/// Result of taking a third-party check into custody.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intake {
    pub check: Check,
    pub event: CheckStatusEvent,
}

/// Entry points per use case, composing numbering and the lifecycle.
pub struct CheckbookAggregate;

impl CheckbookAggregate {
    /// Allocate the next number, build the check in `disponible` and move it
    /// to `emitido` dated on the draft's issue date.
    pub fn issue_own_check(checkbook: &Checkbook, draft: CheckDraft) -> Result<Issuance> {
        draft.validate()?;
        let issue_date = draft.issue_date;

        let allocation = NumberAllocator::allocate_next(checkbook)?;
        let stock = draft.into_check(
            checkbook.id,
            allocation.number,
            CheckbookKind::Propia,
            CheckStatus::Disponible,
        );
        let Transition { check, event } =
            CheckLifecycle::transition(&stock, CheckStatus::Emitido, None, issue_date)?;

        tracing::info!(
            checkbook = %checkbook.id,
            check = %check.id,
            number = check.number,
            amount = %check.amount,
            "own check issued"
        );
        Ok(Issuance {
            checkbook: allocation.checkbook,
            check,
            event,
        })
    }

    /// Register a check received from another issuer. The number is the one
    /// printed on the check; the checkbook cursor is never read or advanced.
    pub fn receive_third_party_check(
        checkbook: &Checkbook,
        number: u64,
        draft: CheckDraft,
    ) -> Result<Intake> {
        draft.validate()?;
        if !checkbook.active {
            return Err(CheckError::Inactive {
                checkbook: checkbook.id,
            });
        }
        if checkbook.kind == CheckbookKind::Propia {
            tracing::warn!(
                checkbook = %checkbook.id,
                number,
                "third-party check filed under an own checkbook"
            );
        }

        let issue_date = draft.issue_date;
        let check = draft.into_check(
            checkbook.id,
            number,
            CheckbookKind::Terceros,
            CheckStatus::Emitido,
        );
        let event = CheckStatusEvent::new(check.id, issue_date, None, CheckStatus::Emitido, None);

        tracing::info!(
            checkbook = %checkbook.id,
            check = %check.id,
            number,
            amount = %check.amount,
            "third-party check received"
        );
        Ok(Intake { check, event })
    }

    /// Change the status of a check in `checkbook_id`. The checkbook cursor
    /// is not involved.
    pub fn change_status(
        checkbook_id: &CheckbookId,
        check: &Check,
        to: CheckStatus,
        reason: Option<String>,
        date: NaiveDate,
    ) -> Result<Transition> {
        if check.checkbook_id != *checkbook_id {
            return Err(CheckError::WrongCheckbook {
                check: check.id,
                expected: *checkbook_id,
                actual: check.checkbook_id,
            });
        }
        CheckLifecycle::transition(check, to, reason, date)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::check::Counterparty;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn draft(amount: Decimal) -> CheckDraft {
        CheckDraft::new(amount, date(1, 2), date(2, 2), Counterparty::named("Proveedor SA"))
    }

    #[test]
    fn five_issuances_then_exhausted() {
        let mut checkbook = Checkbook::own("Banco", "ACME", 1, 5).unwrap();
        let mut numbers = Vec::new();
        for _ in 0..5 {
            let issuance =
                CheckbookAggregate::issue_own_check(&checkbook, draft(dec!(100))).unwrap();
            numbers.push(issuance.check.number);
            checkbook = issuance.checkbook;
        }
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

        let err = CheckbookAggregate::issue_own_check(&checkbook, draft(dec!(100))).unwrap_err();
        assert!(matches!(err, CheckError::RangeExhausted { .. }));
    }

    #[test]
    fn issuance_emits_from_disponible() {
        let checkbook = Checkbook::own("Banco", "ACME", 10, 10).unwrap();
        let issuance = CheckbookAggregate::issue_own_check(&checkbook, draft(dec!(42))).unwrap();

        assert_eq!(issuance.check.number, 10);
        assert_eq!(issuance.checkbook.next_number, Some(11));
        assert_eq!(issuance.check.status, CheckStatus::Emitido);
        assert_eq!(issuance.check.origin, CheckbookKind::Propia);
        assert_eq!(issuance.check.checkbook_id, checkbook.id);
        assert_eq!(issuance.event.from, Some(CheckStatus::Disponible));
        assert_eq!(issuance.event.to, CheckStatus::Emitido);
        assert_eq!(issuance.event.date, date(1, 2));

        assert!(matches!(
            CheckbookAggregate::issue_own_check(&issuance.checkbook, draft(dec!(1))),
            Err(CheckError::RangeExhausted { .. })
        ));
    }

    #[test]
    fn invalid_draft_consumes_no_number() {
        let checkbook = Checkbook::own("Banco", "ACME", 1, 5).unwrap();
        let err = CheckbookAggregate::issue_own_check(&checkbook, draft(dec!(0))).unwrap_err();
        assert!(matches!(err, CheckError::InvalidCheck { .. }));
        assert_eq!(checkbook.next_number, Some(1));
    }

    #[test]
    fn third_party_check_enters_emitted() {
        for checkbook in [
            Checkbook::third_party("Banco", "Cartera"),
            Checkbook::own("Banco", "ACME", 1, 5).unwrap(),
        ] {
            let before = checkbook.clone();
            let intake =
                CheckbookAggregate::receive_third_party_check(&checkbook, 99, draft(dec!(75)))
                    .unwrap();
            assert_eq!(intake.check.number, 99);
            assert_eq!(intake.check.status, CheckStatus::Emitido);
            assert_eq!(intake.check.origin, CheckbookKind::Terceros);
            assert_eq!(intake.event.from, None);
            assert_eq!(checkbook, before);
        }
    }

    #[test]
    fn third_party_numbers_may_repeat() {
        let checkbook = Checkbook::third_party("Banco", "Cartera");
        let a =
            CheckbookAggregate::receive_third_party_check(&checkbook, 7, draft(dec!(1))).unwrap();
        let b =
            CheckbookAggregate::receive_third_party_check(&checkbook, 7, draft(dec!(2))).unwrap();
        assert_ne!(a.check.id, b.check.id);
    }

    #[test]
    fn change_status_checks_ownership() {
        let checkbook = Checkbook::third_party("Banco", "Cartera");
        let intake =
            CheckbookAggregate::receive_third_party_check(&checkbook, 1, draft(dec!(10))).unwrap();

        let other = CheckbookId::new();
        assert!(matches!(
            CheckbookAggregate::change_status(
                &other,
                &intake.check,
                CheckStatus::Cobrado,
                None,
                date(3, 1),
            ),
            Err(CheckError::WrongCheckbook { .. })
        ));

        let t = CheckbookAggregate::change_status(
            &checkbook.id,
            &intake.check,
            CheckStatus::Cobrado,
            None,
            date(3, 1),
        )
        .unwrap();
        assert_eq!(t.check.status, CheckStatus::Cobrado);
    }

    proptest! {
        #[test]
        fn prop_numbers_are_sequential(from in 0u64..1_000_000, size in 1u64..30) {
            let mut checkbook = Checkbook::own("Banco", "ACME", from, from + size - 1).unwrap();
            for expected in from..from + size {
                let issuance =
                    CheckbookAggregate::issue_own_check(&checkbook, draft(dec!(1))).unwrap();
                prop_assert_eq!(issuance.check.number, expected);
                checkbook = issuance.checkbook;
            }
            prop_assert!(checkbook.is_exhausted());
            let exhausted = matches!(
                CheckbookAggregate::issue_own_check(&checkbook, draft(dec!(1))),
                Err(CheckError::RangeExhausted { .. })
            );
            prop_assert!(exhausted);
        }
    }
}
