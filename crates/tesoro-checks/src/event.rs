use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tesoro_types::{CheckId, EventId};

use crate::error::{CheckError, Result};
use crate::status::CheckStatus;

/// Append-only audit record of one status change.
///
/// `from` is `None` only for the intake of a third-party check, which
/// enters the lifecycle directly in `emitido`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStatusEvent {
    pub id: EventId,
    pub check_id: CheckId,
    pub date: NaiveDate,
    pub from: Option<CheckStatus>,
    pub to: CheckStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

impl CheckStatusEvent {
    pub fn new(
        check_id: CheckId,
        date: NaiveDate,
        from: Option<CheckStatus>,
        to: CheckStatus,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: EventId::new(),
            check_id,
            date,
            from,
            to,
            reason,
        }
    }

    /// Human-readable one-liner, e.g. `emitido -> cobrado`.
    pub fn summary(&self) -> String {
        match self.from {
            Some(from) => format!("{from} -> {}", self.to),
            None => format!("received as {}", self.to),
        }
    }
}

/// Full status history of one check, rebuilt from the event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckHistory {
    pub check_id: CheckId,
    pub events: Vec<CheckStatusEvent>,
}

impl CheckHistory {
    /// Select the events of `check_id` from `log`, keeping log order, and
    /// verify they form an unbroken chain of allowed transitions.
    pub fn from_events(check_id: CheckId, log: &[CheckStatusEvent]) -> Result<Self> {
        let events: Vec<CheckStatusEvent> = log
            .iter()
            .filter(|e| e.check_id == check_id)
            .cloned()
            .collect();

        let broken = |reason: String| CheckError::BrokenHistory {
            check: check_id,
            reason,
        };

        let mut current: Option<CheckStatus> = None;
        for (index, event) in events.iter().enumerate() {
            if index == 0 {
                match event.from {
                    None | Some(CheckStatus::Disponible) => {}
                    Some(other) => {
                        return Err(broken(format!("history starts in {other}")));
                    }
                }
            } else if event.from != current {
                return Err(broken(format!(
                    "event {} starts from {:?}, previous status was {:?}",
                    event.id, event.from, current
                )));
            }

            if let Some(from) = event.from {
                if !from.can_transition_to(event.to) {
                    return Err(broken(format!(
                        "event {} records disallowed {from} -> {}",
                        event.id, event.to
                    )));
                }
            } else if event.to != CheckStatus::Emitido {
                return Err(broken(format!("intake into {}", event.to)));
            }

            current = Some(event.to);
        }

        Ok(Self { check_id, events })
    }

    /// Status after the last event, `None` for an empty history.
    pub fn current_status(&self) -> Option<CheckStatus> {
        self.events.last().map(|e| e.to)
    }

    /// Statuses visited in order, starting with the initial one.
    pub fn path(&self) -> Vec<CheckStatus> {
        let mut path = Vec::with_capacity(self.events.len() + 1);
        if let Some(first) = self.events.first() {
            if let Some(from) = first.from {
                path.push(from);
            }
        }
        path.extend(self.events.iter().map(|e| e.to));
        path
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn ev(check: CheckId, from: Option<CheckStatus>, to: CheckStatus) -> CheckStatusEvent {
        CheckStatusEvent::new(check, date(1), from, to, None)
    }

    #[test]
    fn rebuilds_interleaved_history() {
        let a = CheckId::new();
        let b = CheckId::new();
        let log = vec![
            ev(a, Some(CheckStatus::Disponible), CheckStatus::Emitido),
            ev(b, None, CheckStatus::Emitido),
            ev(a, Some(CheckStatus::Emitido), CheckStatus::Vencido),
            ev(b, Some(CheckStatus::Emitido), CheckStatus::Rechazado),
            ev(a, Some(CheckStatus::Vencido), CheckStatus::Cobrado),
        ];

        let history = CheckHistory::from_events(a, &log).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.current_status(), Some(CheckStatus::Cobrado));
        assert_eq!(
            history.path(),
            vec![
                CheckStatus::Disponible,
                CheckStatus::Emitido,
                CheckStatus::Vencido,
                CheckStatus::Cobrado,
            ]
        );

        let history = CheckHistory::from_events(b, &log).unwrap();
        assert_eq!(history.path(), vec![CheckStatus::Emitido, CheckStatus::Rechazado]);
    }

    #[test]
    fn gap_in_chain_is_reported() {
        let a = CheckId::new();
        let log = vec![
            ev(a, None, CheckStatus::Emitido),
            ev(a, Some(CheckStatus::Vencido), CheckStatus::Cobrado),
        ];
        assert!(matches!(
            CheckHistory::from_events(a, &log),
            Err(CheckError::BrokenHistory { .. })
        ));
    }

    #[test]
    fn disallowed_step_is_reported() {
        let a = CheckId::new();
        let log = vec![
            ev(a, None, CheckStatus::Emitido),
            ev(a, Some(CheckStatus::Emitido), CheckStatus::Cobrado),
            ev(a, Some(CheckStatus::Cobrado), CheckStatus::Emitido),
        ];
        assert!(CheckHistory::from_events(a, &log).is_err());
    }

    #[test]
    fn unknown_check_has_empty_history() {
        let history = CheckHistory::from_events(CheckId::new(), &[]).unwrap();
        assert!(history.is_empty());
        assert_eq!(history.current_status(), None);
        assert!(history.path().is_empty());
    }

    #[test]
    fn summary_text() {
        let check = CheckId::new();
        assert_eq!(ev(check, None, CheckStatus::Emitido).summary(), "received as emitido");
        assert_eq!(
            ev(check, Some(CheckStatus::Emitido), CheckStatus::Anulado).summary(),
            "emitido -> anulado"
        );
    }
}
