use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a check ("estado").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Own stock, numbered but not yet issued.
    Disponible,
    /// Issued and in circulation, or third-party check in custody.
    Emitido,
    /// Collected.
    Cobrado,
    /// Bounced. A replacement is a new check.
    Rechazado,
    /// Past its due date without collection.
    Vencido,
    /// Voided.
    Anulado,
}

impl CheckStatus {
    pub const ALL: [CheckStatus; 6] = [
        Self::Disponible,
        Self::Emitido,
        Self::Cobrado,
        Self::Rechazado,
        Self::Vencido,
        Self::Anulado,
    ];

    /// Adjacency list of the lifecycle.
    pub fn allowed_targets(self) -> &'static [CheckStatus] {
        match self {
            Self::Disponible => &[Self::Emitido, Self::Anulado],
            Self::Emitido => &[Self::Cobrado, Self::Rechazado, Self::Vencido, Self::Anulado],
            Self::Vencido => &[Self::Cobrado, Self::Anulado],
            Self::Cobrado | Self::Rechazado | Self::Anulado => &[],
        }
    }

    pub fn can_transition_to(self, to: CheckStatus) -> bool {
        self.allowed_targets().contains(&to)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disponible => "disponible",
            Self::Emitido => "emitido",
            Self::Cobrado => "cobrado",
            Self::Rechazado => "rechazado",
            Self::Vencido => "vencido",
            Self::Anulado => "anulado",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown check status: {s}"))
    }
}
