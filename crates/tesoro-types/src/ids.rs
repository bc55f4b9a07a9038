use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new time-ordered identifier (UUID v7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Short representation (first 8 characters of the UUID).
            pub fn short_id(&self) -> String {
                self.0.to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| TypeError::InvalidId {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.short_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a client account ("cuenta corriente" holder).
    ClientId,
    "client"
);

define_id!(
    /// Identifier of a ledger movement.
    MovementId,
    "movement"
);

define_id!(
    /// Identifier of a checkbook ("chequera").
    CheckbookId,
    "checkbook"
);

define_id!(
    /// Identifier of a check ("cheque").
    CheckId,
    "check"
);

define_id!(
    /// Identifier of a check status audit event.
    EventId,
    "event"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(CheckId::new(), CheckId::new());
        assert_ne!(MovementId::new(), MovementId::new());
    }

    #[test]
    fn short_id_format() {
        let id = ClientId::new();
        assert_eq!(id.short_id().len(), 8);
        assert!(format!("{id:?}").starts_with("ClientId("));
    }

    #[test]
    fn parse_roundtrip() {
        let id = CheckbookId::new();
        let parsed: CheckbookId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "not-a-uuid".parse::<CheckId>().unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidId {
                kind: "check",
                value: "not-a-uuid".into(),
            }
        );
    }

    #[test]
    fn serializes_as_plain_uuid() {
        let uuid = uuid::Uuid::nil();
        let id = EventId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
        let parsed: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
