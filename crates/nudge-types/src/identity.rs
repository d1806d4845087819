//! Identity types for Nudge
//!
//! Identity types are strongly typed wrappers around UUIDs to prevent
//! accidental mixing with other identifiers (most importantly, capability
//! tokens). Ids render as bare UUIDs because they travel in share URLs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID types with common implementations
macro_rules! define_id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse from a string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Get the inner UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }
    };
}

define_id_type!(AgreementId, "Unique identifier for a staked agreement");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agreement_id_roundtrip() {
        let id = AgreementId::new();
        let parsed = AgreementId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_agreement_id_rejects_garbage() {
        assert!(AgreementId::parse("not-a-uuid").is_err());
        assert!(AgreementId::parse("").is_err());
    }

    #[test]
    fn test_id_equality() {
        let uuid = Uuid::new_v4();
        let id1 = AgreementId::from_uuid(uuid);
        let id2 = AgreementId::from_uuid(uuid);
        assert_eq!(id1, id2);
    }
}
