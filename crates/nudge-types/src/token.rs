//! Capability tokens
//!
//! A capability token is an unguessable bearer credential: presenting it
//! identifies the holder as one side of an agreement with no further
//! authentication. Tokens are random v4 UUIDs (122 bits of entropy), generated
//! once at creation and never rotated.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An unguessable per-side bearer credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityToken(Uuid);

impl CapabilityToken {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Check whether a candidate string presents this token.
    ///
    /// The candidate is parsed as a UUID first so hyphenation or case
    /// differences cannot produce a false mismatch. A candidate that is not a
    /// UUID at all matches nothing.
    pub fn matches(&self, candidate: &str) -> bool {
        match Uuid::parse_str(candidate.trim()) {
            Ok(uuid) => uuid == self.0,
            Err(_) => false,
        }
    }
}

impl fmt::Display for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_distinct() {
        // Collision probability is negligible; two draws must differ.
        let a = CapabilityToken::generate();
        let b = CapabilityToken::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_matches_own_string() {
        let token = CapabilityToken::generate();
        assert!(token.matches(&token.to_string()));
        assert!(token.matches(&token.to_string().to_uppercase()));
        assert!(token.matches(&format!("  {}  ", token)));
    }

    #[test]
    fn test_rejects_other_and_garbage() {
        let token = CapabilityToken::generate();
        let other = CapabilityToken::generate();
        assert!(!token.matches(&other.to_string()));
        assert!(!token.matches(""));
        assert!(!token.matches("not-a-token"));
    }
}
