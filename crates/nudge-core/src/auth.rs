//! Token Authenticator - resolving a bearer token to a side
//!
//! Capability tokens double as identity and authorization: whoever holds a
//! side's link is that side. The trait seam exists so a different scheme
//! (signed tokens, short-lived links) can be substituted without touching the
//! lifecycle engine. "No side" is not an error here: callers decide whether
//! anonymous access is acceptable, and mutating actions never accept it.

use nudge_types::{Agreement, Side};

/// Resolves a candidate token against one agreement's stored tokens
pub trait SideAuthenticator: Send + Sync {
    /// `None` when the token is absent or matches neither side
    fn resolve(&self, agreement: &Agreement, candidate: Option<&str>) -> Option<Side>;
}

/// The v1 scheme: direct comparison against the stored per-side tokens
#[derive(Debug, Default, Clone, Copy)]
pub struct BearerTokenAuthenticator;

impl SideAuthenticator for BearerTokenAuthenticator {
    fn resolve(&self, agreement: &Agreement, candidate: Option<&str>) -> Option<Side> {
        candidate.and_then(|token| agreement.side_of_token(token))
    }
}
