//! Sides and outcome votes
//!
//! Every agreement has exactly two parties, identified as side A and side B.
//! Each side independently votes on whether the agreed action occurred.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two parties to an agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// The opposite side
    pub fn other(&self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Lenient parse used for the winner designation at creation: `"B"`
    /// selects B, anything else falls back to A. Matches the permissive
    /// handling in the creation endpoint rather than rejecting.
    pub fn parse_lenient(s: &str) -> Side {
        if s.trim() == "B" {
            Side::B
        } else {
            Side::A
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// A side's vote on whether the agreed action occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Done,
    NotDone,
}

impl Outcome {
    /// Strict parse of a submitted vote value
    pub fn parse(s: &str) -> Option<Outcome> {
        match s {
            "done" => Some(Outcome::Done),
            "not_done" => Some(Outcome::NotDone),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done => write!(f, "done"),
            Outcome::NotDone => write!(f, "not_done"),
        }
    }
}
