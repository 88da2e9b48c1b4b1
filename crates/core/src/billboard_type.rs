//! Billboard kinds.
//!
//! The kind of a billboard decides which frame model is loaded and how many
//! display faces it carries. Scene authors pass the kind as a string, so the
//! parse is lenient about case but never invents a kind it does not know.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of billboard geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillboardType {
    /// Two back-to-back faces on a tall pole.
    Double,
    /// Three faces arranged in a triangle.
    Triple,
    /// Four faces arranged in a box.
    Quadruple,
    /// Two back-to-back faces at ground height.
    Panel,
}

/// Error returned when a billboard kind string has no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown billboard type `{0}`")]
pub struct UnknownBillboardType(pub String);

impl BillboardType {
    /// Every known kind, in catalog order.
    pub const ALL: [Self; 4] = [Self::Double, Self::Triple, Self::Quadruple, Self::Panel];

    /// Canonical string key used on the wire and in configs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quadruple => "quadruple",
            Self::Panel => "panel",
        }
    }

    /// Number of display faces on this kind of frame.
    pub const fn face_count(self) -> usize {
        match self {
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quadruple => 4,
            Self::Panel => 2,
        }
    }

    /// Parse a kind, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Result<Self, UnknownBillboardType> {
        let normalized = input.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or(UnknownBillboardType(normalized))
    }
}

impl FromStr for BillboardType {
    type Err = UnknownBillboardType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BillboardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
