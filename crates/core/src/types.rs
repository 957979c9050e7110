//! Shared domain enums for sentiment readings and trade records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a label does not name a known variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized {kind} label: '{label}'")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub label: String,
}

/// Fear & Greed classification label.
///
/// Variants are declared in index order, so `Ord` sorts from Extreme Fear to Extreme Greed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

impl Classification {
    /// Every classification in the fixed order used by all breakdowns and chart axes.
    pub const ALL: [Classification; 5] = [
        Classification::ExtremeFear,
        Classification::Fear,
        Classification::Neutral,
        Classification::Greed,
        Classification::ExtremeGreed,
    ];

    /// Returns the label as it appears in the index data.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::ExtremeFear => "Extreme Fear",
            Classification::Fear => "Fear",
            Classification::Neutral => "Neutral",
            Classification::Greed => "Greed",
            Classification::ExtremeGreed => "Extreme Greed",
        }
    }

    /// Position in [`Classification::ALL`].
    #[must_use]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for Classification {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Classification::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLabelError {
                kind: "classification",
                label: s.to_string(),
            })
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade side as recorded by the exchange export.
///
/// `Other` stands in for any label that is neither BUY nor SELL; such trades
/// stay in every aggregate and count as not-BUY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
    Other,
}

impl Side {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
            Side::Other => "OTHER",
        }
    }

    /// Parses a side label, mapping anything unrecognised to [`Side::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Side::Other)
    }
}

impl FromStr for Side {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            _ => Err(ParseLabelError {
                kind: "side",
                label: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
