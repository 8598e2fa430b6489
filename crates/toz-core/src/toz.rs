#![forbid(unsafe_code)]

//! The breakdown value and the identifiers of its five fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::weights::WeightSet;

/// One of the five editable fields of a [`Toz`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    First,
    Second,
    Third,
    Fourth,
    Total,
}

impl Field {
    /// All fields in display order.
    pub const ALL: [Field; 5] = [
        Field::First,
        Field::Second,
        Field::Third,
        Field::Fourth,
        Field::Total,
    ];

    /// The four weighted components, without the total.
    pub const COMPONENTS: [Field; 4] = [Field::First, Field::Second, Field::Third, Field::Fourth];

    /// Stable lowercase identifier, also accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Total => "total",
        }
    }

    /// Human label used by report renderers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "First",
            Self::Second => "Second",
            Self::Third => "Third",
            Self::Fourth => "Fourth",
            Self::Total => "Total",
        }
    }

    #[must_use]
    pub const fn is_total(self) -> bool {
        matches!(self, Self::Total)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a field name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown toz field `{input}` (expected first, second, third, fourth or total)")]
pub struct ParseFieldError {
    pub input: String,
}

impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "1" => Ok(Self::First),
            "second" | "2" => Ok(Self::Second),
            "third" | "3" => Ok(Self::Third),
            "fourth" | "4" => Ok(Self::Fourth),
            "total" | "t" => Ok(Self::Total),
            _ => Err(ParseFieldError {
                input: s.to_string(),
            }),
        }
    }
}

/// A breakdown: four weighted components and their total.
///
/// Values are only ever derived from a total through a [`WeightSet`], so the
/// components always sum to `total` up to floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Toz {
    pub first: f64,
    pub second: f64,
    pub third: f64,
    pub fourth: f64,
    pub total: f64,
}

impl Toz {
    pub const ZERO: Toz = Toz {
        first: 0.0,
        second: 0.0,
        third: 0.0,
        fourth: 0.0,
        total: 0.0,
    };

    /// Split `total` across the four components of `weights`.
    #[must_use]
    pub fn from_total(total: f64, weights: &WeightSet) -> Self {
        Self {
            first: weights.first * total,
            second: weights.second * total,
            third: weights.third * total,
            fourth: weights.fourth * total,
            total,
        }
    }

    #[must_use]
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::First => self.first,
            Field::Second => self.second,
            Field::Third => self.third,
            Field::Fourth => self.fourth,
            Field::Total => self.total,
        }
    }

    #[must_use]
    pub fn component_sum(&self) -> f64 {
        self.first + self.second + self.third + self.fourth
    }

    /// Field-by-field comparison with a relative tolerance (absolute below 1.0).
    #[must_use]
    pub fn approx_eq(&self, other: &Toz, tolerance: f64) -> bool {
        Field::ALL.iter().all(|&field| {
            let (a, b) = (self.get(field), other.get(field));
            (a - b).abs() <= tolerance * a.abs().max(b.abs()).max(1.0)
        })
    }
}
