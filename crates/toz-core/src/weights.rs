#![forbid(unsafe_code)]

//! Weight sets, per-kind profiles and the fixed calculator constants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calc::{self, Inverse};
use crate::toz::{Field, Toz};

/// Fractions assigned to the four components of a breakdown.
///
/// The built-in sets sum to exactly 1.0; loaded sets are checked by
/// [`TozConfig::validate`](crate::config::TozConfig::validate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub first: f64,
    pub second: f64,
    pub third: f64,
    pub fourth: f64,
}

impl WeightSet {
    #[must_use]
    pub const fn new(first: f64, second: f64, third: f64, fourth: f64) -> Self {
        Self {
            first,
            second,
            third,
            fourth,
        }
    }

    /// Weight of a component field. The total has no weight.
    #[must_use]
    pub const fn weight(&self, field: Field) -> Option<f64> {
        match field {
            Field::First => Some(self.first),
            Field::Second => Some(self.second),
            Field::Third => Some(self.third),
            Field::Fourth => Some(self.fourth),
            Field::Total => None,
        }
    }

    #[must_use]
    pub const fn as_array(&self) -> [f64; 4] {
        [self.first, self.second, self.third, self.fourth]
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

pub const ALT_WEIGHTS: WeightSet = WeightSet::new(0.50, 0.39, 0.06, 0.05);
pub const ALT_UNIT_TOTAL: f64 = 121.0;

pub const UST_WEIGHTS: WeightSet = WeightSet::new(0.30, 0.60, 0.06, 0.04);
pub const UST_UNIT_TOTAL: f64 = 45.0;

/// Weight set plus the total contributed by a single charik.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TozProfile {
    pub weights: WeightSet,
    pub unit_total: f64,
}

impl TozProfile {
    #[must_use]
    pub const fn new(weights: WeightSet, unit_total: f64) -> Self {
        Self {
            weights,
            unit_total,
        }
    }

    /// Forward-solve a breakdown for `unit_count` chariks.
    #[must_use]
    pub fn forward(&self, unit_count: f64) -> Toz {
        calc::forward(unit_count, &self.weights, self.unit_total)
    }

    /// Back-solve from one edited field.
    #[must_use]
    pub fn inverse(&self, field: Field, value: f64) -> Inverse {
        calc::inverse(field, value, &self.weights, self.unit_total)
    }
}

/// The two breakdown kinds: Alt (lower) and Üst (upper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TozKind {
    Alt,
    Ust,
}

impl TozKind {
    pub const ALL: [TozKind; 2] = [TozKind::Alt, TozKind::Ust];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alt => "alt",
            Self::Ust => "ust",
        }
    }

    /// Display title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Alt => "Alt Toz",
            Self::Ust => "Üst Toz",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Alt => Self::Ust,
            Self::Ust => Self::Alt,
        }
    }

    /// Built-in weights and unit total for this kind.
    #[must_use]
    pub const fn default_profile(self) -> TozProfile {
        match self {
            Self::Alt => TozProfile::new(ALT_WEIGHTS, ALT_UNIT_TOTAL),
            Self::Ust => TozProfile::new(UST_WEIGHTS, UST_UNIT_TOTAL),
        }
    }
}

impl fmt::Display for TozKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown toz kind `{input}` (expected alt or ust)")]
pub struct ParseKindError {
    pub input: String,
}

impl FromStr for TozKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "alt" | "lower" | "1" => Ok(Self::Alt),
            "ust" | "üst" | "upper" | "2" => Ok(Self::Ust),
            _ => Err(ParseKindError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_weight_sets_sum_to_one() {
        assert!((ALT_WEIGHTS.sum() - 1.0).abs() < 1e-12);
        assert!((UST_WEIGHTS.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn total_has_no_weight() {
        assert_eq!(ALT_WEIGHTS.weight(Field::Total), None);
        assert_eq!(ALT_WEIGHTS.weight(Field::Second), Some(0.39));
        assert_eq!(UST_WEIGHTS.weight(Field::Fourth), Some(0.04));
    }

    #[test]
    fn kind_parse_accepts_turkish_spelling() {
        assert_eq!("Üst".parse::<TozKind>(), Ok(TozKind::Ust));
        assert_eq!("ust".parse::<TozKind>(), Ok(TozKind::Ust));
        assert_eq!("ALT".parse::<TozKind>(), Ok(TozKind::Alt));
        assert_eq!("lower".parse::<TozKind>(), Ok(TozKind::Alt));
        assert!("middle".parse::<TozKind>().is_err());
    }

    #[test]
    fn other_flips_kind() {
        assert_eq!(TozKind::Alt.other(), TozKind::Ust);
        assert_eq!(TozKind::Ust.other(), TozKind::Alt);
    }

    #[test]
    fn default_profiles_match_constants() {
        let alt = TozKind::Alt.default_profile();
        assert_eq!(alt.weights, ALT_WEIGHTS);
        assert_eq!(alt.unit_total, 121.0);
        let ust = TozKind::Ust.default_profile();
        assert_eq!(ust.weights, UST_WEIGHTS);
        assert_eq!(ust.unit_total, 45.0);
    }

    #[test]
    fn profile_forward_delegates_to_solver() {
        let ust = TozKind::Ust.default_profile();
        let toz = ust.forward(2.0);
        assert_eq!(toz.total, 90.0);
        assert!((toz.second - 54.0).abs() < 1e-9);
    }
}
