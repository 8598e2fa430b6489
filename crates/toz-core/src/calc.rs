#![forbid(unsafe_code)]

//! Forward and inverse breakdown solvers.
//!
//! Both solvers are total functions: every input, including NaN, infinities
//! and negative numbers, produces a finite result. Invalid values degrade to
//! zero instead of raising an error, which keeps a live-editing form usable
//! while the user is still typing.
//!
//! Clamping the unit count to a minimum is *not* done here; that belongs to
//! the [`Session`](crate::session::Session) policy.

use serde::{Deserialize, Serialize};

use crate::toz::{Field, Toz};
use crate::weights::WeightSet;

/// Result of back-solving one edited field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inverse {
    /// Breakdown recomputed from the resolved total with the full weight set.
    pub toz: Toz,
    /// Unclamped unit count implied by the resolved total.
    pub implied_unit_count: f64,
}

/// Map NaN, infinities, negatives and negative zero to `0.0`.
#[inline]
#[must_use]
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Breakdown for `unit_count` units.
///
/// The count is sanitized for this computation only; callers keep whatever
/// value they stored.
///
/// A product that overflows to infinity degrades to [`Toz::ZERO`]. This is a
/// deliberate exception to `total == unit_total * unit_count`, which only
/// holds while that product is finite.
#[must_use]
pub fn forward(unit_count: f64, weights: &WeightSet, unit_total: f64) -> Toz {
    let count = sanitize(unit_count);
    if count != unit_count {
        tracing::debug!(
            target: "toz.calc",
            raw = unit_count,
            "forward unit count sanitized to zero"
        );
    }
    let total = unit_total * count;
    if total.is_finite() {
        Toz::from_total(total, weights)
    } else {
        Toz::ZERO
    }
}

/// Total implied by setting `field` to an already sanitized `value`.
///
/// A zero weight resolves to a zero total rather than dividing by zero, and
/// a quotient that overflows to infinity resolves to zero as well.
#[must_use]
pub fn resolve_total(field: Field, value: f64, weights: &WeightSet) -> f64 {
    let total = match weights.weight(field) {
        None => value,
        Some(weight) if weight == 0.0 => 0.0,
        Some(weight) => value / weight,
    };
    if total.is_finite() { total } else { 0.0 }
}

/// Back-solve the breakdown and unit count from one edited field.
///
/// An implied count that overflows to infinity (a tiny `unit_total`) is
/// reported as zero.
#[must_use]
pub fn inverse(field: Field, value: f64, weights: &WeightSet, unit_total: f64) -> Inverse {
    let sanitized = sanitize(value);
    if sanitized != value {
        tracing::debug!(
            target: "toz.calc",
            field = %field,
            raw = value,
            "inverse value sanitized to zero"
        );
    }

    let total = resolve_total(field, sanitized, weights);
    let implied_unit_count = if unit_total == 0.0 {
        0.0
    } else {
        let count = total / unit_total;
        if count.is_finite() { count } else { 0.0 }
    };

    tracing::trace!(
        target: "toz.calc",
        field = %field,
        total,
        implied_unit_count,
        "inverse resolved"
    );

    Inverse {
        toz: Toz::from_total(total, weights),
        implied_unit_count,
    }
}
