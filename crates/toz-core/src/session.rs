#![forbid(unsafe_code)]

//! Reconciliation model for the calculator state.
//!
//! A [`Session`] owns the authoritative unit count and the two displayed
//! breakdowns. Every user action is a [`Msg`]; [`Session::update`] applies it
//! synchronously and returns a [`Transition`] describing what drove the
//! recomputation. Nothing else mutates the state, so there is never an
//! intermediate inconsistent triple between two messages.
//!
//! # Rules
//! - Count edit: sanitize, clamp to `min_unit_count`, forward both kinds.
//! - Field edit on kind A: inverse-solve A, clamp the implied count and store
//!   it, display A's inverse result verbatim. Kind B is forward-recomputed
//!   from the new count under [`CrossRefresh::Propagate`] and left alone under
//!   [`CrossRefresh::Parity`].
//! - Reset: back to `initial_unit_count`, forward both kinds.
//!
//! Because A shows the inverse result rather than a forward projection of the
//! clamped count, an edit that implies less than the minimum leaves A out of
//! step with the stored count. [`Session::is_consistent`] reports that.

use serde::{Deserialize, Serialize};

use crate::calc::sanitize;
use crate::config::{CrossRefresh, SessionPolicy, TozConfig};
use crate::toz::{Field, Toz};
use crate::weights::{TozKind, TozProfile};

const CONSISTENCY_TOLERANCE: f64 = 1e-9;

/// A discrete user action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Msg {
    /// The unit count was edited directly.
    SetUnitCount(f64),
    /// One field of one breakdown was edited.
    Edit {
        kind: TozKind,
        field: Field,
        value: f64,
    },
    Reset,
}

/// Which value drove a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "driver", rename_all = "snake_case")]
pub enum Driver {
    UnitCount,
    Field { kind: TozKind, field: Field },
    Reset,
}

/// Outcome of one [`Session::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    #[serde(flatten)]
    pub driver: Driver,
    /// Count before clamping: the sanitized edit, or the inverse's implied count.
    pub requested_unit_count: f64,
    /// Count stored after clamping.
    pub unit_count: f64,
    /// True when the minimum raised the requested count.
    pub clamped: bool,
    /// True when the other kind was forward-recomputed by a field edit.
    pub propagated: bool,
}

/// Serializable snapshot of the displayed state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub unit_count: f64,
    pub alt: Toz,
    pub ust: Toz,
    pub consistent: bool,
}

/// Calculator state: unit count plus both displayed breakdowns.
#[derive(Debug, Clone)]
pub struct Session {
    alt_profile: TozProfile,
    ust_profile: TozProfile,
    policy: SessionPolicy,
    unit_count: f64,
    alt: Toz,
    ust: Toz,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Session over the built-in profiles and default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&TozConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &TozConfig) -> Self {
        let mut session = Self {
            alt_profile: config.alt,
            ust_profile: config.ust,
            policy: config.session,
            unit_count: 0.0,
            alt: Toz::ZERO,
            ust: Toz::ZERO,
        };
        session.refresh_all(session.clamp(config.session.initial_unit_count));
        session
    }

    #[must_use]
    pub fn unit_count(&self) -> f64 {
        self.unit_count
    }

    #[must_use]
    pub fn toz(&self, kind: TozKind) -> &Toz {
        match kind {
            TozKind::Alt => &self.alt,
            TozKind::Ust => &self.ust,
        }
    }

    #[must_use]
    pub fn alt(&self) -> &Toz {
        &self.alt
    }

    #[must_use]
    pub fn ust(&self) -> &Toz {
        &self.ust
    }

    #[must_use]
    pub fn profile(&self, kind: TozKind) -> &TozProfile {
        match kind {
            TozKind::Alt => &self.alt_profile,
            TozKind::Ust => &self.ust_profile,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Apply one message.
    pub fn update(&mut self, msg: Msg) -> Transition {
        let transition = match msg {
            Msg::SetUnitCount(raw) => {
                let requested = sanitize(raw);
                let count = self.clamp(requested);
                self.refresh_all(count);
                Transition {
                    driver: Driver::UnitCount,
                    requested_unit_count: requested,
                    unit_count: count,
                    clamped: count != requested,
                    propagated: false,
                }
            }
            Msg::Edit { kind, field, value } => self.apply_edit(kind, field, value),
            Msg::Reset => {
                let requested = self.policy.initial_unit_count;
                let count = self.clamp(requested);
                self.refresh_all(count);
                Transition {
                    driver: Driver::Reset,
                    requested_unit_count: requested,
                    unit_count: count,
                    clamped: count != requested,
                    propagated: false,
                }
            }
        };

        tracing::debug!(
            target: "toz.session",
            driver = ?transition.driver,
            unit_count = transition.unit_count,
            clamped = transition.clamped,
            propagated = transition.propagated,
            "session updated"
        );
        transition
    }

    /// True when each displayed breakdown equals the forward projection of
    /// the stored unit count.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        TozKind::ALL.iter().all(|&kind| {
            let expected = self.profile(kind).forward(self.unit_count);
            self.toz(kind).approx_eq(&expected, CONSISTENCY_TOLERANCE)
        })
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            unit_count: self.unit_count,
            alt: self.alt,
            ust: self.ust,
            consistent: self.is_consistent(),
        }
    }

    fn apply_edit(&mut self, kind: TozKind, field: Field, value: f64) -> Transition {
        let inverse = self.profile(kind).inverse(field, value);
        let requested = sanitize(inverse.implied_unit_count);
        let count = self.clamp(requested);

        self.unit_count = count;
        *self.toz_mut(kind) = inverse.toz;

        let propagated = match self.policy.cross_refresh {
            CrossRefresh::Propagate => {
                let other = kind.other();
                *self.toz_mut(other) = self.profile(other).forward(count);
                true
            }
            CrossRefresh::Parity => false,
        };

        Transition {
            driver: Driver::Field { kind, field },
            requested_unit_count: inverse.implied_unit_count,
            unit_count: count,
            clamped: count != requested,
            propagated,
        }
    }

    fn refresh_all(&mut self, count: f64) {
        self.unit_count = count;
        self.alt = self.alt_profile.forward(count);
        self.ust = self.ust_profile.forward(count);
    }

    fn clamp(&self, count: f64) -> f64 {
        sanitize(count).max(self.policy.min_unit_count)
    }

    fn toz_mut(&mut self, kind: TozKind) -> &mut Toz {
        match kind {
            TozKind::Alt => &mut self.alt,
            TozKind::Ust => &mut self.ust,
        }
    }
}
