#![forbid(unsafe_code)]

//! Bidirectional charik → toz breakdown calculator.
//!
//! # Role in the workspace
//! `toz-core` owns every piece of numeric logic: the forward solver (unit
//! count to breakdown), the inverse solver (one edited field back to a unit
//! count), and the [`Session`] model that decides which value drives the
//! recomputation after each user action. The `tozcalc` front end only parses
//! input, calls into this crate and renders what it returns.
//!
//! # Primary pieces
//! - [`calc`]: the two pure solvers and their shared input sanitization.
//! - [`toz`]: the [`Toz`] breakdown value and the [`Field`] identifiers.
//! - [`weights`]: weight sets, per-kind profiles and the fixed constants.
//! - [`config`]: policy-as-data loading from TOML or JSON.
//! - [`session`]: Elm-style model/update reconciliation.
//!
//! # Example
//! ```
//! use toz_core::{Field, TozKind, forward, inverse};
//!
//! let alt = TozKind::Alt.default_profile();
//! let toz = forward(2.0, &alt.weights, alt.unit_total);
//! assert_eq!(toz.total, 242.0);
//!
//! let back = inverse(Field::Second, 78.0, &alt.weights, alt.unit_total);
//! assert!((back.toz.total - 200.0).abs() < 1e-9);
//! ```

pub mod calc;
pub mod config;
pub mod session;
pub mod toz;
pub mod weights;

pub use calc::{Inverse, forward, inverse, resolve_total, sanitize};
pub use config::{ConfigError, CrossRefresh, SessionPolicy, TozConfig};
pub use session::{Driver, Msg, Session, SessionView, Transition};
pub use toz::{Field, ParseFieldError, Toz};
pub use weights::{
    ALT_UNIT_TOTAL, ALT_WEIGHTS, ParseKindError, TozKind, TozProfile, UST_UNIT_TOTAL, UST_WEIGHTS,
    WeightSet,
};
