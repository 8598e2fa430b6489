//! Text and JSON rendering of calculator state.

use serde::Serialize;
use toz_core::{Driver, Field, Inverse, Session, SessionView, Transition, TozKind};

use crate::format::{format_amount, format_count};

const LABEL_WIDTH: usize = 8;
const COLUMN_WIDTH: usize = 12;

/// Two-column table of both breakdowns under a charik count header.
#[must_use]
pub fn render_view(view: &SessionView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Chariks: {}\n", format_count(view.unit_count)));
    out.push_str(&format!(
        "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}\n",
        "",
        TozKind::Alt.title(),
        TozKind::Ust.title()
    ));
    for field in Field::ALL {
        out.push_str(&format!(
            "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}\n",
            field.label(),
            format_amount(view.alt.get(field)),
            format_amount(view.ust.get(field)),
        ));
    }
    out
}

/// Single-column breakdown of one inverse result.
#[must_use]
pub fn render_inverse(kind: TozKind, field: Field, inverse: &Inverse) -> String {
    let mut out = format!("{} from {}:\n", kind.title(), field.label().to_lowercase());
    for f in Field::ALL {
        out.push_str(&format!(
            "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}\n",
            f.label(),
            format_amount(inverse.toz.get(f))
        ));
    }
    out.push_str(&format!(
        "Implied chariks: {}\n",
        format_count(inverse.implied_unit_count)
    ));
    out
}

/// Short remarks about clamping and cross-refresh for a transition.
#[must_use]
pub fn transition_notes(transition: &Transition, session: &Session) -> Vec<String> {
    let mut notes = Vec::new();
    if transition.clamped {
        notes.push(format!(
            "note: charik count {} raised to minimum {}",
            format_count(transition.requested_unit_count),
            format_count(transition.unit_count)
        ));
    }
    if let Driver::Field { kind, .. } = transition.driver
        && !transition.propagated
    {
        notes.push(format!(
            "note: {} not refreshed (parity mode)",
            kind.other().title()
        ));
    }
    if !session.is_consistent() {
        notes.push("note: displayed breakdowns differ from the stored charik count".to_string());
    }
    notes
}

/// JSON payload for one applied message.
#[derive(Debug, Serialize)]
pub struct UpdateReport<'a> {
    pub transition: &'a Transition,
    pub view: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<&'a Inverse>,
}

/// Human-readable report for one applied message.
#[must_use]
pub fn render_update(transition: &Transition, session: &Session) -> String {
    let mut out = render_view(&session.view());
    for note in transition_notes(transition, session) {
        out.push_str(&note);
        out.push('\n');
    }
    out
}
