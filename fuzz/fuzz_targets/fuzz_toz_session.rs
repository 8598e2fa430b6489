#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use toz_core::{CrossRefresh, Field, Msg, Session, TozConfig, TozKind};

#[derive(Debug, Arbitrary)]
enum Action {
    Count(f64),
    Edit { ust: bool, field: u8, value: f64 },
    Reset,
}

fuzz_target!(|input: (bool, Vec<Action>)| {
    let (parity, actions) = input;
    if actions.len() > 256 {
        return;
    }

    let mut config = TozConfig::default();
    if parity {
        config.session.cross_refresh = CrossRefresh::Parity;
    }
    let mut session = Session::with_config(&config);

    for action in actions {
        let msg = match action {
            Action::Count(n) => Msg::SetUnitCount(n),
            Action::Edit { ust, field, value } => Msg::Edit {
                kind: if ust { TozKind::Ust } else { TozKind::Alt },
                field: Field::ALL[usize::from(field) % Field::ALL.len()],
                value,
            },
            Action::Reset => Msg::Reset,
        };
        let transition = session.update(msg);

        assert!(session.unit_count() >= config.session.min_unit_count);
        assert!(session.unit_count().is_finite());
        assert_eq!(transition.unit_count, session.unit_count());
        if matches!(msg, Msg::SetUnitCount(_) | Msg::Reset) {
            assert!(session.is_consistent(), "forward refresh left state inconsistent");
        }
    }
});
