#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use toz_core::{Field, TozKind, TozProfile, WeightSet, forward, inverse, sanitize};

#[derive(Debug, Arbitrary)]
struct Input {
    field: u8,
    value: f64,
    count: f64,
    // Raw weights; normalized below so they sum to one.
    weights: [u16; 4],
    // Any bit pattern, including subnormals; invalid values become zero.
    unit_total: f64,
    builtin: Option<bool>,
}

fuzz_target!(|input: Input| {
    let field = Field::ALL[usize::from(input.field) % Field::ALL.len()];
    let profile = match input.builtin {
        Some(true) => TozKind::Alt.default_profile(),
        Some(false) => TozKind::Ust.default_profile(),
        None => {
            let sum: f64 = input.weights.iter().map(|&w| f64::from(w)).sum();
            if sum == 0.0 {
                return;
            }
            let w = input.weights.map(|w| f64::from(w) / sum);
            TozProfile::new(
                WeightSet::new(w[0], w[1], w[2], w[3]),
                sanitize(input.unit_total),
            )
        }
    };

    let inv = inverse(field, input.value, &profile.weights, profile.unit_total);
    let fwd = forward(input.count, &profile.weights, profile.unit_total);

    // Post-conditions that must always hold:
    for f in Field::ALL {
        for (name, toz) in [("inverse", &inv.toz), ("forward", &fwd)] {
            let v = toz.get(f);
            assert!(v.is_finite(), "{name}.{f} not finite: {v}");
            assert!(v >= 0.0, "{name}.{f} negative: {v}");
        }
    }
    assert!(inv.implied_unit_count.is_finite());
    assert!(inv.implied_unit_count >= 0.0);
    if profile.unit_total == 0.0 {
        assert_eq!(inv.implied_unit_count, 0.0);
    }
    if field == Field::Total && input.value.is_finite() && input.value > 0.0 {
        assert_eq!(inv.toz.total, input.value);
    }
});
