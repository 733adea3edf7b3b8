//! Property-based tests for validation and derivation using proptest.

use proptest::prelude::*;
use tinct_customize::declare::{
    blend_mode_choices, opacity_choices, BACKGROUND_COLOR, COVER_OVERLAY_BLEND_MODE,
    COVER_OVERLAY_OPACITY, RESERVED_KEYS, RETINA_LOGO,
};
use tinct_customize::{
    derive, derive_cover, project, validate_boolean, validate_color, validate_enum, Choices,
    ColorRegistry, Declarations, RawValue, SettingsError, SettingsSnapshot, SettingsStore,
    StyleContext,
};
use tinct_customize::validate::sanitize_key;

// ============================================================================
// Strategies
// ============================================================================

fn raw_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        Just(RawValue::Null),
        any::<bool>().prop_map(RawValue::Bool),
        any::<i64>().prop_map(RawValue::Int),
        any::<f64>().prop_map(RawValue::Float),
        ".{0,12}".prop_map(RawValue::Str),
    ]
}

fn hex_color() -> impl Strategy<Value = String> {
    "#[0-9A-Fa-f]{6}"
}

fn not_a_color() -> impl Strategy<Value = String> {
    ".{1,10}".prop_filter("must not be #RRGGBB", |s| {
        !(s.len() == 7 && s.starts_with('#') && s[1..].bytes().all(|b| b.is_ascii_hexdigit()))
    })
}

fn choice_set() -> impl Strategy<Value = Choices> {
    prop::collection::vec("[A-Za-z0-9_ -]{1,8}", 0..8)
        .prop_map(|values| values.iter().fold(Choices::new(), |c, v| c.with(v, v)))
}

fn setting_pairs() -> impl Strategy<Value = Vec<(&'static str, RawValue)>> {
    prop::collection::vec(
        (
            prop::sample::select(vec![
                "accent",
                BACKGROUND_COLOR,
                RETINA_LOGO,
                COVER_OVERLAY_OPACITY,
                COVER_OVERLAY_BLEND_MODE,
            ]),
            raw_value(),
        ),
        0..10,
    )
}

fn resolved(pairs: &[(&'static str, RawValue)]) -> SettingsSnapshot {
    let mut store = SettingsStore::new();
    let declarations = Declarations::build(&Default::default(), &store);
    for (key, raw) in pairs {
        let _ = store.set(&declarations, key, raw.clone());
    }
    SettingsSnapshot::resolve(&declarations, &store)
}

// ============================================================================
// Validator properties
// ============================================================================

proptest! {
    /// Only a real boolean true is true.
    #[test]
    fn boolean_true_iff_bool_true(raw in raw_value()) {
        prop_assert_eq!(validate_boolean(&raw), raw == RawValue::Bool(true));
    }

    /// Normalizing a normalized value changes nothing.
    #[test]
    fn enum_is_idempotent(
        raw in raw_value(),
        choices in choice_set(),
        fallback in ".{0,8}",
    ) {
        let once = validate_enum(&raw, &choices, &fallback);
        let twice = validate_enum(&RawValue::Str(once.clone()), &choices, &fallback);
        prop_assert_eq!(once, twice);
    }

    /// The result is always a member or the fallback in key form.
    #[test]
    fn enum_result_is_member_or_fallback(raw in raw_value(), fallback in "[0-9A-Za-z ]{1,4}") {
        let choices = opacity_choices();
        let value = validate_enum(&raw, &choices, &fallback);
        prop_assert!(choices.contains(&value) || value == sanitize_key(&fallback));
    }

    /// Every #RRGGBB string is accepted verbatim.
    #[test]
    fn valid_colors_accepted(hex in hex_color()) {
        let value = validate_color(&RawValue::Str(hex.clone())).unwrap();
        prop_assert_eq!(value.hex().map(|c| c.as_str().to_string()), Some(hex));
    }

    /// Anything else is rejected, and the stored value survives the attempt.
    #[test]
    fn invalid_color_keeps_previous(good in hex_color(), bad in not_a_color()) {
        prop_assert!(validate_color(&RawValue::Str(bad.clone())).is_err());

        let mut store = SettingsStore::new();
        let declarations = Declarations::build(&Default::default(), &store);
        store.set(&declarations, "accent", RawValue::Str(good.clone())).unwrap();

        let result = store.set(&declarations, "accent", RawValue::Str(bad));
        prop_assert!(
            matches!(result, Err(SettingsError::Rejected { .. })),
            "expected rejection, got {:?}",
            result
        );

        let snapshot = SettingsSnapshot::resolve(&declarations, &store);
        let accent = snapshot.accent();
        prop_assert_eq!(accent.as_str(), good.as_str());
    }

    /// Blend modes resolve to one of the sixteen choices whatever is stored.
    #[test]
    fn blend_mode_always_declared(raw in raw_value()) {
        let snapshot = resolved(&[(COVER_OVERLAY_BLEND_MODE, raw)]);
        prop_assert!(blend_mode_choices().contains(&snapshot.cover().blend_mode));
    }
}

// ============================================================================
// Derivation properties
// ============================================================================

proptest! {
    /// Same snapshot, same bytes, in every context.
    #[test]
    fn derive_is_deterministic(pairs in setting_pairs()) {
        let first = resolved(&pairs);
        let second = resolved(&pairs);
        for context in StyleContext::ALL {
            prop_assert_eq!(derive(&first, context), derive(&second, context));
        }
        prop_assert_eq!(derive_cover(&first), derive_cover(&second));
    }

    /// Global stylesheets never carry Cover-only rules.
    #[test]
    fn cover_rules_stay_in_cover(pairs in setting_pairs()) {
        let snapshot = resolved(&pairs);
        for context in StyleContext::ALL {
            let css = derive(&snapshot, context).css_text;
            prop_assert!(!css.contains("opacity-"));
            prop_assert!(!css.contains("blend-mode-"));
        }
        let cover = derive_cover(&snapshot);
        let opacity_class = format!("opacity-{}", snapshot.cover().opacity);
        prop_assert!(cover.contains(&opacity_class));
    }

    /// Palette follows registration order and ends with the background.
    #[test]
    fn palette_order_follows_registry(keys in prop::collection::btree_set("[a-z]{3,8}", 0..5)) {
        let mut registry = ColorRegistry::new();
        let mut expected = vec!["accent".to_string()];
        for key in &keys {
            if key != "accent" && !RESERVED_KEYS.contains(&key.as_str()) {
                registry.register_color(key, "#123456", key, None).unwrap();
                expected.push(key.clone());
            }
        }
        expected.push("background".to_string());

        let store = SettingsStore::new();
        let declarations = Declarations::build(&registry.seal(), &store);
        let palette = project(&SettingsSnapshot::resolve(&declarations, &store));
        let slugs: Vec<String> = palette.color_palette.into_iter().map(|c| c.slug).collect();
        prop_assert_eq!(slugs, expected);
    }
}
