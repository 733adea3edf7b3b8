//! Input validation for customizer settings.
//!
//! Every raw value that reaches a setting passes through one of three
//! validators before it is stored or read back:
//!
//! - [`validate_boolean`]: strict checkbox coercion
//! - [`validate_enum`]: select-control membership
//! - [`validate_color`]: `#RRGGBB` hex colors
//!
//! None of them can leave a site un-renderable. Booleans and enums always
//! produce a value; a rejected color tells the caller to keep what it had.
//!
//! # Example
//!
//! ```rust
//! use tinct_customize::validate::{validate_boolean, validate_color, ColorValue, RawValue};
//!
//! assert!(validate_boolean(&RawValue::Bool(true)));
//! assert!(!validate_boolean(&RawValue::Int(1)));
//!
//! let accent = validate_color(&RawValue::from("#CD2653")).unwrap();
//! assert_eq!(accent.hex().map(|c| c.as_str()), Some("#CD2653"));
//! assert_eq!(validate_color(&RawValue::from("")).unwrap(), ColorValue::Unset);
//! assert!(validate_color(&RawValue::from("red")).is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgb;

/// An untyped setting value as it arrives from storage or a form post.
///
/// Deserializes from any scalar in YAML or JSON. Integers are tried before
/// floats so `1` stays an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(n) => write!(f, "{}", n),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::Bool(b)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Int(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Str(s)
    }
}

// =============================================================================
// Booleans
// =============================================================================

/// Coerces a checkbox value.
///
/// Only a real boolean `true` is true. Truthy look-alikes (`1`, `"true"`,
/// `"on"`) are false.
pub fn validate_boolean(raw: &RawValue) -> bool {
    matches!(raw, RawValue::Bool(true))
}

// =============================================================================
// Enums
// =============================================================================

/// Reduces a string to canonical key form: ASCII lowercase letters, digits,
/// `_` and `-`. Everything else is dropped.
pub fn sanitize_key(input: &str) -> String {
    input
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// One allowed value of a select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// Canonical stored value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// Ordered set of allowed values for an enum setting.
///
/// Values are canonicalized with [`sanitize_key`] on insertion, so a value
/// read back through [`validate_enum`] always maps to itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Choices(Vec<Choice>);

impl Choices {
    /// Creates an empty choice set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a choice, returning `self` for chaining. A value already present
    /// keeps its position and takes the new label.
    pub fn with(mut self, value: &str, label: &str) -> Self {
        let value = sanitize_key(value);
        match self.0.iter_mut().find(|c| c.value == value) {
            Some(existing) => existing.label = label.to_string(),
            None => self.0.push(Choice {
                value,
                label: label.to_string(),
            }),
        }
        self
    }

    /// Returns true if `value` is one of the allowed values.
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|c| c.value == value)
    }

    /// Iterates choices in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.0.iter()
    }

    /// Iterates the stored values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Choices {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Choices::new(), |choices, (value, label)| {
                choices.with(value, label)
            })
    }
}

/// Normalizes a select value.
///
/// Strings and integers are reduced to key form and returned when they are
/// among `choices`; anything else yields `fallback` in key form. Never fails.
pub fn validate_enum(raw: &RawValue, choices: &Choices, fallback: &str) -> String {
    let key = match raw {
        RawValue::Str(s) => sanitize_key(s),
        RawValue::Int(n) => n.to_string(),
        other => {
            tracing::debug!(value = %other, fallback, "non-text select value, using fallback");
            return sanitize_key(fallback);
        }
    };

    if choices.contains(&key) {
        key
    } else {
        tracing::debug!(value = %raw, fallback, "select value not among choices");
        sanitize_key(fallback)
    }
}

// =============================================================================
// Colors
// =============================================================================

/// A validated `#RRGGBB` color.
///
/// The digits keep the case they were written in, so a stored `#CD2653`
/// renders as `#CD2653`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Parses a strict `#RRGGBB` string (case-insensitive digits).
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#')?;
        is_hex6(digits).then(|| HexColor(s.to_string()))
    }

    /// Parses `RRGGBB` with or without the leading `#`.
    pub fn parse_no_hash(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        is_hex6(digits).then(|| HexColor(format!("#{}", digits)))
    }

    /// Builds a color from components, written with uppercase digits.
    pub fn from_rgb(rgb: Rgb) -> Self {
        HexColor(format!("#{:02X}{:02X}{:02X}", rgb.0, rgb.1, rgb.2))
    }

    /// The color including the leading `#`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six hex digits without `#`.
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }

    /// Decodes the color components.
    pub fn rgb(&self) -> Rgb {
        let d = self.digits();
        // Construction guarantees six ASCII hex digits.
        let channel = |i: usize| u8::from_str_radix(&d[i..i + 2], 16).unwrap_or(0);
        Rgb(channel(0), channel(2), channel(4))
    }
}

fn is_hex6(digits: &str) -> bool {
    digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = ColorRejected;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HexColor::parse(s).ok_or_else(|| ColorRejected {
            value: s.to_string(),
        })
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A stored color setting: a hex color or the "no color" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// A concrete color.
    Hex(HexColor),
    /// No color chosen.
    Unset,
}

impl ColorValue {
    /// The concrete color, if any.
    pub fn hex(&self) -> Option<&HexColor> {
        match self {
            ColorValue::Hex(c) => Some(c),
            ColorValue::Unset => None,
        }
    }
}

impl From<HexColor> for ColorValue {
    fn from(c: HexColor) -> Self {
        ColorValue::Hex(c)
    }
}

/// A color value failed validation. The caller keeps its previous value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a #RRGGBB hex color")]
pub struct ColorRejected {
    /// The rejected input, rendered as text.
    pub value: String,
}

impl ColorRejected {
    fn of(raw: &RawValue) -> Self {
        Self {
            value: raw.to_string(),
        }
    }
}

/// Validates a color setting.
///
/// Accepts `#RRGGBB` and the empty string, which means "no color".
pub fn validate_color(raw: &RawValue) -> Result<ColorValue, ColorRejected> {
    validate_color_with(raw, HexColor::parse)
}

/// Like [`validate_color`], but also accepts the six digits without `#`.
///
/// The host stores the page background color this way.
pub fn validate_color_no_hash(raw: &RawValue) -> Result<ColorValue, ColorRejected> {
    validate_color_with(raw, HexColor::parse_no_hash)
}

fn validate_color_with(
    raw: &RawValue,
    parse: fn(&str) -> Option<HexColor>,
) -> Result<ColorValue, ColorRejected> {
    match raw {
        RawValue::Str(s) if s.is_empty() => Ok(ColorValue::Unset),
        RawValue::Str(s) => parse(s).map(ColorValue::Hex).ok_or_else(|| {
            tracing::debug!(value = %s, "rejected color value");
            ColorRejected::of(raw)
        }),
        other => {
            tracing::debug!(value = %other, "rejected non-text color value");
            Err(ColorRejected::of(other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Boolean tests
    // =========================================================================

    #[test]
    fn test_boolean_only_true_is_true() {
        assert!(validate_boolean(&RawValue::Bool(true)));
        assert!(!validate_boolean(&RawValue::Bool(false)));
    }

    #[test]
    fn test_boolean_truthy_lookalikes_are_false() {
        assert!(!validate_boolean(&RawValue::Int(1)));
        assert!(!validate_boolean(&RawValue::from("true")));
        assert!(!validate_boolean(&RawValue::from("on")));
        assert!(!validate_boolean(&RawValue::Float(1.0)));
        assert!(!validate_boolean(&RawValue::Null));
    }

    // =========================================================================
    // Enum tests
    // =========================================================================

    fn opacity_choices() -> Choices {
        (0..=10)
            .map(|i| (i * 10).to_string())
            .fold(Choices::new(), |c, v| c.with(&v, &format!("{}%", v)))
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("Color-Dodge"), "color-dodge");
        assert_eq!(sanitize_key("soft light!"), "softlight");
        assert_eq!(sanitize_key("héllo_1"), "hllo_1");
        assert_eq!(sanitize_key(""), "");
    }

    #[test]
    fn test_enum_accepts_member() {
        let choices = opacity_choices();
        assert_eq!(validate_enum(&RawValue::from("60"), &choices, "80"), "60");
        assert_eq!(validate_enum(&RawValue::Int(30), &choices, "80"), "30");
    }

    #[test]
    fn test_enum_normalizes_before_lookup() {
        let choices = Choices::new().with("multiply", "Multiply").with("screen", "Screen");
        assert_eq!(
            validate_enum(&RawValue::from("MULTIPLY"), &choices, "screen"),
            "multiply"
        );
    }

    #[test]
    fn test_enum_falls_back_for_non_member() {
        let choices = opacity_choices();
        assert_eq!(validate_enum(&RawValue::from("55"), &choices, "80"), "80");
        assert_eq!(validate_enum(&RawValue::Bool(true), &choices, "80"), "80");
        assert_eq!(validate_enum(&RawValue::Null, &choices, "80"), "80");
        assert_eq!(validate_enum(&RawValue::Float(60.0), &choices, "80"), "80");
    }

    #[test]
    fn test_enum_fallback_is_canonical() {
        let choices = Choices::new().with("multiply", "Multiply");
        let once = validate_enum(&RawValue::from("zzz"), &choices, "Multiply");
        assert_eq!(once, "multiply");
        assert_eq!(validate_enum(&RawValue::from(once.as_str()), &choices, "Multiply"), once);
        assert_eq!(validate_enum(&RawValue::Null, &choices, "Soft Light"), "softlight");
    }

    #[test]
    fn test_choices_canonicalize_and_dedupe() {
        let choices = Choices::new().with("Normal", "Normal").with("normal", "Plain");
        assert_eq!(choices.len(), 1);
        let only = choices.iter().next().unwrap();
        assert_eq!(only.value, "normal");
        assert_eq!(only.label, "Plain");
    }

    // =========================================================================
    // Color tests
    // =========================================================================

    #[test]
    fn test_color_accepts_hex6_any_case() {
        for s in ["#CD2653", "#cd2653", "#Cd2653", "#000000", "#ffffff"] {
            let v = validate_color(&RawValue::from(s)).unwrap();
            assert_eq!(v.hex().unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_color_empty_is_unset() {
        assert_eq!(validate_color(&RawValue::from("")).unwrap(), ColorValue::Unset);
    }

    #[test]
    fn test_color_rejects_malformed() {
        for s in ["#fff", "CD2653", "#CD26531", "#GG2653", "red", " #CD2653", "#CD2653 "] {
            assert!(validate_color(&RawValue::from(s)).is_err(), "{} accepted", s);
        }
        assert!(validate_color(&RawValue::Int(0xCD2653)).is_err());
        assert!(validate_color(&RawValue::Null).is_err());
    }

    #[test]
    fn test_color_no_hash_variant() {
        let v = validate_color_no_hash(&RawValue::from("F5EFE0")).unwrap();
        assert_eq!(v.hex().unwrap().as_str(), "#F5EFE0");
        let v = validate_color_no_hash(&RawValue::from("#F5EFE0")).unwrap();
        assert_eq!(v.hex().unwrap().as_str(), "#F5EFE0");
        assert!(validate_color_no_hash(&RawValue::from("F5EF")).is_err());
    }

    #[test]
    fn test_hex_color_rgb_roundtrip() {
        let c = HexColor::parse("#CD2653").unwrap();
        assert_eq!(c.rgb(), Rgb(205, 38, 83));
        assert_eq!(HexColor::from_rgb(c.rgb()), c);
        assert_eq!(c.digits(), "CD2653");
    }

    #[test]
    fn test_color_rejected_display() {
        let err = validate_color(&RawValue::from("blue")).unwrap_err();
        assert_eq!(err.to_string(), "'blue' is not a #RRGGBB hex color");
    }

    #[test]
    fn test_raw_value_deserializes_from_yaml() {
        let v: RawValue = serde_yaml::from_str("1").unwrap();
        assert_eq!(v, RawValue::Int(1));
        let v: RawValue = serde_yaml::from_str("true").unwrap();
        assert_eq!(v, RawValue::Bool(true));
        let v: RawValue = serde_yaml::from_str("\"#CD2653\"").unwrap();
        assert_eq!(v, RawValue::from("#CD2653"));
        let v: RawValue = serde_yaml::from_str("~").unwrap();
        assert_eq!(v, RawValue::Null);
    }
}
