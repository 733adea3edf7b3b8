//! Settings storage boundary and resolved snapshots.
//!
//! The core never reaches into ambient state for a setting value. Reads go
//! through a [`SettingsSource`]; writes go through a [`SettingsStore`], which
//! is where rejected input is turned away. A [`SettingsSnapshot`] resolves
//! every declaration once and is the only input the stylesheet deriver and
//! palette projector see.
//!
//! ```rust
//! use tinct_customize::declare::{Declarations, COVER_OVERLAY_OPACITY};
//! use tinct_customize::registry::ColorOptions;
//! use tinct_customize::settings::{SettingsSnapshot, SettingsStore};
//! use tinct_customize::validate::RawValue;
//!
//! let mut store = SettingsStore::new();
//! let declarations = Declarations::build(&ColorOptions::default(), &store);
//!
//! store.set(&declarations, "accent", RawValue::from("#0A7C6E")).unwrap();
//! assert!(store.set(&declarations, "accent", RawValue::from("teal")).is_err());
//! store.set(&declarations, COVER_OVERLAY_OPACITY, RawValue::from("55")).unwrap();
//!
//! let snapshot = SettingsSnapshot::resolve(&declarations, &store);
//! assert_eq!(snapshot.accent().as_str(), "#0A7C6E");
//! assert_eq!(snapshot.cover().opacity, "80");
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::declare::{
    Declarations, SettingValue, BACKGROUND_COLOR, BACKGROUND_DEFAULT, BLEND_MODE_DEFAULT,
    COVER_FIXED_BACKGROUND, COVER_OVERLAY_BACKGROUND_COLOR, COVER_OVERLAY_BLEND_MODE,
    COVER_OVERLAY_OPACITY, COVER_OVERLAY_TEXT_COLOR, DISABLE_HEADER_SEARCH, OPACITY_DEFAULT,
    OVERLAY_TEXT_DEFAULT, RETINA_LOGO,
};
use crate::error::SettingsError;
use crate::registry::ColorOption;
use crate::validate::{ColorValue, HexColor, RawValue};

// =============================================================================
// Sources
// =============================================================================

/// Read access to persisted setting values.
///
/// Values are untrusted: every read is validated again by the caller.
pub trait SettingsSource {
    /// The stored raw value of `key`, or `None` when nothing is stored.
    fn get(&self, key: &str) -> Option<RawValue>;
}

impl SettingsSource for HashMap<String, RawValue> {
    fn get(&self, key: &str) -> Option<RawValue> {
        HashMap::get(self, key).cloned()
    }
}

impl SettingsSource for BTreeMap<String, RawValue> {
    fn get(&self, key: &str) -> Option<RawValue> {
        BTreeMap::get(self, key).cloned()
    }
}

impl<S: SettingsSource + ?Sized> SettingsSource for &S {
    fn get(&self, key: &str) -> Option<RawValue> {
        (**self).get(key)
    }
}

// =============================================================================
// Store
// =============================================================================

/// In-memory persisted settings with validation at the write boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsStore {
    values: BTreeMap<String, RawValue>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps previously persisted values without validating them.
    ///
    /// Reads validate anyway, so junk in storage cannot reach a stylesheet.
    pub fn from_values(values: BTreeMap<String, RawValue>) -> Self {
        Self { values }
    }

    /// Validates and stores a value.
    ///
    /// Booleans and enums are normalized and always stored. A color that
    /// fails validation leaves the stored value untouched.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::UnknownSetting`] if `key` is not declared
    /// - [`SettingsError::Rejected`] if a color value is malformed
    pub fn set(
        &mut self,
        declarations: &Declarations,
        key: &str,
        raw: RawValue,
    ) -> Result<SettingValue, SettingsError> {
        let declaration = declarations
            .get(key)
            .ok_or_else(|| SettingsError::UnknownSetting(key.to_string()))?;

        let value = declaration.validate(&raw).map_err(|source| {
            tracing::debug!(key, %source, "keeping previous value");
            SettingsError::Rejected {
                key: key.to_string(),
                source,
            }
        })?;

        if value.to_raw() != raw {
            tracing::debug!(key, raw = %raw, normalized = %value, "normalized setting value");
        }
        self.values.insert(key.to_string(), value.to_raw());
        Ok(value)
    }

    /// Removes a stored value, reverting the setting to its default.
    pub fn remove(&mut self, key: &str) -> Option<RawValue> {
        self.values.remove(key)
    }

    /// Stored raw values, by key.
    pub fn values(&self) -> &BTreeMap<String, RawValue> {
        &self.values
    }

    pub fn into_values(self) -> BTreeMap<String, RawValue> {
        self.values
    }
}

impl SettingsSource for SettingsStore {
    fn get(&self, key: &str) -> Option<RawValue> {
        self.values.get(key).cloned()
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// A registered color and its resolved value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColor {
    #[serde(flatten)]
    pub option: ColorOption,
    pub value: HexColor,
}

/// Resolved Cover template settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverSettings {
    pub fixed_background: bool,
    pub overlay_color: HexColor,
    pub overlay_text_color: HexColor,
    pub blend_mode: String,
    pub opacity: String,
}

/// Every declared setting, resolved.
///
/// Built fresh for each render; nothing here outlives the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsSnapshot {
    values: Vec<(String, SettingValue)>,
    colors: Vec<ResolvedColor>,
    background: HexColor,
    retina_logo: bool,
    disable_header_search: bool,
    cover: CoverSettings,
}

impl SettingsSnapshot {
    /// Reads and validates every declaration from `source`.
    pub fn resolve(declarations: &Declarations, source: &dyn SettingsSource) -> Self {
        let values: Vec<(String, SettingValue)> = declarations
            .iter()
            .map(|d| (d.key.clone(), d.resolve(source.get(&d.key).as_ref())))
            .collect();

        let color = |key: &str, fallback: &HexColor| match lookup(&values, key) {
            Some(SettingValue::Color(ColorValue::Hex(c))) => c.clone(),
            _ => fallback.clone(),
        };
        let flag = |key: &str, fallback: bool| match lookup(&values, key) {
            Some(SettingValue::Bool(b)) => *b,
            _ => fallback,
        };
        let choice = |key: &str, fallback: &str| match lookup(&values, key) {
            Some(SettingValue::Choice(s)) => s.clone(),
            _ => fallback.to_string(),
        };

        let colors: Vec<ResolvedColor> = declarations
            .colors()
            .iter()
            .map(|option| ResolvedColor {
                value: color(&option.key, &option.default),
                option: option.clone(),
            })
            .collect();

        let accent_fallback = ColorOption::accent().default;
        let cover = CoverSettings {
            fixed_background: flag(COVER_FIXED_BACKGROUND, true),
            overlay_color: color(
                COVER_OVERLAY_BACKGROUND_COLOR,
                colors.first().map(|c| &c.value).unwrap_or(&accent_fallback),
            ),
            overlay_text_color: color(COVER_OVERLAY_TEXT_COLOR, &fixed(OVERLAY_TEXT_DEFAULT)),
            blend_mode: choice(COVER_OVERLAY_BLEND_MODE, BLEND_MODE_DEFAULT),
            opacity: choice(COVER_OVERLAY_OPACITY, OPACITY_DEFAULT),
        };

        let snapshot = Self {
            background: color(BACKGROUND_COLOR, &fixed(BACKGROUND_DEFAULT)),
            retina_logo: flag(RETINA_LOGO, false),
            disable_header_search: flag(DISABLE_HEADER_SEARCH, false),
            colors,
            cover,
            values,
        };
        tracing::trace!(settings = snapshot.values.len(), "resolved settings snapshot");
        snapshot
    }

    /// Resolved value of any declared setting.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        lookup(&self.values, key)
    }

    /// All resolved values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Registered colors in registration order.
    pub fn colors(&self) -> &[ResolvedColor] {
        &self.colors
    }

    /// The first registered color's value: the accent unless a registry was
    /// built without it.
    pub fn accent(&self) -> HexColor {
        self.colors
            .first()
            .map(|c| c.value.clone())
            .unwrap_or_else(|| ColorOption::accent().default)
    }

    pub fn background(&self) -> &HexColor {
        &self.background
    }

    pub fn retina_logo(&self) -> bool {
        self.retina_logo
    }

    pub fn disable_header_search(&self) -> bool {
        self.disable_header_search
    }

    pub fn cover(&self) -> &CoverSettings {
        &self.cover
    }
}

fn lookup<'a>(values: &'a [(String, SettingValue)], key: &str) -> Option<&'a SettingValue> {
    values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

fn fixed(hex: &str) -> HexColor {
    HexColor::parse_no_hash(hex).unwrap_or_else(|| ColorOption::accent().default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ColorOptions, ColorRegistry};

    fn declarations() -> Declarations {
        Declarations::build(&ColorOptions::default(), &SettingsStore::new())
    }

    // =========================================================================
    // Store tests
    // =========================================================================

    #[test]
    fn test_set_valid_color() {
        let d = declarations();
        let mut store = SettingsStore::new();
        store.set(&d, "accent", RawValue::from("#112233")).unwrap();
        assert_eq!(store.get("accent"), Some(RawValue::from("#112233")));
    }

    #[test]
    fn test_rejected_color_keeps_previous() {
        let d = declarations();
        let mut store = SettingsStore::new();
        store.set(&d, "accent", RawValue::from("#112233")).unwrap();

        let err = store.set(&d, "accent", RawValue::from("#12345")).unwrap_err();
        assert!(matches!(err, SettingsError::Rejected { .. }));
        assert_eq!(store.get("accent"), Some(RawValue::from("#112233")));
    }

    #[test]
    fn test_unknown_setting() {
        let d = declarations();
        let mut store = SettingsStore::new();
        let err = store.set(&d, "nope", RawValue::Bool(true)).unwrap_err();
        assert_eq!(err, SettingsError::UnknownSetting("nope".into()));
        assert!(store.values().is_empty());
    }

    #[test]
    fn test_enum_and_boolean_are_normalized() {
        let d = declarations();
        let mut store = SettingsStore::new();
        let v = store.set(&d, COVER_OVERLAY_BLEND_MODE, RawValue::from("Screen")).unwrap();
        assert_eq!(v, SettingValue::Choice("screen".into()));
        let v = store.set(&d, RETINA_LOGO, RawValue::Int(1)).unwrap();
        assert_eq!(v, SettingValue::Bool(false));
        assert_eq!(store.get(RETINA_LOGO), Some(RawValue::Bool(false)));
    }

    #[test]
    fn test_remove_reverts_to_default() {
        let d = declarations();
        let mut store = SettingsStore::new();
        store.set(&d, COVER_OVERLAY_OPACITY, RawValue::from("30")).unwrap();
        assert_eq!(SettingsSnapshot::resolve(&d, &store).cover().opacity, "30");
        store.remove(COVER_OVERLAY_OPACITY);
        assert_eq!(SettingsSnapshot::resolve(&d, &store).cover().opacity, "80");
    }

    // =========================================================================
    // Snapshot tests
    // =========================================================================

    #[test]
    fn test_default_snapshot() {
        let snapshot = SettingsSnapshot::resolve(&declarations(), &SettingsStore::new());
        assert_eq!(snapshot.accent().as_str(), "#CD2653");
        assert_eq!(snapshot.background().as_str(), "#F5EFE0");
        assert!(!snapshot.retina_logo());
        assert!(!snapshot.disable_header_search());
        let cover = snapshot.cover();
        assert!(cover.fixed_background);
        assert_eq!(cover.overlay_color.as_str(), "#CD2653");
        assert_eq!(cover.overlay_text_color.as_str(), "#FFFFFF");
        assert_eq!(cover.blend_mode, "multiply");
        assert_eq!(cover.opacity, "80");
    }

    #[test]
    fn test_untrusted_source_is_revalidated() {
        let mut raw = BTreeMap::new();
        raw.insert("accent".to_string(), RawValue::from("not-a-color"));
        raw.insert(COVER_OVERLAY_OPACITY.to_string(), RawValue::from("55"));
        raw.insert(RETINA_LOGO.to_string(), RawValue::from("true"));
        raw.insert(BACKGROUND_COLOR.to_string(), RawValue::from("202020"));

        let snapshot = SettingsSnapshot::resolve(&declarations(), &raw);
        assert_eq!(snapshot.accent().as_str(), "#CD2653");
        assert_eq!(snapshot.cover().opacity, "80");
        assert!(!snapshot.retina_logo());
        assert_eq!(snapshot.background().as_str(), "#202020");
    }

    #[test]
    fn test_colors_follow_registry_order() {
        let mut registry = ColorRegistry::new();
        registry.register_color("highlight", "#112233", "Highlight", None).unwrap();
        registry.register_color("muted", "#999999", "Muted", None).unwrap();
        let d = Declarations::build(&registry.seal(), &SettingsStore::new());

        let mut store = SettingsStore::new();
        store.set(&d, "muted", RawValue::from("#888888")).unwrap();
        let snapshot = SettingsSnapshot::resolve(&d, &store);

        let resolved: Vec<(&str, &str)> = snapshot
            .colors()
            .iter()
            .map(|c| (c.option.key.as_str(), c.value.as_str()))
            .collect();
        assert_eq!(
            resolved,
            [("accent", "#CD2653"), ("highlight", "#112233"), ("muted", "#888888")]
        );
    }

    #[test]
    fn test_unset_color_resolves_to_default() {
        let d = declarations();
        let mut store = SettingsStore::new();
        store.set(&d, COVER_OVERLAY_TEXT_COLOR, RawValue::from("")).unwrap();
        let snapshot = SettingsSnapshot::resolve(&d, &store);
        assert_eq!(snapshot.cover().overlay_text_color.as_str(), "#FFFFFF");
    }

    #[test]
    fn test_values_in_declaration_order() {
        let d = declarations();
        let snapshot = SettingsSnapshot::resolve(&d, &SettingsStore::new());
        let keys: Vec<&str> = snapshot.values().map(|(k, _)| k).collect();
        let declared: Vec<&str> = d.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, declared);
    }

    #[test]
    fn test_store_deserializes_from_yaml() {
        let store: SettingsStore =
            serde_yaml::from_str("accent: \"#0A7C6E\"\nretina_logo: true\n").unwrap();
        assert_eq!(store.get(RETINA_LOGO), Some(RawValue::Bool(true)));
        let snapshot = SettingsSnapshot::resolve(&declarations(), &store);
        assert_eq!(snapshot.accent().as_str(), "#0A7C6E");
        assert!(snapshot.retina_logo());
    }
}
