//! Setting declarations.
//!
//! [`Declarations`] is the full, fixed set of configurable settings for one
//! process: one color setting per registered [`ColorOption`], the page
//! background color, and the infrastructure settings for the logo, the
//! header and the Cover template. Each declaration carries its kind, its
//! default, its choices (enums only), its live-preview transport and the
//! metadata of the control that edits it.
//!
//! Declarations are built once, after the color registry is sealed, and are
//! read-only afterwards:
//!
//! ```rust
//! use std::collections::HashMap;
//! use tinct_customize::declare::{Declarations, SettingValue, COVER_OVERLAY_OPACITY};
//! use tinct_customize::registry::ColorRegistry;
//! use tinct_customize::validate::RawValue;
//!
//! let options = ColorRegistry::new().seal();
//! let stored: HashMap<String, RawValue> = HashMap::new();
//! let declarations = Declarations::build(&options, &stored);
//!
//! let opacity = declarations.get(COVER_OVERLAY_OPACITY).unwrap();
//! assert_eq!(opacity.default, SettingValue::Choice("80".into()));
//! ```
//!
//! Registration with the host editor goes through [`CustomizerHost`]; see
//! [`Declarations::register`].

use std::fmt;

use serde::Serialize;

use crate::preview::Partial;
use crate::registry::{ColorOption, ColorOptions, ACCENT_KEY};
use crate::settings::SettingsSource;
use crate::validate::{
    validate_boolean, validate_color, validate_color_no_hash, validate_enum, Choices, ColorRejected,
    ColorValue, HexColor, RawValue,
};

// =============================================================================
// Keys and fixed tables
// =============================================================================

/// Page background color. Stored by the host without the leading `#`.
pub const BACKGROUND_COLOR: &str = "background_color";
/// Halve the displayed logo size for high-density screens.
pub const RETINA_LOGO: &str = "retina_logo";
/// Hide the search toggle in the site header.
pub const DISABLE_HEADER_SEARCH: &str = "disable_header_search";
/// Fixed (parallax) background image on the Cover template.
pub const COVER_FIXED_BACKGROUND: &str = "cover_fixed_background";
/// Overlay color drawn over the Cover image.
pub const COVER_OVERLAY_BACKGROUND_COLOR: &str = "cover_overlay_background_color";
/// Text color inside the Cover overlay.
pub const COVER_OVERLAY_TEXT_COLOR: &str = "cover_overlay_text_color";
/// Blend mode between the overlay color and the Cover image.
pub const COVER_OVERLAY_BLEND_MODE: &str = "cover_overlay_blend_mode";
/// Overlay opacity in percent, step 10.
pub const COVER_OVERLAY_OPACITY: &str = "cover_overlay_opacity";

/// Host-owned site title setting.
pub const BLOGNAME: &str = "blogname";
/// Host-owned tagline setting.
pub const BLOGDESCRIPTION: &str = "blogdescription";

/// Setting keys owned by the theme and host, which color options cannot take.
pub const RESERVED_KEYS: [&str; 10] = [
    BACKGROUND_COLOR,
    RETINA_LOGO,
    DISABLE_HEADER_SEARCH,
    COVER_FIXED_BACKGROUND,
    COVER_OVERLAY_BACKGROUND_COLOR,
    COVER_OVERLAY_TEXT_COLOR,
    COVER_OVERLAY_BLEND_MODE,
    COVER_OVERLAY_OPACITY,
    BLOGNAME,
    BLOGDESCRIPTION,
];

/// Default page background, without `#` as the host stores it.
pub const BACKGROUND_DEFAULT: &str = "F5EFE0";
/// Default Cover overlay text color.
pub const OVERLAY_TEXT_DEFAULT: &str = "#FFFFFF";
/// Default Cover blend mode.
pub const BLEND_MODE_DEFAULT: &str = "multiply";
/// Default Cover overlay opacity.
pub const OPACITY_DEFAULT: &str = "80";

/// Suggested custom logo width.
pub const LOGO_WIDTH: u32 = 320;
/// Suggested custom logo height.
pub const LOGO_HEIGHT: u32 = 240;

/// The sixteen CSS blend modes with their display labels, in menu order.
pub const BLEND_MODES: [(&str, &str); 16] = [
    ("normal", "Normal"),
    ("multiply", "Multiply"),
    ("screen", "Screen"),
    ("overlay", "Overlay"),
    ("darken", "Darken"),
    ("lighten", "Lighten"),
    ("color-dodge", "Color Dodge"),
    ("color-burn", "Color Burn"),
    ("hard-light", "Hard Light"),
    ("soft-light", "Soft Light"),
    ("difference", "Difference"),
    ("exclusion", "Exclusion"),
    ("hue", "Hue"),
    ("saturation", "Saturation"),
    ("color", "Color"),
    ("luminosity", "Luminosity"),
];

/// Blend-mode choices in menu order.
pub fn blend_mode_choices() -> Choices {
    BLEND_MODES.iter().copied().collect()
}

/// Opacity choices `0`..`100` in steps of ten, labelled as percentages.
pub fn opacity_choices() -> Choices {
    (0..=100)
        .step_by(10)
        .fold(Choices::new(), |choices, n: u32| {
            let value = n.to_string();
            let label = format!("{}%", n);
            choices.with(&value, &label)
        })
}

// =============================================================================
// Declaration model
// =============================================================================

/// What a setting holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKind {
    Boolean,
    Color,
    Enum,
}

/// A resolved setting value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Color(ColorValue),
    Choice(String),
}

impl SettingValue {
    /// The value as it would be written back to storage.
    pub fn to_raw(&self) -> RawValue {
        match self {
            SettingValue::Bool(b) => RawValue::Bool(*b),
            SettingValue::Color(ColorValue::Hex(c)) => RawValue::from(c.as_str()),
            SettingValue::Color(ColorValue::Unset) => RawValue::from(""),
            SettingValue::Choice(s) => RawValue::from(s.as_str()),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Color(ColorValue::Hex(c)) => write!(f, "{}", c),
            SettingValue::Color(ColorValue::Unset) => f.write_str("(unset)"),
            SettingValue::Choice(s) => f.write_str(s),
        }
    }
}

/// How the live preview reflects a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transport {
    /// Re-rendered client-side, no reload.
    #[serde(rename = "postMessage")]
    PostMessage,
    /// Full preview reload.
    #[serde(rename = "refresh")]
    Refresh,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::PostMessage => "postMessage",
            Transport::Refresh => "refresh",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored color format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    /// `#RRGGBB`.
    Hash,
    /// `RRGGBB`, `#` optional.
    NoHash,
}

/// The widget that edits a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Checkbox,
    Color,
    Select,
}

/// Control metadata passed to the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlSpec {
    pub control: ControlType,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl ControlSpec {
    fn new(control: ControlType, section: &str, label: &str) -> Self {
        Self {
            control,
            label: label.to_string(),
            description: None,
            section: section.to_string(),
            priority: None,
        }
    }

    fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    fn priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A settings-panel section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: u32,
}

/// Host section holding the logo and site identity controls.
pub const SECTION_SITE_IDENTITY: &str = "title_tagline";
/// Host section holding color pickers.
pub const SECTION_COLORS: &str = "colors";
/// Section for header options.
pub const SECTION_SITE_HEADER: &str = "site_header_options";
/// Section for Cover template options.
pub const SECTION_COVER_TEMPLATE: &str = "cover_template_options";

/// Sections this crate adds. The identity and colors sections belong to the host.
pub const SECTIONS: [Section; 2] = [
    Section {
        id: SECTION_SITE_HEADER,
        title: "Site Header",
        description: "Settings for the site header.",
        priority: 40,
    },
    Section {
        id: SECTION_COVER_TEMPLATE,
        title: "Cover Template",
        description: "Settings for the \"Cover Template\" page template.",
        priority: 42,
    },
];

/// One configurable setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingDeclaration {
    pub key: String,
    pub kind: SettingKind,
    pub default: SettingValue,
    /// Allowed values; present exactly when `kind` is [`SettingKind::Enum`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Choices>,
    pub transport: Transport,
    /// `None` when the host owns the control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlSpec>,
    #[serde(skip)]
    color_format: ColorFormat,
}

impl SettingDeclaration {
    fn boolean(key: &str, default: bool, transport: Transport, control: ControlSpec) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Boolean,
            default: SettingValue::Bool(default),
            choices: None,
            transport,
            control: Some(control),
            color_format: ColorFormat::Hash,
        }
    }

    fn color(key: &str, default: HexColor, transport: Transport, control: Option<ControlSpec>) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Color,
            default: SettingValue::Color(ColorValue::Hex(default)),
            choices: None,
            transport,
            control,
            color_format: ColorFormat::Hash,
        }
    }

    fn select(key: &str, default: &str, choices: Choices, transport: Transport, control: ControlSpec) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Enum,
            default: SettingValue::Choice(default.to_string()),
            choices: Some(choices),
            transport,
            control: Some(control),
            color_format: ColorFormat::Hash,
        }
    }

    fn no_hash(mut self) -> Self {
        self.color_format = ColorFormat::NoHash;
        self
    }

    /// True if a change is reflected without reloading the preview.
    pub fn live_preview(&self) -> bool {
        self.transport == Transport::PostMessage
    }

    pub fn color_format(&self) -> ColorFormat {
        self.color_format
    }

    /// The declared default color, for color settings.
    pub fn default_color(&self) -> Option<&HexColor> {
        match &self.default {
            SettingValue::Color(c) => c.hex(),
            _ => None,
        }
    }

    /// The default as text, for enum settings.
    fn default_choice(&self) -> &str {
        match &self.default {
            SettingValue::Choice(s) => s,
            _ => "",
        }
    }

    /// Runs the validator bound to this declaration.
    ///
    /// Booleans and enums always produce a value. A color that fails
    /// validation is rejected so the caller can keep what it had.
    pub fn validate(&self, raw: &RawValue) -> Result<SettingValue, ColorRejected> {
        match self.kind {
            SettingKind::Boolean => Ok(SettingValue::Bool(validate_boolean(raw))),
            SettingKind::Enum => {
                let empty = Choices::new();
                let choices = self.choices.as_ref().unwrap_or(&empty);
                Ok(SettingValue::Choice(validate_enum(
                    raw,
                    choices,
                    self.default_choice(),
                )))
            }
            SettingKind::Color => {
                let value = match self.color_format {
                    ColorFormat::Hash => validate_color(raw)?,
                    ColorFormat::NoHash => validate_color_no_hash(raw)?,
                };
                Ok(SettingValue::Color(value))
            }
        }
    }

    /// Validates `raw`, falling back to the default when it is rejected.
    /// An unset color also resolves to the default.
    pub fn resolve(&self, raw: Option<&RawValue>) -> SettingValue {
        let Some(raw) = raw else {
            return self.default.clone();
        };
        match self.validate(raw) {
            Ok(SettingValue::Color(ColorValue::Unset)) => self.default.clone(),
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(key = %self.key, %err, "stored value rejected, using default");
                self.default.clone()
            }
        }
    }
}

// =============================================================================
// Declaration set
// =============================================================================

/// The host editor's registration surface.
///
/// Called once per process by [`Declarations::register`].
pub trait CustomizerHost {
    fn add_section(&mut self, section: &Section);
    fn register_setting(&mut self, setting: &SettingDeclaration);
    fn register_control(&mut self, key: &str, control: &ControlSpec);
    fn add_partial(&mut self, partial: &Partial);
}

/// The complete, read-only declaration set.
#[derive(Debug, Clone)]
pub struct Declarations {
    options: ColorOptions,
    entries: Vec<SettingDeclaration>,
}

impl Declarations {
    /// Builds the declaration set from the sealed color registry.
    ///
    /// `source` is read once, for the accent color: its current value becomes
    /// the default of the Cover overlay color. Later accent changes do not
    /// move that default.
    pub fn build(options: &ColorOptions, source: &dyn SettingsSource) -> Self {
        let mut entries = Vec::with_capacity(options.len() + 8);

        for option in options {
            entries.push(color_declaration(option));
        }

        let accent = accent_snapshot(options, &entries, source);
        tracing::trace!(accent = %accent, "cover overlay default taken from accent");

        entries.push(
            SettingDeclaration::color(
                BACKGROUND_COLOR,
                HexColor::parse_no_hash(BACKGROUND_DEFAULT).unwrap_or_else(|| ColorOption::accent().default),
                Transport::Refresh,
                None,
            )
            .no_hash(),
        );

        entries.push(SettingDeclaration::boolean(
            RETINA_LOGO,
            false,
            Transport::PostMessage,
            ControlSpec::new(ControlType::Checkbox, SECTION_SITE_IDENTITY, "Retina logo")
                .described("Scales the logo to half its uploaded size, making it sharp on high-res screens.")
                .priority(10),
        ));

        entries.push(SettingDeclaration::boolean(
            DISABLE_HEADER_SEARCH,
            false,
            Transport::Refresh,
            ControlSpec::new(ControlType::Checkbox, SECTION_SITE_HEADER, "Disable Search Button")
                .described("Check to disable the search button in the header.")
                .priority(10),
        ));

        entries.push(SettingDeclaration::boolean(
            COVER_FIXED_BACKGROUND,
            true,
            Transport::Refresh,
            ControlSpec::new(ControlType::Checkbox, SECTION_COVER_TEMPLATE, "Fixed Background Image")
                .described("Creates a parallax effect when the visitor scrolls."),
        ));

        entries.push(SettingDeclaration::color(
            COVER_OVERLAY_BACKGROUND_COLOR,
            accent,
            Transport::Refresh,
            Some(
                ControlSpec::new(ControlType::Color, SECTION_COVER_TEMPLATE, "Image Overlay Background Color")
                    .described("The color used for the featured image overlay. Defaults to the accent color."),
            ),
        ));

        entries.push(SettingDeclaration::color(
            COVER_OVERLAY_TEXT_COLOR,
            HexColor::parse(OVERLAY_TEXT_DEFAULT).unwrap_or_else(|| HexColor::from_rgb(crate::color::Rgb::WHITE)),
            Transport::Refresh,
            Some(
                ControlSpec::new(ControlType::Color, SECTION_COVER_TEMPLATE, "Image Overlay Text Color")
                    .described("The color used for the text in the featured image overlay."),
            ),
        ));

        entries.push(SettingDeclaration::select(
            COVER_OVERLAY_BLEND_MODE,
            BLEND_MODE_DEFAULT,
            blend_mode_choices(),
            Transport::Refresh,
            ControlSpec::new(ControlType::Select, SECTION_COVER_TEMPLATE, "Image Overlay Blend Mode").described(
                "How the overlay color will blend with the image. Some browsers only support the \"Normal\" mode.",
            ),
        ));

        entries.push(SettingDeclaration::select(
            COVER_OVERLAY_OPACITY,
            OPACITY_DEFAULT,
            opacity_choices(),
            Transport::Refresh,
            ControlSpec::new(ControlType::Select, SECTION_COVER_TEMPLATE, "Image Overlay Opacity")
                .described("Make sure that the value is high enough that the text is readable."),
        ));

        tracing::trace!(count = entries.len(), "declared settings");
        Self {
            options: options.clone(),
            entries,
        }
    }

    /// The sealed color registry the declarations were built from.
    pub fn colors(&self) -> &ColorOptions {
        &self.options
    }

    /// Looks up a declaration by key.
    pub fn get(&self, key: &str) -> Option<&SettingDeclaration> {
        self.entries.iter().find(|d| d.key == key)
    }

    /// Iterates declarations in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, SettingDeclaration> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers sections, settings, controls and partials with the host.
    pub fn register(&self, host: &mut dyn CustomizerHost) {
        for section in &SECTIONS {
            host.add_section(section);
        }
        for declaration in &self.entries {
            host.register_setting(declaration);
            if let Some(control) = &declaration.control {
                host.register_control(&declaration.key, control);
            }
        }
        for partial in Partial::all() {
            host.add_partial(&partial);
        }
    }
}

impl<'a> IntoIterator for &'a Declarations {
    type Item = &'a SettingDeclaration;
    type IntoIter = std::slice::Iter<'a, SettingDeclaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn color_declaration(option: &ColorOption) -> SettingDeclaration {
    SettingDeclaration::color(
        &option.key,
        option.default.clone(),
        Transport::PostMessage,
        Some(ControlSpec::new(ControlType::Color, SECTION_COLORS, &option.label).priority(10)),
    )
}

/// The accent value in effect right now: stored and valid, else its default.
fn accent_snapshot(
    options: &ColorOptions,
    entries: &[SettingDeclaration],
    source: &dyn SettingsSource,
) -> HexColor {
    let fallback = options
        .get(ACCENT_KEY)
        .map(|o| o.default.clone())
        .unwrap_or_else(|| ColorOption::accent().default);

    entries
        .iter()
        .find(|d| d.key == ACCENT_KEY)
        .map(|d| d.resolve(source.get(ACCENT_KEY).as_ref()))
        .and_then(|v| match v {
            SettingValue::Color(ColorValue::Hex(c)) => Some(c),
            _ => None,
        })
        .unwrap_or(fallback)
}
