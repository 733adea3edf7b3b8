//! # Tinct Customize - Theme Settings to Stylesheets
//!
//! `tinct-customize` holds the settings layer of a site theme: the colors and
//! options an operator can change, how raw input is validated, and how the
//! current settings turn into CSS for the site and its editors.
//!
//! ## Core Concepts
//!
//! - [`ColorRegistry`]: theme colors, open to extension until sealed into [`ColorOptions`]
//! - [`Declarations`]: every configurable setting with its validator, default and transport
//! - [`SettingsSource`] / [`SettingsStore`]: read and write boundaries for persisted values
//! - [`SettingsSnapshot`]: every setting resolved for one render
//! - [`derive`]: snapshot to CSS for a [`StyleContext`]; [`derive_cover`] for the Cover template
//! - [`project`]: block editor color palette and font sizes
//! - [`LivePreviewMap`]: which settings re-render client-side and which reload
//!
//! ## Lifecycle
//!
//! Bootstrap happens once; snapshots and stylesheets are cheap and computed
//! per render.
//!
//! ```rust
//! use tinct_customize::{
//!     derive, derive_cover, project, ColorRegistry, Declarations, RawValue, SettingsSnapshot,
//!     SettingsStore, StyleContext,
//! };
//!
//! // Bootstrap: extend the registry, then seal it.
//! let mut registry = ColorRegistry::new();
//! registry.register_color("highlight", "#112233", "Highlight Color", None).unwrap();
//! let options = registry.seal();
//!
//! let mut store = SettingsStore::new();
//! let declarations = Declarations::build(&options, &store);
//! store.set(&declarations, "cover_overlay_opacity", RawValue::from("60")).unwrap();
//!
//! // Render.
//! let snapshot = SettingsSnapshot::resolve(&declarations, &store);
//! let css = derive(&snapshot, StyleContext::FrontEnd);
//! assert!(css.css_text.contains(".color-highlight { color: #112233; }"));
//! assert!(derive_cover(&snapshot).contains("opacity-60"));
//!
//! let palette = project(&snapshot);
//! assert_eq!(palette.color_palette.len(), 3);
//! ```
//!
//! ## Invalid Input
//!
//! Nothing here fails a render. Booleans and selects are normalized, colors
//! that fail validation are refused at [`SettingsStore::set`] and ignored on
//! read, and every setting falls back to its declared default.

pub mod color;
pub mod cover;
pub mod declare;
mod error;
pub mod logo;
pub mod palette;
pub mod preview;
pub mod registry;
pub mod settings;
pub mod stylesheet;
pub mod validate;

pub use error::{ParseContextError, ParsePartialError, RegistryError, SettingsError};

pub use cover::{derive_cover, CoverPresentation};
pub use declare::{
    ControlSpec, ControlType, CustomizerHost, Declarations, Section, SettingDeclaration,
    SettingKind, SettingValue, Transport,
};
pub use logo::{custom_logo, custom_logo_html, CustomLogo, LogoImage};
pub use palette::{project, EditorPalette, FontSize, PaletteColor};
pub use preview::{LivePreviewMap, Partial, PartialRenderer, PreviewEntry};
pub use registry::{ColorExtension, ColorOption, ColorOptions, ColorRegistry};
pub use settings::{CoverSettings, ResolvedColor, SettingsSnapshot, SettingsSource, SettingsStore};
pub use stylesheet::{derive, DerivedStylesheet, StyleContext};
pub use validate::{
    validate_boolean, validate_color, validate_enum, Choice, Choices, ColorRejected, ColorValue,
    HexColor, RawValue,
};
