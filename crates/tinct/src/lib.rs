//! # Tinct - Theme Customizer Settings
//!
//! `tinct` re-exports the whole settings pipeline from
//! [`tinct_customize`] and adds what a standalone tool needs on top: site
//! files ([`config`]) and the `tinct` command line ([`cli`]).
//!
//! ```rust
//! use tinct::{derive, Declarations, SettingsSnapshot, SettingsStore, StyleContext};
//!
//! let store = SettingsStore::new();
//! let declarations = Declarations::build(&Default::default(), &store);
//! let css = derive(&SettingsSnapshot::resolve(&declarations, &store), StyleContext::ClassicEditor);
//! assert!(css.css_text.starts_with("body#tinymce.wp-editor"));
//! ```

pub mod cli;
pub mod config;

pub use tinct_customize::*;

pub use config::{ConfigError, Site, SiteConfig};
