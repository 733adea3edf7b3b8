//! Error types for the customize crate.
//!
//! Validation never fails a render. These errors surface only at the two
//! write boundaries: registering a color option and storing a setting.

use thiserror::Error;

use crate::validate::ColorRejected;

/// Errors raised while registering color options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The default is not a concrete `#RRGGBB` color.
    #[error("color option '{key}': default '{value}' is not a #RRGGBB hex color")]
    InvalidDefault { key: String, value: String },

    /// The slug cannot be used as a CSS identifier.
    #[error("color option '{key}': slug '{slug}' is not a valid CSS identifier")]
    InvalidSlug { key: String, slug: String },

    /// The key names a theme or host setting that is not a color option.
    #[error("color option '{key}': key is reserved for a built-in setting")]
    ReservedKey { key: String },

    /// The slug belongs to the palette's background entry.
    #[error("color option '{key}': slug '{slug}' is reserved")]
    ReservedSlug { key: String, slug: String },

    /// Another option already uses the slug.
    #[error("color option '{key}': slug '{slug}' is already used by '{existing}'")]
    DuplicateSlug {
        slug: String,
        existing: String,
        key: String,
    },
}

/// Errors raised when writing a setting through the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// No declaration exists for the key.
    #[error("unknown setting '{0}'")]
    UnknownSetting(String),

    /// The value failed validation; the stored value was kept.
    #[error("setting '{key}' rejected: {source}")]
    Rejected {
        key: String,
        #[source]
        source: ColorRejected,
    },
}

/// A stylesheet context name was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stylesheet context '{0}' (expected front-end, block-editor or classic-editor)")]
pub struct ParseContextError(pub String);

/// A live-preview partial name was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown partial '{0}' (expected blogname or blogdescription)")]
pub struct ParsePartialError(pub String);
