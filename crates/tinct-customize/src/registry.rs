//! Theme color registry.
//!
//! This module provides [`ColorRegistry`], the canonical list of theme colors
//! that feed both the customizer color pickers and every derived stylesheet.
//!
//! # Lifecycle
//!
//! The registry has two phases:
//!
//! 1. **Registration**: a [`ColorRegistry`] starts with the built-in accent
//!    color. Plugins and child themes add or override entries through
//!    [`register_color`](ColorRegistry::register_color) or by applying a
//!    [`ColorExtension`].
//! 2. **Render**: [`seal`](ColorRegistry::seal) consumes the registry and
//!    returns [`ColorOptions`], an immutable list shared by reference for the
//!    rest of the process. Nothing can register against it any more.
//!
//! # Ordering and Overrides
//!
//! Entries keep registration order. Registering an existing key replaces its
//! default, label and slug but keeps its position, so the built-in accent
//! stays first even when a child theme overrides it.
//!
//! # Example
//!
//! ```rust
//! use tinct_customize::registry::ColorRegistry;
//!
//! let mut registry = ColorRegistry::new();
//! registry
//!     .register_color("highlight", "#112233", "Highlight Color", None)
//!     .unwrap();
//!
//! let options = registry.seal();
//! let slugs: Vec<&str> = options.iter().map(|o| o.slug.as_str()).collect();
//! assert_eq!(slugs, ["accent", "highlight"]);
//! ```

use std::sync::Arc;

use serde::Serialize;

use crate::declare::RESERVED_KEYS;
use crate::error::RegistryError;
use crate::palette::BACKGROUND_SLUG;
use crate::validate::{validate_color, ColorValue, HexColor, RawValue};

/// Key of the built-in accent color.
pub const ACCENT_KEY: &str = "accent";
/// Default of the built-in accent color.
pub const ACCENT_DEFAULT: &str = "#CD2653";

/// A registered theme color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorOption {
    /// Stable identifier; also the setting key of the color.
    pub key: String,
    /// Color used when nothing is stored.
    pub default: HexColor,
    /// Display label for the color picker and editor palette.
    pub label: String,
    /// CSS-safe identifier used in class names and custom properties.
    pub slug: String,
}

impl ColorOption {
    /// The built-in accent color.
    pub fn accent() -> Self {
        Self {
            key: ACCENT_KEY.to_string(),
            default: HexColor::parse(ACCENT_DEFAULT).unwrap_or_else(|| {
                HexColor::from_rgb(crate::color::Rgb(0xCD, 0x26, 0x53))
            }),
            label: "Accent Color".to_string(),
            slug: ACCENT_KEY.to_string(),
        }
    }
}

/// Hook through which third parties extend the registry during bootstrap.
///
/// Closures taking `&mut ColorRegistry` implement this trait.
pub trait ColorExtension {
    fn extend(&self, registry: &mut ColorRegistry) -> Result<(), RegistryError>;
}

impl<F> ColorExtension for F
where
    F: Fn(&mut ColorRegistry) -> Result<(), RegistryError>,
{
    fn extend(&self, registry: &mut ColorRegistry) -> Result<(), RegistryError> {
        self(registry)
    }
}

/// Mutable color registry used during bootstrap.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    options: Vec<ColorOption>,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegistry {
    /// Creates a registry holding only the built-in accent color.
    pub fn new() -> Self {
        Self {
            options: vec![ColorOption::accent()],
        }
    }

    /// Creates a registry with no entries at all.
    ///
    /// Mostly useful for tests; a theme normally starts from [`new`](Self::new).
    pub fn empty() -> Self {
        Self {
            options: Vec::new(),
        }
    }

    /// Adds or replaces a color option.
    ///
    /// The default is validated like any stored color and must be a concrete
    /// `#RRGGBB` value. When `slug` is `None` it is derived from the key.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ReservedKey`] if the key belongs to a built-in setting
    /// - [`RegistryError::InvalidDefault`] if the default is not `#RRGGBB`
    /// - [`RegistryError::InvalidSlug`] if the slug is not a CSS identifier
    /// - [`RegistryError::ReservedSlug`] for the palette's `background` slug
    /// - [`RegistryError::DuplicateSlug`] if another key already owns the slug
    pub fn register_color(
        &mut self,
        key: &str,
        default: &str,
        label: &str,
        slug: Option<&str>,
    ) -> Result<(), RegistryError> {
        if RESERVED_KEYS.contains(&key) {
            return Err(RegistryError::ReservedKey {
                key: key.to_string(),
            });
        }

        let default = match validate_color(&RawValue::from(default)) {
            Ok(ColorValue::Hex(c)) => c,
            Ok(ColorValue::Unset) | Err(_) => {
                return Err(RegistryError::InvalidDefault {
                    key: key.to_string(),
                    value: default.to_string(),
                })
            }
        };

        let slug = match slug {
            Some(s) => s.to_string(),
            None => slug_from_key(key),
        };
        if !is_css_identifier(&slug) {
            return Err(RegistryError::InvalidSlug {
                key: key.to_string(),
                slug,
            });
        }
        if slug == BACKGROUND_SLUG {
            return Err(RegistryError::ReservedSlug {
                key: key.to_string(),
                slug,
            });
        }
        if let Some(owner) = self.options.iter().find(|o| o.slug == slug && o.key != key) {
            return Err(RegistryError::DuplicateSlug {
                slug,
                existing: owner.key.clone(),
                key: key.to_string(),
            });
        }

        let option = ColorOption {
            key: key.to_string(),
            default,
            label: label.to_string(),
            slug,
        };

        match self.options.iter_mut().find(|o| o.key == key) {
            Some(existing) => {
                tracing::trace!(key, "overriding color option");
                *existing = option;
            }
            None => {
                tracing::trace!(key, "registering color option");
                self.options.push(option);
            }
        }
        Ok(())
    }

    /// Runs an extension hook against this registry.
    pub fn apply<E: ColorExtension + ?Sized>(&mut self, extension: &E) -> Result<(), RegistryError> {
        extension.extend(self)
    }

    /// Returns a copy of the current entries in registration order.
    pub fn list_colors(&self) -> Vec<ColorOption> {
        self.options.clone()
    }

    /// Looks up an option by key.
    pub fn get(&self, key: &str) -> Option<&ColorOption> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Ends the registration phase.
    pub fn seal(self) -> ColorOptions {
        tracing::trace!(count = self.options.len(), "sealing color registry");
        ColorOptions {
            options: self.options.into(),
        }
    }
}

/// Sealed, read-only color registry.
///
/// Clones share the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorOptions {
    options: Arc<[ColorOption]>,
}

impl Default for ColorOptions {
    fn default() -> Self {
        ColorRegistry::new().seal()
    }
}

impl ColorOptions {
    /// Iterates options in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColorOption> {
        self.options.iter()
    }

    /// Returns a copy of the entries in registration order.
    pub fn list_colors(&self) -> Vec<ColorOption> {
        self.options.to_vec()
    }

    /// Looks up an option by key.
    pub fn get(&self, key: &str) -> Option<&ColorOption> {
        self.options.iter().find(|o| o.key == key)
    }

    /// The first registered option, which is the built-in accent unless the
    /// registry was created empty.
    pub fn primary(&self) -> Option<&ColorOption> {
        self.options.first()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<'a> IntoIterator for &'a ColorOptions {
    type Item = &'a ColorOption;
    type IntoIter = std::slice::Iter<'a, ColorOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Derives a slug from a setting key: lowercase, `_` becomes `-`.
pub fn slug_from_key(key: &str) -> String {
    key.to_ascii_lowercase().replace('_', "-")
}

/// True if `s` can be used unescaped in a class name and a custom property:
/// starts with a letter, continues with letters, digits or `-`.
pub fn is_css_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
