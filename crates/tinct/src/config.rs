//! Site configuration files.
//!
//! A site file lists extra theme colors, the stored setting values and the
//! host's site identity. It is YAML (`.yaml`, `.yml`) or JSON (`.json`),
//! picked by extension:
//!
//! ```yaml
//! colors:
//!   - key: highlight
//!     default: "#112233"
//!     label: Highlight Color
//! settings:
//!   accent: "#0A7C6E"
//!   cover_overlay_opacity: "60"
//! site:
//!   name: My Site
//!   description: Just another site
//! ```
//!
//! Stored values are not trusted: they are validated every time a snapshot
//! is resolved, exactly like values read from the host.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tinct_customize::declare::{BLOGDESCRIPTION, BLOGNAME};
use tinct_customize::{
    ColorOptions, ColorRegistry, Declarations, RawValue, RegistryError, SettingsSnapshot,
    SettingsSource, SettingsStore,
};

/// Errors loading or saving a site file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("'{}' has no .yaml, .yml or .json extension", .0.display())]
    UnknownFormat(PathBuf),

    #[error("failed to read '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in '{}': {source}", .path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Site file serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }
}

/// An extra theme color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub key: String,
    pub default: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Host-owned site identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Contents of a site file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<ColorEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, RawValue>,
    #[serde(default)]
    pub site: SiteInfo,
}

impl SiteConfig {
    /// Reads a site file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match format {
            ConfigFormat::Yaml if text.trim().is_empty() => SiteConfig::default(),
            ConfigFormat::Yaml => serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            ConfigFormat::Json => serde_json::from_str(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?,
        };
        tracing::debug!(path = %path.display(), "loaded site file");
        Ok(config)
    }

    /// Reads a site file, or starts empty when it does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            ConfigFormat::from_path(path)?;
            tracing::debug!(path = %path.display(), "no site file, using defaults");
            Ok(Self::default())
        }
    }

    /// Writes the site file in the format its extension names.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = match ConfigFormat::from_path(path)? {
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?,
            ConfigFormat::Json => {
                let mut json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
                    path: path.to_path_buf(),
                    source,
                })?;
                json.push('\n');
                json
            }
        };
        fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Registers the extra colors on top of the built-in accent and seals
    /// the registry.
    pub fn color_options(&self) -> Result<ColorOptions, RegistryError> {
        let mut registry = ColorRegistry::new();
        for entry in &self.colors {
            registry.register_color(&entry.key, &entry.default, &entry.label, entry.slug.as_deref())?;
        }
        Ok(registry.seal())
    }
}

/// A bootstrapped site: sealed registry, declarations and stored values.
#[derive(Debug, Clone)]
pub struct Site {
    pub declarations: Declarations,
    pub store: SettingsStore,
    pub info: SiteInfo,
}

impl Site {
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let options = config.color_options()?;
        let store = SettingsStore::from_values(config.settings.clone());
        let declarations = Declarations::build(&options, &store);
        Ok(Self {
            declarations,
            store,
            info: config.site.clone(),
        })
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot::resolve(&self.declarations, &self.store)
    }
}

impl SettingsSource for Site {
    fn get(&self, key: &str) -> Option<RawValue> {
        match key {
            BLOGNAME => self.info.name.clone().map(RawValue::Str),
            BLOGDESCRIPTION => self.info.description.clone().map(RawValue::Str),
            _ => self.store.get(key),
        }
    }
}
