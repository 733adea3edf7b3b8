//! Live-preview transport map and partial renderers.
//!
//! Every setting the preview knows about is either re-rendered client-side
//! (`postMessage`) or forces a reload (`refresh`). The site title and tagline
//! additionally have server-side partials that return escaped text for the
//! client to swap into the page.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::declare::{Declarations, Transport, BLOGDESCRIPTION, BLOGNAME};
use crate::error::ParsePartialError;
use crate::settings::SettingsSource;
use crate::validate::RawValue;

/// Server-side renderer for a partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PartialRenderer {
    SiteTitle,
    SiteDescription,
}

impl PartialRenderer {
    /// The host setting this renderer reads.
    pub fn setting(&self) -> &'static str {
        match self {
            PartialRenderer::SiteTitle => BLOGNAME,
            PartialRenderer::SiteDescription => BLOGDESCRIPTION,
        }
    }

    /// Renders the current value as escaped text. Absent values render empty.
    pub fn render(&self, source: &dyn SettingsSource) -> String {
        match source.get(self.setting()) {
            None | Some(RawValue::Null) => String::new(),
            Some(value) => html_escape::encode_text(&value.to_string()).into_owned(),
        }
    }
}

impl FromStr for PartialRenderer {
    type Err = ParsePartialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            BLOGNAME => Ok(PartialRenderer::SiteTitle),
            BLOGDESCRIPTION => Ok(PartialRenderer::SiteDescription),
            other => Err(ParsePartialError(other.to_string())),
        }
    }
}

/// A selectively refreshed page region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Partial {
    pub setting: &'static str,
    pub selector: &'static str,
    pub renderer: PartialRenderer,
}

impl Partial {
    /// Site title and tagline, in that order.
    pub fn all() -> [Partial; 2] {
        [
            Partial {
                setting: BLOGNAME,
                selector: ".site-title a",
                renderer: PartialRenderer::SiteTitle,
            },
            Partial {
                setting: BLOGDESCRIPTION,
                selector: ".site-description",
                renderer: PartialRenderer::SiteDescription,
            },
        ]
    }
}

/// Transport and optional partial of one setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewEntry {
    pub setting: String,
    pub transport: Transport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<Partial>,
}

/// Static table of preview behavior per setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LivePreviewMap {
    entries: Vec<PreviewEntry>,
}

impl LivePreviewMap {
    /// Host text settings first, then every declaration in order.
    pub fn from_declarations(declarations: &Declarations) -> Self {
        let mut entries: Vec<PreviewEntry> = Partial::all()
            .into_iter()
            .map(|partial| PreviewEntry {
                setting: partial.setting.to_string(),
                transport: Transport::PostMessage,
                partial: Some(partial),
            })
            .collect();

        entries.extend(declarations.iter().map(|d| PreviewEntry {
            setting: d.key.clone(),
            transport: d.transport,
            partial: None,
        }));

        Self { entries }
    }

    pub fn get(&self, setting: &str) -> Option<&PreviewEntry> {
        self.entries.iter().find(|e| e.setting == setting)
    }

    pub fn transport(&self, setting: &str) -> Option<Transport> {
        self.get(setting).map(|e| e.transport)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PreviewEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for LivePreviewMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            write!(f, "{} {}", entry.setting, entry.transport)?;
            if let Some(partial) = &entry.partial {
                write!(f, " {}", partial.selector)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
