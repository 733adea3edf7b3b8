//! Custom logo sizing.
//!
//! With the retina option on, the logo is shown at half its uploaded size so
//! a double-resolution upload stays sharp on dense screens.
//!
//! ```rust
//! # use tinct_customize::logo::{custom_logo, LogoImage};
//! # use tinct_customize::declare::{Declarations, RETINA_LOGO};
//! # use tinct_customize::registry::ColorOptions;
//! # use tinct_customize::settings::{SettingsSnapshot, SettingsStore};
//! # use tinct_customize::validate::RawValue;
//! let mut store = SettingsStore::new();
//! let declarations = Declarations::build(&ColorOptions::default(), &store);
//! store.set(&declarations, RETINA_LOGO, RawValue::Bool(true)).unwrap();
//! let snapshot = SettingsSnapshot::resolve(&declarations, &store);
//!
//! let logo = custom_logo(&snapshot, Some(LogoImage::new("/logo.png", 320, 240))).unwrap();
//! assert_eq!((logo.width, logo.height), (160, 120));
//! ```

use serde::{Deserialize, Serialize};

use crate::settings::SettingsSnapshot;

/// An uploaded logo at its intrinsic size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl LogoImage {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }
}

/// The logo as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomLogo {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub retina: bool,
}

impl CustomLogo {
    /// The logo image linked to the site home, with the site name as `alt`.
    /// Every attribute is escaped.
    pub fn to_html(&self, home_url: &str, site_name: &str) -> String {
        format!(
            "<a href=\"{}\" class=\"custom-logo-link custom-logo\">\
             <img src=\"{}\" width=\"{}\" height=\"{}\" alt=\"{}\" /></a>",
            html_escape::encode_double_quoted_attribute(home_url),
            html_escape::encode_double_quoted_attribute(&self.url),
            self.width,
            self.height,
            html_escape::encode_double_quoted_attribute(site_name),
        )
    }
}

/// Sizes the logo for display. No image means nothing to render.
pub fn custom_logo(snapshot: &SettingsSnapshot, image: Option<LogoImage>) -> Option<CustomLogo> {
    let image = image?;
    let retina = snapshot.retina_logo();
    let (width, height) = if retina {
        (image.width / 2, image.height / 2)
    } else {
        (image.width, image.height)
    };
    Some(CustomLogo {
        url: image.url,
        width,
        height,
        retina,
    })
}

/// Markup for an optional logo; empty when there is none.
pub fn custom_logo_html(logo: Option<&CustomLogo>, home_url: &str, site_name: &str) -> String {
    logo.map(|l| l.to_html(home_url, site_name)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::{Declarations, RETINA_LOGO};
    use crate::registry::ColorOptions;
    use crate::settings::SettingsStore;
    use crate::validate::RawValue;

    fn snapshot(retina: bool) -> SettingsSnapshot {
        let mut store = SettingsStore::new();
        let d = Declarations::build(&ColorOptions::default(), &store);
        store.set(&d, RETINA_LOGO, RawValue::Bool(retina)).unwrap();
        SettingsSnapshot::resolve(&d, &store)
    }

    #[test]
    fn test_retina_halves() {
        let logo = custom_logo(&snapshot(true), Some(LogoImage::new("a.png", 320, 240))).unwrap();
        assert_eq!((logo.width, logo.height), (160, 120));
        assert!(logo.retina);
    }

    #[test]
    fn test_retina_floors_odd_sizes() {
        let logo = custom_logo(&snapshot(true), Some(LogoImage::new("a.png", 321, 99))).unwrap();
        assert_eq!((logo.width, logo.height), (160, 49));
    }

    #[test]
    fn test_without_retina_keeps_size() {
        let logo = custom_logo(&snapshot(false), Some(LogoImage::new("a.png", 320, 240))).unwrap();
        assert_eq!((logo.width, logo.height), (320, 240));
    }

    #[test]
    fn test_absent_image_renders_nothing() {
        let logo = custom_logo(&snapshot(true), None);
        assert_eq!(logo, None);
        assert_eq!(custom_logo_html(logo.as_ref(), "/", "Site"), "");
    }

    #[test]
    fn test_html_links_home_with_site_name() {
        let logo = custom_logo(&snapshot(true), Some(LogoImage::new("/logo.png", 320, 240))).unwrap();
        assert_eq!(
            logo.to_html("https://example.com/", "My Site"),
            "<a href=\"https://example.com/\" class=\"custom-logo-link custom-logo\">\
             <img src=\"/logo.png\" width=\"160\" height=\"120\" alt=\"My Site\" /></a>"
        );
    }

    #[test]
    fn test_html_escapes_attributes() {
        let logo = custom_logo(&snapshot(false), Some(LogoImage::new("a.png?x=\"1\"&y", 10, 10))).unwrap();
        let html = logo.to_html("/?a=1&b=\"2\"", "Fish \"&\" Chips");
        assert!(html.starts_with("<a href=\"/?a=1&amp;b=&quot;2&quot;\" "));
        assert!(html.contains("src=\"a.png?x=&quot;1&quot;&amp;y\""));
        assert!(html.ends_with("alt=\"Fish &quot;&amp;&quot; Chips\" /></a>"));
    }
}
