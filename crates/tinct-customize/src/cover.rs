//! Cover template partial.
//!
//! The Cover template draws a full-bleed featured image with a color overlay.
//! Its overlay color, text color, opacity, blend mode and fixed attachment
//! apply to that template only, so they are derived here and never appear in
//! the global stylesheets.

use serde::Serialize;

use crate::settings::SettingsSnapshot;
use crate::stylesheet::RuleWriter;

/// Derives the Cover template stylesheet partial.
///
/// Emits, in order: overlay color, overlay text color, the fixed attachment
/// rule (only when enabled), the opacity class rule and the blend-mode class
/// rule for the resolved values.
pub fn derive_cover(snapshot: &SettingsSnapshot) -> String {
    let cover = snapshot.cover();
    let mut w = RuleWriter::new();

    w.rule(
        &[".cover-header .cover-color-overlay".to_string()],
        &[("color", cover.overlay_color.as_str())],
    );
    w.rule(
        &[".cover-header .cover-header-inner-wrapper".to_string()],
        &[("color", cover.overlay_text_color.as_str())],
    );
    if cover.fixed_background {
        w.rule(
            &[".cover-header.bg-attachment-fixed".to_string()],
            &[("background-attachment", "fixed")],
        );
    }

    let opacity = opacity_fraction(&cover.opacity);
    w.rule(
        &[format!(".cover-color-overlay.opacity-{}", cover.opacity)],
        &[("opacity", opacity.as_str())],
    );
    w.rule(
        &[format!(".cover-color-overlay.blend-mode-{}", cover.blend_mode)],
        &[("mix-blend-mode", cover.blend_mode.as_str())],
    );

    let css = w.finish();
    tracing::trace!(bytes = css.len(), "derived cover stylesheet");
    css
}

/// `"80"` becomes `"0.8"`, `"100"` becomes `"1"`.
fn opacity_fraction(percent: &str) -> String {
    let n: u32 = percent.parse().unwrap_or(80);
    format!("{}", f64::from(n.min(100)) / 100.0)
}

/// Makes an image URL safe inside `url( )` in a `style` attribute.
///
/// Only `http`, `https` and scheme-less URLs are kept. Bytes outside the URL
/// character set, plus anything that could close the `url( )` or the
/// declaration, are percent-encoded; `&` is then escaped for the attribute.
fn css_image_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    if let Some((scheme, _)) = url.split_once(':') {
        let is_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if is_scheme && !matches!(scheme.to_ascii_lowercase().as_str(), "http" | "https") {
            tracing::debug!(url, "dropping cover image with unsupported scheme");
            return None;
        }
    }

    let mut encoded = String::with_capacity(url.len());
    for byte in url.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => encoded.push(byte as char),
            b'-' | b'.' | b'_' | b'~' | b':' | b'/' | b'?' | b'#' | b'[' | b']' | b'@' | b'!'
            | b'$' | b'&' | b'*' | b'+' | b',' | b'=' | b'%' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    Some(html_escape::encode_double_quoted_attribute(&encoded).into_owned())
}

/// Classes and inline style carried by the Cover header markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverPresentation {
    /// Classes of the outer header element.
    pub header_classes: Vec<String>,
    /// Inline style of the header element, when there is an image.
    pub header_style: Option<String>,
    /// Classes of the color overlay element.
    pub overlay_classes: Vec<String>,
    /// Inline style of the overlay element.
    pub overlay_style: String,
}

impl CoverPresentation {
    pub fn from_snapshot(snapshot: &SettingsSnapshot, image_url: Option<&str>) -> Self {
        let cover = snapshot.cover();

        let mut header_classes: Vec<String> = ["cover-header", "screen-height", "screen-width"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let header_style = image_url.and_then(css_image_url).map(|url| {
            header_classes.push("bg-image".to_string());
            format!("background-image: url( {} );", url)
        });
        if cover.fixed_background {
            header_classes.push("bg-attachment-fixed".to_string());
        }

        let overlay_classes = vec![
            "cover-color-overlay".to_string(),
            "color-accent".to_string(),
            format!("opacity-{}", cover.opacity),
            format!("blend-mode-{}", cover.blend_mode),
        ];

        Self {
            header_classes,
            header_style,
            overlay_classes,
            overlay_style: format!("color: {};", cover.overlay_color),
        }
    }

    /// Header classes joined for a `class` attribute.
    pub fn header_class_attr(&self) -> String {
        self.header_classes.join(" ")
    }

    /// Overlay classes joined for a `class` attribute.
    pub fn overlay_class_attr(&self) -> String {
        self.overlay_classes.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declare::{
        Declarations, COVER_FIXED_BACKGROUND, COVER_OVERLAY_BLEND_MODE, COVER_OVERLAY_OPACITY,
    };
    use crate::registry::ColorOptions;
    use crate::settings::SettingsStore;
    use crate::validate::RawValue;
    use insta::assert_snapshot;

    fn snapshot(pairs: &[(&str, RawValue)]) -> SettingsSnapshot {
        let d = Declarations::build(&ColorOptions::default(), &SettingsStore::new());
        let mut store = SettingsStore::new();
        for (k, v) in pairs {
            store.set(&d, k, v.clone()).unwrap();
        }
        SettingsSnapshot::resolve(&d, &store)
    }

    #[test]
    fn test_default_cover_css() {
        let css = derive_cover(&snapshot(&[]));
        assert_snapshot!(css, @r"
        .cover-header .cover-color-overlay { color: #CD2653; }
        .cover-header .cover-header-inner-wrapper { color: #FFFFFF; }
        .cover-header.bg-attachment-fixed { background-attachment: fixed; }
        .cover-color-overlay.opacity-80 { opacity: 0.8; }
        .cover-color-overlay.blend-mode-multiply { mix-blend-mode: multiply; }
        ");
    }

    #[test]
    fn test_fixed_background_off() {
        let css = derive_cover(&snapshot(&[(COVER_FIXED_BACKGROUND, RawValue::Bool(false))]));
        assert!(!css.contains("bg-attachment-fixed"));
    }

    #[test]
    fn test_opacity_and_blend_follow_settings() {
        let css = derive_cover(&snapshot(&[
            (COVER_OVERLAY_OPACITY, RawValue::from("0")),
            (COVER_OVERLAY_BLEND_MODE, RawValue::from("color-dodge")),
        ]));
        assert!(css.contains(".cover-color-overlay.opacity-0 { opacity: 0; }"));
        assert!(css.contains(".blend-mode-color-dodge { mix-blend-mode: color-dodge; }"));
    }

    #[test]
    fn test_opacity_fraction() {
        assert_eq!(opacity_fraction("100"), "1");
        assert_eq!(opacity_fraction("10"), "0.1");
        assert_eq!(opacity_fraction("0"), "0");
    }

    #[test]
    fn test_presentation_default() {
        let p = CoverPresentation::from_snapshot(&snapshot(&[]), None);
        assert_eq!(p.header_class_attr(), "cover-header screen-height screen-width bg-attachment-fixed");
        assert_eq!(
            p.overlay_class_attr(),
            "cover-color-overlay color-accent opacity-80 blend-mode-multiply"
        );
        assert_eq!(p.overlay_style, "color: #CD2653;");
        assert_eq!(p.header_style, None);
    }

    #[test]
    fn test_presentation_with_image() {
        let p = CoverPresentation::from_snapshot(
            &snapshot(&[(COVER_FIXED_BACKGROUND, RawValue::Bool(false))]),
            Some("https://example.com/cover.jpg"),
        );
        assert_eq!(p.header_class_attr(), "cover-header screen-height screen-width bg-image");
        assert_eq!(
            p.header_style.as_deref(),
            Some("background-image: url( https://example.com/cover.jpg );")
        );
    }

    #[test]
    fn test_image_url_cannot_break_out_of_style() {
        let p = CoverPresentation::from_snapshot(
            &snapshot(&[]),
            Some("x.jpg ); } body { display:none"),
        );
        assert_eq!(
            p.header_style.as_deref(),
            Some("background-image: url( x.jpg%20%29%3B%20%7D%20body%20%7B%20display:none );")
        );
    }

    #[test]
    fn test_image_url_escaped_for_attribute() {
        assert_eq!(
            css_image_url("https://example.com/a b.jpg?w=1&h=2").as_deref(),
            Some("https://example.com/a%20b.jpg?w=1&amp;h=2")
        );
        assert_eq!(
            css_image_url("/uploads/\"quoted\".jpg").as_deref(),
            Some("/uploads/%22quoted%22.jpg")
        );
    }

    #[test]
    fn test_image_url_unsafe_scheme_dropped() {
        let p = CoverPresentation::from_snapshot(&snapshot(&[]), Some("javascript:alert(1)"));
        assert_eq!(p.header_style, None);
        assert!(!p.header_classes.iter().any(|c| c == "bg-image"));
        assert_eq!(css_image_url("   "), None);
    }
}
