//! Block editor palette.
//!
//! The block editor offers theme colors and font sizes as presets. Colors
//! come from the same snapshot as the stylesheets, so the editor palette and
//! the utility classes never disagree.

use serde::Serialize;

use crate::settings::SettingsSnapshot;
use crate::validate::HexColor;

/// One editor color preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    pub name: String,
    pub slug: String,
    pub color: HexColor,
}

/// One editor font-size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSize {
    pub name: &'static str,
    pub short_name: &'static str,
    pub size: u32,
    pub slug: &'static str,
}

/// Font sizes offered to the editor, smallest first.
pub const FONT_SIZES: [FontSize; 4] = [
    FontSize {
        name: "Small",
        short_name: "S",
        size: 16,
        slug: "small",
    },
    FontSize {
        name: "Regular",
        short_name: "M",
        size: 18,
        slug: "regular",
    },
    FontSize {
        name: "Large",
        short_name: "L",
        size: 24,
        slug: "large",
    },
    FontSize {
        name: "Larger",
        short_name: "XL",
        size: 32,
        slug: "larger",
    },
];

/// Slug of the trailing background entry.
pub const BACKGROUND_SLUG: &str = "background";

/// Editor palette configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorPalette {
    pub color_palette: Vec<PaletteColor>,
    pub font_sizes: Vec<FontSize>,
}

/// Projects the editor palette: every registered color in registry order,
/// then the background color.
pub fn project(snapshot: &SettingsSnapshot) -> EditorPalette {
    let mut color_palette: Vec<PaletteColor> = snapshot
        .colors()
        .iter()
        .map(|c| PaletteColor {
            name: c.option.label.clone(),
            slug: c.option.slug.clone(),
            color: c.value.clone(),
        })
        .collect();

    color_palette.push(PaletteColor {
        name: "Background Color".to_string(),
        slug: BACKGROUND_SLUG.to_string(),
        color: snapshot.background().clone(),
    });

    EditorPalette {
        color_palette,
        font_sizes: FONT_SIZES.to_vec(),
    }
}
