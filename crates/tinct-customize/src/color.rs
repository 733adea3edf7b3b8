//! Color math for derived shades and readable text.
//!
//! Stylesheets need a few colors that nobody configures directly: the hover
//! shade of each theme color, and a text color that stays readable on top of
//! it. Both are computed here.
//!
//! # Shades in CIE LAB
//!
//! Shades are computed by moving the LAB lightness channel and converting
//! back to sRGB. LAB is perceptually uniform, so a 10-point step looks like
//! the same amount of change for a pale yellow and a deep blue, which an RGB
//! multiply does not give you.
//!
//! # Contrast
//!
//! [`relative_luminance`] and [`contrast_ratio`] follow the WCAG 2.x
//! definitions. [`readable_text_on`] picks black or white, whichever
//! contrasts more with a background.
//!
//! ```rust
//! use tinct_customize::color::{contrast_ratio, hover_shade, Rgb};
//!
//! let accent = Rgb(205, 38, 83);
//! let hover = hover_shade(accent);
//! assert_ne!(hover, accent);
//! assert!((contrast_ratio(Rgb(0, 0, 0), Rgb(255, 255, 255)) - 21.0).abs() < 0.01);
//! ```

/// A simple RGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}

/// Lightness step used for hover shades.
pub const HOVER_STEP: f64 = 10.0;

/// Colors lighter than this LAB lightness get darker on hover; the rest
/// get lighter.
const HOVER_PIVOT: f64 = 50.0;

// ─── CIE LAB internals ─────────────────────────────────────────────────────

/// CIE LAB color, used only while computing shades.
#[derive(Debug, Clone, Copy)]
struct Lab {
    l: f64,
    a: f64,
    b: f64,
}

/// D65 reference white for the XYZ to LAB step.
const XN: f64 = 0.95047;
const YN: f64 = 1.00000;
const ZN: f64 = 1.08883;

/// sRGB channel (0–255) to linear light (0.0–1.0).
fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear light back to an sRGB channel, clamped to the gamut.
fn linear_to_srgb(c: f64) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let s = if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

/// Forward LAB companding.
fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// Inverse of [`lab_f`].
fn lab_f_inv(t: f64) -> f64 {
    if t > 0.206896 {
        t * t * t
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

/// [`Rgb`] to CIE LAB through XYZ under D65.
fn rgb_to_lab(rgb: Rgb) -> Lab {
    let r = srgb_to_linear(rgb.0);
    let g = srgb_to_linear(rgb.1);
    let b = srgb_to_linear(rgb.2);

    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// CIE LAB back to [`Rgb`] through XYZ under D65. Out-of-gamut channels clamp.
fn lab_to_rgb(lab: Lab) -> Rgb {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let x = XN * lab_f_inv(fx);
    let y = YN * lab_f_inv(fy);
    let z = ZN * lab_f_inv(fz);

    let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

    Rgb(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

// ─── Public operations ─────────────────────────────────────────────────────

/// LAB lightness of a color, 0 (black) to 100 (white).
pub fn lightness(rgb: Rgb) -> f64 {
    rgb_to_lab(rgb).l
}

/// Moves a color's LAB lightness by `delta` (negative darkens), clamped to 0..=100.
pub fn shade(rgb: Rgb, delta: f64) -> Rgb {
    let lab = rgb_to_lab(rgb);
    lab_to_rgb(Lab {
        l: (lab.l + delta).clamp(0.0, 100.0),
        ..lab
    })
}

/// The hover shade for a theme color: light colors darken, dark colors lighten.
pub fn hover_shade(rgb: Rgb) -> Rgb {
    if lightness(rgb) > HOVER_PIVOT {
        shade(rgb, -HOVER_STEP)
    } else {
        shade(rgb, HOVER_STEP)
    }
}

/// WCAG relative luminance, 0.0 to 1.0.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * srgb_to_linear(rgb.0) + 0.7152 * srgb_to_linear(rgb.1) + 0.0722 * srgb_to_linear(rgb.2)
}

/// WCAG contrast ratio between two colors, 1.0 to 21.0. Symmetric.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Black or white, whichever reads better on `background`. Ties go to white.
pub fn readable_text_on(background: Rgb) -> Rgb {
    if contrast_ratio(background, Rgb::WHITE) >= contrast_ratio(background, Rgb::BLACK) {
        Rgb::WHITE
    } else {
        Rgb::BLACK
    }
}
