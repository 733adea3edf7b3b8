//! Derived stylesheets.
//!
//! A [`SettingsSnapshot`] turns into CSS for three rendering contexts. The
//! rule set is the same everywhere: each theme color gets text, hover,
//! background and border utility classes, the first color also styles links
//! and buttons, and the page background gets its own rule. What changes per
//! context is scoping:
//!
//! | Context                          | Scope                      | Custom properties |
//! |----------------------------------|----------------------------|-------------------|
//! | [`StyleContext::FrontEnd`]       | none                       | yes               |
//! | [`StyleContext::BlockEditor`]    | `.editor-styles-wrapper`   | yes               |
//! | [`StyleContext::ClassicEditor`]  | `body#tinymce.wp-editor`   | no                |
//!
//! The classic editor renders inside an isolated frame, so it gets literal
//! values only.
//!
//! Output is one rule per line in a fixed order (custom properties, colors
//! in registry order, background) and is byte-identical for equal snapshots.
//! Cover template rules live in [`crate::cover`], never here.
//!
//! ```rust
//! use tinct_customize::declare::Declarations;
//! use tinct_customize::registry::ColorOptions;
//! use tinct_customize::settings::{SettingsSnapshot, SettingsStore};
//! use tinct_customize::stylesheet::{derive, StyleContext};
//!
//! let store = SettingsStore::new();
//! let declarations = Declarations::build(&ColorOptions::default(), &store);
//! let snapshot = SettingsSnapshot::resolve(&declarations, &store);
//!
//! let css = derive(&snapshot, StyleContext::FrontEnd);
//! assert!(css.css_text.contains(":root { --color-accent: #CD2653;"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::{hover_shade, readable_text_on};
use crate::error::ParseContextError;
use crate::settings::{ResolvedColor, SettingsSnapshot};
use crate::validate::HexColor;

/// Where a derived stylesheet is inlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleContext {
    /// The public site.
    FrontEnd,
    /// The block editor canvas.
    BlockEditor,
    /// The classic editor's content frame.
    ClassicEditor,
}

impl StyleContext {
    pub const ALL: [StyleContext; 3] = [
        StyleContext::FrontEnd,
        StyleContext::BlockEditor,
        StyleContext::ClassicEditor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleContext::FrontEnd => "front-end",
            StyleContext::BlockEditor => "block-editor",
            StyleContext::ClassicEditor => "classic-editor",
        }
    }
}

impl fmt::Display for StyleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleContext {
    type Err = ParseContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleContext::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseContextError(s.to_string()))
    }
}

/// CSS text derived for one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedStylesheet {
    pub context: StyleContext,
    pub css_text: String,
}

impl fmt::Display for DerivedStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_text)
    }
}

/// Derives the stylesheet for `context` from a resolved snapshot.
pub fn derive(snapshot: &SettingsSnapshot, context: StyleContext) -> DerivedStylesheet {
    let css_text = match context {
        StyleContext::FrontEnd => front_end(snapshot),
        StyleContext::BlockEditor => block_editor(snapshot),
        StyleContext::ClassicEditor => classic_editor(snapshot),
    };
    tracing::trace!(%context, bytes = css_text.len(), "derived stylesheet");
    DerivedStylesheet { context, css_text }
}

fn front_end(snapshot: &SettingsSnapshot) -> String {
    let scope = Scope::new("");
    let mut w = RuleWriter::new();
    custom_properties(&mut w, snapshot);
    color_rules(&mut w, &scope, snapshot.colors());
    w.rule(&["body".to_string()], &[("background-color", snapshot.background().as_str())]);
    w.finish()
}

fn block_editor(snapshot: &SettingsSnapshot) -> String {
    let scope = Scope::new(".editor-styles-wrapper");
    let mut w = RuleWriter::new();
    custom_properties(&mut w, snapshot);
    color_rules(&mut w, &scope, snapshot.colors());
    w.rule(&[scope.root()], &[("background-color", snapshot.background().as_str())]);
    w.finish()
}

fn classic_editor(snapshot: &SettingsSnapshot) -> String {
    let scope = Scope::new("body#tinymce.wp-editor");
    let mut w = RuleWriter::new();
    color_rules(&mut w, &scope, snapshot.colors());
    w.rule(&[scope.root()], &[("background-color", snapshot.background().as_str())]);
    w.finish()
}

fn custom_properties(w: &mut RuleWriter, snapshot: &SettingsSnapshot) {
    let mut props: Vec<(String, &str)> = snapshot
        .colors()
        .iter()
        .map(|c| (format!("--color-{}", c.option.slug), c.value.as_str()))
        .collect();
    props.push(("--color-background".to_string(), snapshot.background().as_str()));

    let decls: Vec<(&str, &str)> = props.iter().map(|(p, v)| (p.as_str(), *v)).collect();
    w.rule(&[":root".to_string()], &decls);
}

fn color_rules(w: &mut RuleWriter, scope: &Scope, colors: &[ResolvedColor]) {
    for (i, color) in colors.iter().enumerate() {
        let slug = &color.option.slug;
        let value = color.value.as_str();
        let hover = HexColor::from_rgb(hover_shade(color.value.rgb()));

        w.rule(&[scope.sel(&format!(".color-{}", slug))], &[("color", value)]);
        w.rule(
            &[
                scope.sel(&format!(".color-{}-hover:hover", slug)),
                scope.sel(&format!(".color-{}-hover:focus", slug)),
            ],
            &[("color", hover.as_str())],
        );
        w.rule(&[scope.sel(&format!(".bg-{}", slug))], &[("background-color", value)]);
        w.rule(&[scope.sel(&format!(".border-{}", slug))], &[("border-color", value)]);

        if i == 0 {
            element_rules(w, scope, &color.value, &hover);
        }
    }
}

/// Links and buttons follow the primary color.
fn element_rules(w: &mut RuleWriter, scope: &Scope, value: &HexColor, hover: &HexColor) {
    let text = HexColor::from_rgb(readable_text_on(value.rgb()));

    w.rule(&[scope.sel("a")], &[("color", value.as_str())]);
    w.rule(
        &[scope.sel("a:hover"), scope.sel("a:focus")],
        &[("color", hover.as_str())],
    );
    w.rule(
        &[
            scope.sel("button"),
            scope.sel(".button"),
            scope.sel("input[type=\"submit\"]"),
            scope.sel(".wp-block-button__link"),
        ],
        &[("background-color", value.as_str()), ("color", text.as_str())],
    );
}

/// Selector prefix for a context.
struct Scope {
    prefix: &'static str,
}

impl Scope {
    fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    fn sel(&self, selector: &str) -> String {
        if self.prefix.is_empty() {
            selector.to_string()
        } else {
            format!("{} {}", self.prefix, selector)
        }
    }

    fn root(&self) -> String {
        self.prefix.to_string()
    }
}

/// Writes `selector { property: value; }` rules, one per line.
#[derive(Debug, Default)]
pub(crate) struct RuleWriter {
    out: String,
}

impl RuleWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn rule(&mut self, selectors: &[String], declarations: &[(&str, &str)]) {
        if selectors.is_empty() || declarations.is_empty() {
            return;
        }
        self.out.push_str(&selectors.join(", "));
        self.out.push_str(" {");
        for (property, value) in declarations {
            self.out.push(' ');
            self.out.push_str(property);
            self.out.push_str(": ");
            self.out.push_str(value);
            self.out.push(';');
        }
        self.out.push_str(" }\n");
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}
