//! The `tinct` command line.
//!
//! Every command loads a site file, bootstraps the registry and declarations
//! from it, and prints one derived artifact. Only `set` writes the file back.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use tinct_customize::declare::{LOGO_HEIGHT, LOGO_WIDTH};
use tinct_customize::{
    custom_logo, custom_logo_html, derive, derive_cover, project, CoverPresentation,
    LivePreviewMap, LogoImage, PartialRenderer, RawValue, StyleContext,
};

use crate::config::{Site, SiteConfig};

/// Theme customizer settings and the stylesheets derived from them
#[derive(Debug, Parser)]
#[command(name = "tinct", version, about)]
pub struct Cli {
    /// Site file (.yaml, .yml or .json)
    #[arg(short, long, global = true, default_value = "tinct.yaml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the stylesheet for a rendering context
    Css {
        /// front-end, block-editor or classic-editor
        #[arg(long, default_value = "front-end")]
        context: StyleContext,
    },

    /// Print the Cover template stylesheet partial
    Cover(CoverArgs),

    /// Print the block editor palette and font sizes
    Palette {
        #[arg(long, value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,
    },

    /// Print every setting as resolved from the site file
    Settings {
        #[arg(long, value_enum, default_value_t = DataFormat::Text)]
        format: DataFormat,
    },

    /// Print the live-preview transport of each setting
    Preview,

    /// Validate and store a setting value
    ///
    /// `true` and `false` are stored as booleans, anything else as text.
    Set { key: String, value: String },

    /// Print the custom logo markup
    Logo(LogoArgs),

    /// Render a live-preview partial (blogname or blogdescription)
    Partial { name: PartialRenderer },
}

#[derive(Debug, Args)]
pub struct CoverArgs {
    /// Print the header and overlay classes instead of CSS
    #[arg(long)]
    pub presentation: bool,

    /// Featured image URL, for the presentation output
    #[arg(long, requires = "presentation")]
    pub image: Option<String>,
}

#[derive(Debug, Args)]
pub struct LogoArgs {
    /// Logo image URL; without one there is nothing to render
    #[arg(long)]
    pub url: Option<String>,

    /// Intrinsic width in pixels
    #[arg(long, default_value_t = LOGO_WIDTH)]
    pub width: u32,

    /// Intrinsic height in pixels
    #[arg(long, default_value_t = LOGO_HEIGHT)]
    pub height: u32,

    /// Site home URL the logo links to
    #[arg(long, default_value = "/")]
    pub home: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    Text,
    Json,
    Yaml,
}

/// Runs a parsed command, writing its output to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = SiteConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading site file {}", cli.config.display()))?;
    let site = Site::from_config(&config).context("bootstrapping color registry")?;

    match cli.command {
        Command::Css { context } => {
            write!(out, "{}", derive(&site.snapshot(), context))?;
        }
        Command::Cover(args) => {
            let snapshot = site.snapshot();
            if args.presentation {
                let presentation = CoverPresentation::from_snapshot(&snapshot, args.image.as_deref());
                emit(out, &presentation, DataFormat::Json)?;
            } else {
                write!(out, "{}", derive_cover(&snapshot))?;
            }
        }
        Command::Palette { format } => {
            emit(out, &project(&site.snapshot()), format)?;
        }
        Command::Settings { format } => {
            let snapshot = site.snapshot();
            match format {
                DataFormat::Text => {
                    for (key, value) in snapshot.values() {
                        writeln!(out, "{} = {}", key, value)?;
                    }
                }
                other => {
                    let values: std::collections::BTreeMap<&str, _> = snapshot.values().collect();
                    emit(out, &values, other)?;
                }
            }
        }
        Command::Preview => {
            write!(out, "{}", LivePreviewMap::from_declarations(&site.declarations))?;
        }
        Command::Set { key, value } => {
            set(cli.config, config, site, &key, &value, out)?;
        }
        Command::Logo(args) => {
            let image = args.url.map(|url| LogoImage::new(url, args.width, args.height));
            let logo = custom_logo(&site.snapshot(), image);
            let site_name = site.info.name.as_deref().unwrap_or_default();
            let html = custom_logo_html(logo.as_ref(), &args.home, site_name);
            if !html.is_empty() {
                writeln!(out, "{}", html)?;
            }
        }
        Command::Partial { name } => {
            writeln!(out, "{}", name.render(&site))?;
        }
    }
    Ok(())
}

fn set(
    path: PathBuf,
    mut config: SiteConfig,
    mut site: Site,
    key: &str,
    value: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let raw = match value {
        "true" => RawValue::Bool(true),
        "false" => RawValue::Bool(false),
        text => RawValue::from(text),
    };
    let stored = site
        .store
        .set(&site.declarations, key, raw)
        .with_context(|| format!("setting {}", key))?;

    config.settings = site.store.into_values();
    config
        .save(&path)
        .with_context(|| format!("saving site file {}", path.display()))?;
    tracing::debug!(key, value = %stored, "stored setting");
    writeln!(out, "{} = {}", key, stored)?;
    Ok(())
}

fn emit<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T, format: DataFormat) -> Result<()> {
    match format {
        DataFormat::Json | DataFormat::Text => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        DataFormat::Yaml => {
            write!(out, "{}", serde_yaml::to_string(value)?)?;
        }
    }
    Ok(())
}
