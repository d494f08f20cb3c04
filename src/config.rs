// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Options are layered: built-in defaults, then a TOML file, then
//! `RELNOTES_*` environment variables, then command-line flags.

use anyhow::{Context, Result};
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::release::Suffixes;
use crate::types::{ChannelSlug, ProductSlug};

/// Prefix of environment variables read as options
pub const ENV_PREFIX: &str = "RELNOTES";

/// Options for a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Product slugs to build; non-canonical entries are ignored
    pub products: Vec<String>,
    /// Channel slugs to build; non-canonical entries are ignored
    pub channels: Vec<String>,
    /// Version suffix for aurora releases
    pub aurora_suffix: String,
    /// Version suffix for beta releases
    pub beta_suffix: String,
    /// Version suffix for ESR releases
    pub esr_suffix: String,
    /// Directory the `en-US/...` tree is written under
    pub output_dir: PathBuf,
    /// SQLite database to read
    pub database: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            products: vec!["firefox".into(), "mobile".into()],
            channels: vec!["aurora".into(), "beta".into(), "release".into()],
            aurora_suffix: "a2".into(),
            beta_suffix: "beta".into(),
            esr_suffix: String::new(),
            output_dir: PathBuf::from("output"),
            database: PathBuf::from("relnotes.sqlite"),
        }
    }
}

/// Values given on the command line; `None` keeps the layered value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--products`
    pub products: Option<Vec<String>>,
    /// `--channels`
    pub channels: Option<Vec<String>>,
    /// `--aurora-suffix`
    pub aurora_suffix: Option<String>,
    /// `--beta-suffix`
    pub beta_suffix: Option<String>,
    /// `--esr-suffix`
    pub esr_suffix: Option<String>,
    /// `--output-dir`
    pub output_dir: Option<PathBuf>,
    /// `--database`
    pub database: Option<PathBuf>,
}

impl Options {
    /// Apply command-line overrides on top of the layered values
    pub fn apply(&mut self, overrides: Overrides) {
        let Overrides {
            products,
            channels,
            aurora_suffix,
            beta_suffix,
            esr_suffix,
            output_dir,
            database,
        } = overrides;

        if let Some(v) = products {
            self.products = v;
        }
        if let Some(v) = channels {
            self.channels = v;
        }
        if let Some(v) = aurora_suffix {
            self.aurora_suffix = v;
        }
        if let Some(v) = beta_suffix {
            self.beta_suffix = v;
        }
        if let Some(v) = esr_suffix {
            self.esr_suffix = v;
        }
        if let Some(v) = output_dir {
            self.output_dir = v;
        }
        if let Some(v) = database {
            self.database = v;
        }
    }

    /// Requested products in the canonical set, deduplicated, in order
    #[must_use]
    pub fn product_slugs(&self) -> Vec<ProductSlug> {
        canonical(&self.products, ProductSlug::parse, "product")
    }

    /// Requested channels in the canonical set, deduplicated, in order
    #[must_use]
    pub fn channel_slugs(&self) -> Vec<ChannelSlug> {
        canonical(&self.channels, ChannelSlug::parse, "channel")
    }

    /// Version suffixes keyed by channel
    #[must_use]
    pub fn suffixes(&self) -> Suffixes {
        Suffixes {
            aurora: self.aurora_suffix.clone(),
            beta: self.beta_suffix.clone(),
            esr: self.esr_suffix.clone(),
        }
    }
}

fn canonical<T: PartialEq>(raw: &[String], parse: fn(&str) -> Option<T>, what: &str) -> Vec<T> {
    let mut out = Vec::new();
    for s in raw {
        match parse(s) {
            Some(slug) if !out.contains(&slug) => out.push(slug),
            Some(_) => {}
            None => debug!("Skipping unknown {} {:?}", what, s),
        }
    }
    out
}

/// Default config file location, if the platform has one
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "hyperpolymath", "relnotes")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load options from defaults, a config file and the environment.
///
/// An explicit `config_path` must exist; the default location is optional.
pub fn load(config_path: Option<&Path>) -> Result<Options> {
    let defaults = config::Config::try_from(&Options::default())
        .context("Failed to build default configuration")?;

    let mut builder = config::Config::builder().add_source(defaults);

    match config_path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        None => {
            if let Some(path) = default_config_path() {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
            }
        }
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("products")
            .with_list_parse_key("channels"),
    );

    builder
        .build()
        .context("Failed to load configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}
