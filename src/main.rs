// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Relnotes CLI - static JSON release notes for a product line

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use relnotes::commands;
use relnotes::config::{self, Options, Overrides};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relnotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, env = "RELNOTES_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR", global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads the store
#[derive(Args, Debug, Default)]
struct StoreArgs {
    /// SQLite database with release notes
    #[arg(long)]
    database: Option<PathBuf>,

    /// Suffix for aurora release versions
    #[arg(long)]
    aurora_suffix: Option<String>,

    /// Suffix for beta release versions
    #[arg(long)]
    beta_suffix: Option<String>,

    /// Suffix for ESR release versions
    #[arg(long)]
    esr_suffix: Option<String>,
}

impl StoreArgs {
    fn into_overrides(self) -> Overrides {
        Overrides {
            aurora_suffix: self.aurora_suffix,
            beta_suffix: self.beta_suffix,
            esr_suffix: self.esr_suffix,
            database: self.database,
            ..Overrides::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate release notes documents
    Build {
        /// Location for the generated files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Comma-separated products to create notes for
        #[arg(short, long, value_delimiter = ',')]
        products: Option<Vec<String>>,

        /// Comma-separated channels to create notes for
        #[arg(short, long, value_delimiter = ',')]
        channels: Option<Vec<String>>,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print one release notes document to stdout
    Show {
        /// Product slug (firefox, mobile, esr)
        product: String,

        /// Channel slug (aurora, beta, release, esr)
        channel: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn load_options(config_path: Option<&Path>, overrides: Overrides) -> Result<Options> {
    let mut options = config::load(config_path)?;
    options.apply(overrides);
    Ok(options)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let color = !cli.no_color;

    // Execute command
    match cli.command {
        Commands::Build { output_dir, products, channels, store } => {
            let overrides = Overrides {
                products,
                channels,
                output_dir,
                ..store.into_overrides()
            };
            let options = load_options(config_path, overrides)?;
            commands::build::run(&options, color)
        }
        Commands::Show { product, channel, store } => {
            let options = load_options(config_path, store.into_overrides())?;
            commands::show::run(&options, &product, &channel)
        }
        Commands::Config => {
            let options = load_options(config_path, Overrides::default())?;
            commands::config::run(&options)
        }
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    }
}
