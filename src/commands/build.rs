// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Build command - writes one release notes document per product and channel

use crate::build::{build_all, plan};
use crate::config::Options;
use crate::store::SqliteStore;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::info;

/// Run the build command
pub fn run(options: &Options, color: bool) -> Result<()> {
    if plan(options).is_empty() {
        eprintln!("Warning: nothing to build. Check --products and --channels.");
        return Ok(());
    }

    info!("Reading {}", options.database.display());
    let store = SqliteStore::open(&options.database)
        .with_context(|| format!("Failed to open database {}", options.database.display()))?;

    let written = build_all(&store, options)?;

    for path in &written {
        if color {
            println!("{} {}", "Done:".green(), path.display());
        } else {
            println!("Done: {}", path.display());
        }
    }

    Ok(())
}
