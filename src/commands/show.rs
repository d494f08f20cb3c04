// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Show command - prints a single release document without writing files

use crate::config::Options;
use crate::release::Release;
use crate::store::SqliteStore;
use crate::types::{ChannelSlug, ProductSlug};
use anyhow::{Context, Result};
use std::io::Write;

/// Run the show command
pub fn run(options: &Options, product: &str, channel: &str) -> Result<()> {
    let product = ProductSlug::parse(product)
        .ok_or_else(|| anyhow::anyhow!("Unknown product: {}. Valid: firefox, mobile, esr", product))?;
    let channel = ChannelSlug::parse(channel).ok_or_else(|| {
        anyhow::anyhow!("Unknown channel: {}. Valid: aurora, beta, release, esr", channel)
    })?;

    let store = SqliteStore::open(&options.database)
        .with_context(|| format!("Failed to open database {}", options.database.display()))?;

    let release = Release::resolve(&store, product, channel, &options.suffixes());
    let json = release.to_json()?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;

    Ok(())
}
