// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Config command - prints the effective options

use crate::config::Options;
use anyhow::{Context, Result};

/// Print the merged options as TOML
pub fn run(options: &Options) -> Result<()> {
    let text = toml::to_string_pretty(options).context("Failed to render configuration")?;
    print!("{text}");
    Ok(())
}
