// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Build orchestration: which documents to generate and where to write them

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Options;
use crate::release::{Release, Suffixes};
use crate::store::ReleaseStore;
use crate::types::{ChannelSlug, ProductSlug};

/// One sweep over the cross-product of products and channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    /// Products to build
    pub products: Vec<ProductSlug>,
    /// Channels to build for every product
    pub channels: Vec<ChannelSlug>,
}

impl Pass {
    /// Every (product, channel) pair, product-major
    pub fn pairs(&self) -> impl Iterator<Item = (ProductSlug, ChannelSlug)> + '_ {
        self.products
            .iter()
            .flat_map(move |&p| self.channels.iter().map(move |&c| (p, c)))
    }
}

/// Split the requested products and channels into passes.
///
/// ESR is always built on its own: if it is requested as a product or a
/// channel, the first pass is ESR/ESR and ESR is removed from the rest.
#[must_use]
pub fn plan(options: &Options) -> Vec<Pass> {
    let mut products = options.product_slugs();
    let mut channels = options.channel_slugs();
    let mut passes = Vec::new();

    if products.contains(&ProductSlug::Esr) || channels.contains(&ChannelSlug::Esr) {
        passes.push(Pass {
            products: vec![ProductSlug::Esr],
            channels: vec![ChannelSlug::Esr],
        });
        products.retain(|p| *p != ProductSlug::Esr);
        channels.retain(|c| *c != ChannelSlug::Esr);
    }

    if !products.is_empty() && !channels.is_empty() {
        passes.push(Pass { products, channels });
    }

    passes
}

/// Write a release's document under `output_dir`, returning the file path
pub fn write_release(output_dir: &Path, release: &Release) -> Result<PathBuf> {
    let dir = output_dir.join(release.path());
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(release.filename());
    let json = release.to_json()?;
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Build one release per planned pair and write each to disk
pub fn build_all<S: ReleaseStore + ?Sized>(store: &S, options: &Options) -> Result<Vec<PathBuf>> {
    let suffixes: Suffixes = options.suffixes();
    let mut written = Vec::new();

    for pass in plan(options) {
        debug!("Building pass {:?}", pass);
        for (product, channel) in pass.pairs() {
            let release = Release::resolve(store, product, channel, &suffixes);
            written.push(write_release(&options.output_dir, &release)?);
        }
    }

    Ok(written)
}
