// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Channel repository

use serde::Serialize;
use tracing::debug;

use crate::store::{or_fallback, ReleaseStore};
use crate::types::ChannelSlug;

/// A channel resolved against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Channel {
    /// Canonical slug (not part of the document)
    #[serde(skip)]
    pub slug: ChannelSlug,
    /// Display name
    pub name: &'static str,
    /// Channels.id; absent when the store has no row for this channel
    pub id: Option<i64>,
}

impl Channel {
    /// Resolve a channel by slug
    pub fn resolve<S: ReleaseStore + ?Sized>(store: &S, slug: ChannelSlug) -> Self {
        let name = slug.display_name();
        let row = or_fallback(store.channel_by_name(name), "Channel lookup", None);
        if row.is_none() {
            debug!("No Channels row for {:?}", name);
        }

        Self {
            slug,
            name,
            id: row.map(|r| r.id),
        }
    }
}
