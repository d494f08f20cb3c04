// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Data access for release metadata and notes
//!
//! Every component that reads the store goes through [`ReleaseStore`], so a
//! build can run against SQLite or against [`memory::MemoryStore`] in tests.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::types::ChannelSlug;
use tracing::warn;

/// A row of the Products table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    /// Primary key
    pub id: i64,
    /// Free-text descriptor
    pub text: Option<String>,
}

/// A row of the Channels table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRow {
    /// Primary key
    pub id: i64,
}

/// The columns of a Releases row the resolver consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRow {
    /// Major version, integer-like
    pub version: String,
    /// Patch level, integer-like
    pub sub_version: String,
    /// `YYYY-MM-DD`
    pub release_date: String,
    /// Free-text release blurb
    pub release_text: String,
}

/// A channel referenced by a note, with its joined display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChannel {
    /// Foreign key into Channels
    pub id: i64,
    /// `channel_name` of the referenced row, if it exists
    pub name: Option<String>,
}

impl NoteChannel {
    /// Chronological rank of the referenced channel, `None` when unknown
    #[must_use]
    pub fn rank(&self) -> Option<u8> {
        self.name.as_deref().and_then(ChannelSlug::rank_of_name)
    }
}

/// A Notes row joined with its tag and channel names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteRow {
    /// Bug reference; absent for what's-new entries
    pub bug_num: Option<i64>,
    /// Note body
    pub description: Option<String>,
    /// `Tags.tag_text`
    pub tag_text: Option<String>,
    /// `Tags.sort_num`
    pub tag_sort: Option<i64>,
    /// Version in which the note was fixed/landed
    pub fixed_in_version: Option<i64>,
    /// ESR sub-version in which the note landed
    pub fixed_in_subversion: Option<i64>,
    /// Channel in which the note was fixed/landed
    pub fixed_in_channel: Option<NoteChannel>,
    /// Version in which a known issue first appeared
    pub first_version: Option<i64>,
    /// Channel in which a known issue first appeared
    pub first_channel: Option<NoteChannel>,
    /// `Notes.sort_num`
    pub sort_num: Option<i64>,
}

/// Which notes a candidate query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteScope {
    /// Product id; notes with no product match every scope
    pub product: Option<i64>,
    /// `true` for notes carrying a bug reference
    pub with_bug: bool,
}

impl NoteScope {
    /// Whether a note with the given product and bug columns is in scope
    #[must_use]
    pub fn admits(&self, product: Option<i64>, bug_num: Option<i64>) -> bool {
        let product_ok = product.is_none() || (self.product.is_some() && product == self.product);
        product_ok && bug_num.is_some() == self.with_bug
    }
}

/// Typed read access to the release-notes store
pub trait ReleaseStore {
    /// Look up a product by display name
    fn product_by_name(&self, name: &str) -> Result<Option<ProductRow>, StoreError>;

    /// Look up a channel by display name
    fn channel_by_name(&self, name: &str) -> Result<Option<ChannelRow>, StoreError>;

    /// The release with the latest date for a product/channel pair
    fn latest_release(&self, product: i64, channel: i64) -> Result<Option<ReleaseRow>, StoreError>;

    /// Notes in scope, in storage order
    fn notes(&self, scope: NoteScope) -> Result<Vec<NoteRow>, StoreError>;
}

/// Unwrap a store result, logging a fault and substituting `fallback`.
///
/// Lookups never fail a build: a query error degrades the same way a
/// missing row does.
pub(crate) fn or_fallback<T>(result: Result<T, StoreError>, what: &str, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{} failed, using fallback: {}", what, e);
            fallback
        }
    }
}
