// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! In-memory release store for tests and fixtures

use super::{ChannelRow, NoteRow, NoteScope, ProductRow, ReleaseRow, ReleaseStore};
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct StoredRelease {
    product: i64,
    channel: i64,
    row: ReleaseRow,
}

#[derive(Debug, Clone)]
struct StoredNote {
    product: Option<i64>,
    row: NoteRow,
}

/// A [`ReleaseStore`] holding its rows in vectors
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    products: Vec<(String, ProductRow)>,
    channels: Vec<(String, ChannelRow)>,
    releases: Vec<StoredRelease>,
    notes: Vec<StoredNote>,
    unreachable: bool,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every query fails
    #[must_use]
    pub fn unreachable() -> Self {
        Self { unreachable: true, ..Self::default() }
    }

    /// Add a Products row
    #[must_use]
    pub fn with_product(mut self, id: i64, name: &str, text: Option<&str>) -> Self {
        self.products.push((name.to_string(), ProductRow { id, text: text.map(String::from) }));
        self
    }

    /// Add a Channels row
    #[must_use]
    pub fn with_channel(mut self, id: i64, name: &str) -> Self {
        self.channels.push((name.to_string(), ChannelRow { id }));
        self
    }

    /// Add a Releases row
    #[must_use]
    pub fn with_release(mut self, product: i64, channel: i64, row: ReleaseRow) -> Self {
        self.releases.push(StoredRelease { product, channel, row });
        self
    }

    /// Add a Notes row scoped to `product` (`None` for every product)
    #[must_use]
    pub fn with_note(mut self, product: Option<i64>, row: NoteRow) -> Self {
        self.notes.push(StoredNote { product, row });
        self
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unreachable {
            return Err(StoreError::Query("store unreachable".into()));
        }
        Ok(())
    }
}

impl ReleaseStore for MemoryStore {
    fn product_by_name(&self, name: &str) -> Result<Option<ProductRow>, StoreError> {
        self.check()?;
        Ok(self.products.iter().find(|(n, _)| n == name).map(|(_, row)| row.clone()))
    }

    fn channel_by_name(&self, name: &str) -> Result<Option<ChannelRow>, StoreError> {
        self.check()?;
        Ok(self.channels.iter().find(|(n, _)| n == name).map(|(_, row)| *row))
    }

    fn latest_release(&self, product: i64, channel: i64) -> Result<Option<ReleaseRow>, StoreError> {
        self.check()?;
        // first row wins among equal dates
        let latest = self
            .releases
            .iter()
            .filter(|r| r.product == product && r.channel == channel)
            .fold(None::<&StoredRelease>, |best, r| match best {
                Some(b) if b.row.release_date >= r.row.release_date => Some(b),
                _ => Some(r),
            });
        Ok(latest.map(|r| r.row.clone()))
    }

    fn notes(&self, scope: NoteScope) -> Result<Vec<NoteRow>, StoreError> {
        self.check()?;
        Ok(self
            .notes
            .iter()
            .filter(|n| scope.admits(n.product, n.row.bug_num))
            .map(|n| n.row.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(version: &str, date: &str) -> ReleaseRow {
        ReleaseRow {
            version: version.into(),
            sub_version: "0".into(),
            release_date: date.into(),
            release_text: String::new(),
        }
    }

    #[test]
    fn test_latest_release_picks_newest_date() {
        let store = MemoryStore::new()
            .with_release(1, 2, release("19", "2019-12-01"))
            .with_release(1, 2, release("20", "2020-01-01"))
            .with_release(1, 3, release("21", "2020-02-01"));

        let latest = store.latest_release(1, 2).unwrap().unwrap();
        assert_eq!(latest.version, "20");
        assert!(store.latest_release(2, 2).unwrap().is_none());
    }

    #[test]
    fn test_latest_release_tie_keeps_first_row() {
        let store = MemoryStore::new()
            .with_release(1, 2, release("20", "2020-01-01"))
            .with_release(1, 2, release("99", "2020-01-01"));

        assert_eq!(store.latest_release(1, 2).unwrap().unwrap().version, "20");
    }

    #[test]
    fn test_unreachable_store_errors() {
        let store = MemoryStore::unreachable();
        assert!(store.product_by_name("Firefox").is_err());
        assert!(store.notes(NoteScope { product: None, with_bug: false }).is_err());
    }
}
