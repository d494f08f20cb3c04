// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! SQLite-backed release store

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use super::{ChannelRow, NoteChannel, NoteRow, NoteScope, ProductRow, ReleaseRow, ReleaseStore};
use crate::error::StoreError;

/// Tables this store reads. Used to create fixture databases.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Products (
    id INTEGER PRIMARY KEY,
    product_name TEXT NOT NULL,
    product_text TEXT
);
CREATE TABLE IF NOT EXISTS Channels (
    id INTEGER PRIMARY KEY,
    channel_name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS Tags (
    id INTEGER PRIMARY KEY,
    tag_text TEXT,
    sort_num INTEGER
);
CREATE TABLE IF NOT EXISTS Releases (
    id INTEGER PRIMARY KEY,
    product INTEGER REFERENCES Products(id),
    channel INTEGER REFERENCES Channels(id),
    version INTEGER,
    sub_version INTEGER,
    release_date TEXT,
    release_text TEXT
);
CREATE TABLE IF NOT EXISTS Notes (
    id INTEGER PRIMARY KEY,
    bug_num INTEGER,
    description TEXT,
    tag INTEGER REFERENCES Tags(id),
    product INTEGER REFERENCES Products(id),
    fixed_in_version INTEGER,
    fixed_in_subversion INTEGER,
    fixed_in_channel INTEGER REFERENCES Channels(id),
    first_version INTEGER,
    first_channel INTEGER REFERENCES Channels(id),
    sort_num INTEGER
);
";

const NOTES_QUERY: &str = "
SELECT Notes.bug_num, Notes.description, Tags.tag_text, Tags.sort_num,
       Notes.fixed_in_version, Notes.fixed_in_subversion,
       Notes.fixed_in_channel, fixed_ch.channel_name,
       Notes.first_version, Notes.first_channel, first_ch.channel_name,
       Notes.sort_num
FROM Notes
LEFT OUTER JOIN Tags ON Notes.tag = Tags.id
LEFT OUTER JOIN Channels AS fixed_ch ON Notes.fixed_in_channel = fixed_ch.id
LEFT OUTER JOIN Channels AS first_ch ON Notes.first_channel = first_ch.id
WHERE (Notes.bug_num IS NOT NULL) = ?1
  AND (Notes.product IS NULL OR Notes.product = ?2)
ORDER BY Notes.rowid
";

/// `SqliteStore` reads release notes from a SQLite database via rusqlite.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database read-only.
    ///
    /// Fails if the file is missing or is not a SQLite database.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| StoreError::Open(format!("{}: {e}", path.display())))?;

        // sqlite opens lazily; touch the header so a bad file fails here
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get::<_, i64>(0))
            .map_err(|e| StoreError::Open(format!("{}: {e}", path.display())))?;

        debug!("Opened store {}", path.display());
        Ok(Self { conn })
    }

    /// Create an empty in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open(e.to_string()))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Wrap an already-open connection
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection, for seeding fixture data
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ReleaseStore for SqliteStore {
    fn product_by_name(&self, name: &str) -> Result<Option<ProductRow>, StoreError> {
        debug!("Looking up product {:?}", name);
        let row = self
            .conn
            .query_row(
                "SELECT id, product_text FROM Products WHERE product_name = ?1 LIMIT 1",
                params![name],
                |row| Ok((row.get::<_, Option<i64>>(0)?, text_at(row, 1))),
            )
            .optional()?;

        match row {
            Some((Some(id), text)) => Ok(Some(ProductRow { id, text: text? })),
            _ => Ok(None),
        }
    }

    fn channel_by_name(&self, name: &str) -> Result<Option<ChannelRow>, StoreError> {
        debug!("Looking up channel {:?}", name);
        let id = self
            .conn
            .query_row(
                "SELECT id FROM Channels WHERE channel_name = ?1 LIMIT 1",
                params![name],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;

        Ok(id.flatten().map(|id| ChannelRow { id }))
    }

    fn latest_release(&self, product: i64, channel: i64) -> Result<Option<ReleaseRow>, StoreError> {
        debug!("Looking up latest release for product={} channel={}", product, channel);
        let row = self
            .conn
            .query_row(
                "SELECT version, sub_version, release_date, release_text FROM Releases \
                 WHERE product = ?1 AND channel = ?2 \
                 ORDER BY release_date DESC LIMIT 1",
                params![product, channel],
                |row| Ok([text_at(row, 0), text_at(row, 1), text_at(row, 2), text_at(row, 3)]),
            )
            .optional()?;

        let Some([version, sub_version, release_date, release_text]) = row else {
            return Ok(None);
        };

        Ok(Some(ReleaseRow {
            version: version?.unwrap_or_default(),
            sub_version: sub_version?.unwrap_or_default(),
            release_date: release_date?.unwrap_or_default(),
            release_text: release_text?.unwrap_or_default(),
        }))
    }

    fn notes(&self, scope: NoteScope) -> Result<Vec<NoteRow>, StoreError> {
        debug!("Querying notes {:?}", scope);
        let mut stmt = self.conn.prepare(NOTES_QUERY)?;
        let rows = stmt.query_map(params![scope.with_bug, scope.product], |row| {
            Ok(decode_note(row))
        })?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row??);
        }
        Ok(result)
    }
}

/// Decode one row of [`NOTES_QUERY`]
fn decode_note(row: &rusqlite::Row<'_>) -> Result<NoteRow, StoreError> {
    Ok(NoteRow {
        bug_num: int_at(row, 0)?,
        description: text_at(row, 1)?,
        tag_text: text_at(row, 2)?,
        tag_sort: int_at(row, 3)?,
        fixed_in_version: int_at(row, 4)?,
        fixed_in_subversion: int_at(row, 5)?,
        fixed_in_channel: channel_at(row, 6, 7)?,
        first_version: int_at(row, 8)?,
        first_channel: channel_at(row, 9, 10)?,
        sort_num: int_at(row, 11)?,
    })
}

fn channel_at(row: &rusqlite::Row<'_>, id: usize, name: usize) -> Result<Option<NoteChannel>, StoreError> {
    let Some(id) = int_at(row, id)? else {
        return Ok(None);
    };
    Ok(Some(NoteChannel { id, name: text_at(row, name)? }))
}

/// Read an integer-like column, accepting numeric text
fn int_at(row: &rusqlite::Row<'_>, idx: usize) -> Result<Option<i64>, StoreError> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i)),
        #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
        ValueRef::Real(f) if f.trunc() == f => Ok(Some(f as i64)),
        ValueRef::Text(t) => {
            let s = String::from_utf8_lossy(t);
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .map_err(|_| StoreError::Decode(format!("column {idx}: {s:?} is not an integer")))
        }
        other => Err(StoreError::Decode(format!(
            "column {idx}: expected integer, found {:?}",
            other.data_type()
        ))),
    }
}

/// Read a text column, rendering numbers as their decimal form
fn text_at(row: &rusqlite::Row<'_>, idx: usize) -> Result<Option<String>, StoreError> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(f) => Ok(Some(f.to_string())),
        ValueRef::Text(t) => Ok(Some(String::from_utf8_lossy(t).into_owned())),
        ValueRef::Blob(_) => Err(StoreError::Decode(format!("column {idx}: unexpected blob"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .connection()
            .execute_batch(
                "INSERT INTO Products VALUES (1, 'Firefox', 'Desktop browser');
                 INSERT INTO Products VALUES (2, 'Firefox for mobile', NULL);
                 INSERT INTO Channels VALUES (1, 'Aurora');
                 INSERT INTO Channels VALUES (2, 'Beta');
                 INSERT INTO Tags VALUES (1, 'New', 1);
                 INSERT INTO Releases VALUES (1, 1, 2, 19, 0, '2019-12-01', 'old');
                 INSERT INTO Releases VALUES (2, 1, 2, 20, 0, '2020-01-01', 'new');
                 INSERT INTO Notes VALUES (1, NULL, 'Whats new', 1, NULL, 20, NULL, NULL, NULL, NULL, 5);
                 INSERT INTO Notes VALUES (2, 1234, 'Fixed crash', NULL, 1, 20, NULL, 2, NULL, NULL, 3);",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_product_lookup() {
        let store = seeded();
        let product = store.product_by_name("Firefox").unwrap().unwrap();
        assert_eq!(product, ProductRow { id: 1, text: Some("Desktop browser".into()) });

        let mobile = store.product_by_name("Firefox for mobile").unwrap().unwrap();
        assert_eq!(mobile.text, None);

        assert!(store.product_by_name("Firefox ESR").unwrap().is_none());
    }

    #[test]
    fn test_channel_lookup() {
        let store = seeded();
        assert_eq!(store.channel_by_name("Beta").unwrap(), Some(ChannelRow { id: 2 }));
        assert_eq!(store.channel_by_name("Release").unwrap(), None);
    }

    #[test]
    fn test_latest_release_orders_by_date() {
        let store = seeded();
        let release = store.latest_release(1, 2).unwrap().unwrap();
        assert_eq!(release.version, "20");
        assert_eq!(release.sub_version, "0");
        assert_eq!(release.release_date, "2020-01-01");
        assert_eq!(release.release_text, "new");

        assert!(store.latest_release(1, 1).unwrap().is_none());
    }

    #[test]
    fn test_notes_scope() {
        let store = seeded();

        let whats_new = store.notes(NoteScope { product: Some(1), with_bug: false }).unwrap();
        assert_eq!(whats_new.len(), 1);
        assert_eq!(whats_new[0].tag_text.as_deref(), Some("New"));
        assert_eq!(whats_new[0].tag_sort, Some(1));

        let bugs = store.notes(NoteScope { product: Some(1), with_bug: true }).unwrap();
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].bug_num, Some(1234));
        assert_eq!(
            bugs[0].fixed_in_channel,
            Some(NoteChannel { id: 2, name: Some("Beta".into()) })
        );
    }

    #[test]
    fn test_notes_keep_dangling_channel_reference() {
        let store = seeded();
        // bundled SQLite enforces foreign keys, a legacy database may not
        store
            .connection()
            .execute_batch(
                "PRAGMA foreign_keys = OFF;
                 INSERT INTO Notes VALUES (3, 99, 'Mobile only', NULL, 2, 20, NULL, 77, 19, 1, 1);",
            )
            .unwrap();

        let bugs = store.notes(NoteScope { product: Some(2), with_bug: true }).unwrap();
        assert_eq!(bugs.len(), 1);
        assert_eq!(bugs[0].fixed_in_channel, Some(NoteChannel { id: 77, name: None }));
        assert_eq!(bugs[0].first_channel, Some(NoteChannel { id: 1, name: Some("Aurora".into()) }));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = SqliteStore::open(&dir.path().join("missing.sqlite"));
        assert!(matches!(result, Err(StoreError::Open(_))));
    }

    #[test]
    fn test_open_rejects_non_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.sqlite");
        std::fs::write(&path, "not a database\n".repeat(64)).unwrap();
        assert!(matches!(SqliteStore::open(&path), Err(StoreError::Open(_))));
    }
}
