// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Note queries: what's new, fixed, and known issues for one release
//!
//! The store narrows notes by product and bug presence. Version and channel
//! visibility is decided here, comparing channels by their chronological
//! rank ([`ChannelSlug::rank`]) rather than by storage id.

use tracing::debug;

use crate::note::Note;
use crate::store::{or_fallback, NoteChannel, NoteRow, NoteScope, ReleaseStore};
use crate::types::ChannelSlug;

/// The release notes are being collected for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteTarget {
    /// Products.id of the release
    pub product: Option<i64>,
    /// Release version; no notes match when absent
    pub version: Option<i64>,
    /// Release sub-version
    pub sub_version: Option<i64>,
    /// Release channel
    pub channel: ChannelSlug,
}

/// Column a what's-new note is matched on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionAdapter {
    /// `fixed_in_version` equals the release version
    Version(i64),
    /// `fixed_in_subversion` equals the release sub-version (ESR)
    SubVersion(i64),
}

impl VersionAdapter {
    /// Pick the comparison for a target's channel
    #[must_use]
    pub fn for_target(target: &NoteTarget) -> Option<Self> {
        if target.channel.is_esr() {
            target.sub_version.map(Self::SubVersion)
        } else {
            target.version.map(Self::Version)
        }
    }

    fn matches(self, row: &NoteRow) -> bool {
        match self {
            Self::Version(v) => row.fixed_in_version == Some(v),
            Self::SubVersion(v) => row.fixed_in_subversion == Some(v),
        }
    }
}

/// Rank comparison against a note's channel reference.
/// A reference to an unknown channel never compares.
fn rank_cmp(channel: &NoteChannel, op: impl Fn(u8) -> bool) -> bool {
    channel.rank().is_some_and(op)
}

/// Landed no later than the target channel (or on no particular channel)
fn landed_by(row: &NoteRow, rank: u8) -> bool {
    row.fixed_in_channel.as_ref().map_or(true, |c| rank_cmp(c, |r| r <= rank))
}

/// Whether a known issue is open at `version` on a channel of `rank`.
///
/// Introduced before this version, or at this version on this channel or
/// an earlier one; and not fixed yet, or fixed in a later version, or fixed
/// in this version on a later channel.
#[must_use]
pub fn is_open_at(row: &NoteRow, version: i64, rank: u8) -> bool {
    let introduced = match row.first_version {
        Some(first) if first < version => true,
        Some(first) if first == version => row
            .first_channel
            .as_ref()
            .map_or(true, |c| rank_cmp(c, |r| r <= rank)),
        _ => false,
    };

    let unfixed = match row.fixed_in_version {
        None => true,
        Some(fixed) if fixed > version => true,
        Some(fixed) if fixed == version => row
            .fixed_in_channel
            .as_ref()
            .is_some_and(|c| rank_cmp(c, |r| r > rank)),
        Some(_) => false,
    };

    introduced && unfixed
}

fn candidates<S: ReleaseStore + ?Sized>(store: &S, product: Option<i64>, with_bug: bool) -> Vec<NoteRow> {
    let scope = NoteScope { product, with_bug };
    or_fallback(store.notes(scope), "Note query", Vec::new())
}

/// Notes without a bug reference that landed in this release, ordered by
/// tag rank ascending then note rank descending
pub fn whats_new<S: ReleaseStore + ?Sized>(store: &S, target: &NoteTarget) -> Vec<Note> {
    let Some(adapter) = VersionAdapter::for_target(target) else {
        debug!("No version to match what's new notes against");
        return Vec::new();
    };

    let rank = target.channel.rank();
    let mut rows: Vec<NoteRow> = candidates(store, target.product, false)
        .into_iter()
        .filter(|row| adapter.matches(row) && landed_by(row, rank))
        .collect();

    rows.sort_by(|a, b| a.tag_sort.cmp(&b.tag_sort).then_with(|| b.sort_num.cmp(&a.sort_num)));

    rows.into_iter()
        .map(|row| Note::WhatsNew {
            description: row.description,
            tag: row.tag_text,
        })
        .collect()
}

/// Bugs fixed in this version, on this channel or an earlier one
pub fn fixed<S: ReleaseStore + ?Sized>(store: &S, target: &NoteTarget) -> Vec<Note> {
    let Some(version) = target.version else {
        return Vec::new();
    };

    let rank = target.channel.rank();
    let mut rows: Vec<NoteRow> = candidates(store, target.product, true)
        .into_iter()
        .filter(|row| row.fixed_in_version == Some(version) && landed_by(row, rank))
        .collect();

    rows.sort_by(|a, b| b.sort_num.cmp(&a.sort_num));

    rows.into_iter()
        .map(|row| Note::Fixed {
            description: row.description,
            bug: row.bug_num,
        })
        .collect()
}

/// Bugs whose visibility window spans this release
pub fn known_issues<S: ReleaseStore + ?Sized>(store: &S, target: &NoteTarget) -> Vec<Note> {
    let Some(version) = target.version else {
        return Vec::new();
    };

    let rank = target.channel.rank();
    let mut rows: Vec<NoteRow> = candidates(store, target.product, true)
        .into_iter()
        .filter(|row| is_open_at(row, version, rank))
        .collect();

    rows.sort_by(|a, b| b.sort_num.cmp(&a.sort_num));

    rows.into_iter()
        .map(|row| Note::KnownIssue {
            description: row.description,
            bug: row.bug_num,
            fixed_in_version: row.fixed_in_version,
            fixed_in_channel: row.fixed_in_channel.and_then(|c| c.name),
            first_in: row.first_version,
        })
        .collect()
}
