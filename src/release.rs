// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Release resolution and document assembly

use anyhow::Result;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::channel::Channel;
use crate::note::Note;
use crate::notes::{self, NoteTarget};
use crate::product::Product;
use crate::serialize::{encode, prune};
use crate::store::{or_fallback, ReleaseRow, ReleaseStore};
use crate::types::{ChannelSlug, ProductSlug};

/// Name of every generated document
pub const FILENAME: &str = "index.json";

/// Date used when the store has no usable release date
pub const PLACEHOLDER_DATE: &str = "1999-09-09";

/// Locale segment at the root of every output path
pub const LOCALE: &str = "en-US";

impl ReleaseRow {
    /// Stand-in for a release the store does not have
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            version: String::new(),
            sub_version: String::new(),
            release_date: PLACEHOLDER_DATE.to_string(),
            release_text: String::new(),
        }
    }
}

/// Per-channel version suffixes, e.g. `a2` for aurora
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suffixes {
    /// Appended to aurora versions
    pub aurora: String,
    /// Appended to beta versions
    pub beta: String,
    /// Appended to ESR versions
    pub esr: String,
}

impl Suffixes {
    /// Suffix for a channel; release has none
    #[must_use]
    pub fn for_channel(&self, channel: ChannelSlug) -> &str {
        match channel {
            ChannelSlug::Aurora => &self.aurora,
            ChannelSlug::Beta => &self.beta,
            ChannelSlug::Esr => &self.esr,
            ChannelSlug::Release => "",
        }
    }
}

/// The latest release of a product on a channel, with its notes
#[derive(Debug, Clone)]
pub struct Release {
    /// Resolved product
    pub product: Product,
    /// Resolved channel
    pub channel: Channel,
    /// ex: 20, 21, 22
    pub version: String,
    /// ex: 1, 2, 3
    pub sub_version: String,
    /// Release date
    pub date: NaiveDate,
    /// Release text
    pub text: String,
    /// ex: a2, beta
    pub suffix: String,
    /// What's new, in display order
    pub whats_new: Vec<Note>,
    /// Fixed bugs, in display order
    pub fixed: Vec<Note>,
    /// Known issues, in display order
    pub known_issues: Vec<Note>,
}

impl Release {
    /// Resolve the latest release for a product/channel pair and collect
    /// its notes.
    ///
    /// Never fails: missing rows and store faults degrade to placeholder
    /// values and empty note lists.
    pub fn resolve<S: ReleaseStore + ?Sized>(
        store: &S,
        product: ProductSlug,
        channel: ChannelSlug,
        suffixes: &Suffixes,
    ) -> Self {
        let product = Product::resolve(store, product);
        let channel = Channel::resolve(store, channel);

        let row = match (product.id, channel.id) {
            (Some(p), Some(c)) => or_fallback(store.latest_release(p, c), "Release lookup", None),
            _ => None,
        };
        let row = row.unwrap_or_else(|| {
            debug!("No release for {} on {}, using placeholder", product.slug, channel.slug);
            ReleaseRow::placeholder()
        });

        let target = NoteTarget {
            product: product.id,
            version: parse_int(&row.version),
            sub_version: parse_int(&row.sub_version),
            channel: channel.slug,
        };

        Self {
            whats_new: notes::whats_new(store, &target),
            fixed: notes::fixed(store, &target),
            known_issues: notes::known_issues(store, &target),
            date: parse_date(&row.release_date),
            suffix: suffixes.for_channel(channel.slug).to_string(),
            version: row.version,
            sub_version: row.sub_version,
            text: row.release_text,
            product,
            channel,
        }
    }

    /// ex: 22.0a2, 17.0.3esr
    #[must_use]
    pub fn version_string(&self) -> String {
        version_string(&self.version, &self.sub_version, &self.suffix)
    }

    /// ex: auroranotes, releasenotes
    #[must_use]
    pub fn release_string(&self) -> &'static str {
        self.channel.slug.release_string()
    }

    /// ex: en-US/mobile/20.0.1/releasenotes/
    #[must_use]
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}/",
            LOCALE,
            self.product.slug.path_segment(),
            self.version_string(),
            self.release_string()
        )
    }

    /// index.json
    #[must_use]
    pub fn filename(&self) -> &'static str {
        FILENAME
    }

    /// All notes: what's new, then fixed, then known issues
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.whats_new.iter().chain(&self.fixed).chain(&self.known_issues)
    }

    /// ex: January 1, 2020
    #[must_use]
    pub fn formatted_date(&self) -> String {
        self.date.format("%B %d, %Y").to_string().replace(" 0", " ")
    }

    /// The document before pruning; nested objects are already pruned
    #[must_use]
    pub fn to_value(&self) -> Value {
        let notes: Vec<Value> = self.notes().map(|n| prune(&n.to_value())).collect();

        json!({
            "product": prune(&json!(self.product)),
            "channel": prune(&json!(self.channel)),
            "path": self.path(),
            "filename": self.filename(),
            "notes": notes,
            "text": self.text,
            "version": integer_like(&self.version),
            "sub_version": integer_like(&self.sub_version),
            "date": self.formatted_date(),
        })
    }

    /// The pruned document
    #[must_use]
    pub fn document(&self) -> Value {
        prune(&self.to_value())
    }

    /// The pruned document as canonical JSON text
    pub fn to_json(&self) -> Result<String> {
        encode(&self.document())
    }
}

/// `<version>.0[.<sub_version>]<suffix>`; the sub-version segment only
/// appears when it is a positive integer
#[must_use]
pub fn version_string(version: &str, sub_version: &str, suffix: &str) -> String {
    match parse_int(sub_version) {
        Some(sub) if sub > 0 => format!("{version}.0.{sub}{suffix}"),
        _ => format!("{version}.0{suffix}"),
    }
}

fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").unwrap_or_else(|e| {
        warn!("Unreadable release date {:?} ({}), using {}", s, e, PLACEHOLDER_DATE);
        NaiveDate::from_ymd_opt(1999, 9, 9).unwrap_or(NaiveDate::MIN)
    })
}

/// Integer-like strings render as numbers, anything else as text
fn integer_like(s: &str) -> Value {
    parse_int(s).map_or_else(|| Value::String(s.to_string()), Value::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NoteRow};

    fn suffixes() -> Suffixes {
        Suffixes {
            aurora: "a2".into(),
            beta: "beta".into(),
            esr: "esr".into(),
        }
    }

    fn row(version: &str, sub_version: &str, date: &str) -> ReleaseRow {
        ReleaseRow {
            version: version.into(),
            sub_version: sub_version.into(),
            release_date: date.into(),
            release_text: String::new(),
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_product(1, "Firefox", None)
            .with_product(2, "Firefox for mobile", None)
            .with_product(3, "Firefox ESR", Some("Extended support"))
            .with_channel(1, "Aurora")
            .with_channel(2, "Beta")
            .with_channel(3, "Release")
            .with_channel(4, "ESR")
            .with_release(1, 1, row("22", "0", "2013-04-01"))
            .with_release(1, 3, row("20", "0", "2013-04-02"))
            .with_release(2, 3, row("20", "1", "2013-04-09"))
            .with_release(3, 4, row("17", "5", "2013-04-02"))
    }

    #[test]
    fn test_version_string() {
        assert_eq!(version_string("20", "0", ""), "20.0");
        assert_eq!(version_string("20", "", "beta"), "20.0beta");
        assert_eq!(version_string("20", "1", ""), "20.0.1");
        assert_eq!(version_string("17", "5", "esr"), "17.0.5esr");
        assert_eq!(version_string("17", "-1", ""), "17.0");
    }

    #[test]
    fn test_aurora_path() {
        let release = Release::resolve(&store(), ProductSlug::Firefox, ChannelSlug::Aurora, &suffixes());
        assert_eq!(release.version_string(), "22.0a2");
        assert_eq!(release.path(), "en-US/firefox/22.0a2/auroranotes/");
        assert_eq!(release.filename(), "index.json");
    }

    #[test]
    fn test_release_channel_has_no_suffix() {
        let release = Release::resolve(&store(), ProductSlug::Mobile, ChannelSlug::Release, &suffixes());
        assert_eq!(release.suffix, "");
        assert_eq!(release.path(), "en-US/mobile/20.0.1/releasenotes/");
    }

    #[test]
    fn test_esr_shares_firefox_tree() {
        let release = Release::resolve(&store(), ProductSlug::Esr, ChannelSlug::Esr, &suffixes());
        assert!(release.path().starts_with("en-US/firefox/"));
        assert_eq!(release.path(), "en-US/firefox/17.0.5esr/releasenotes/");
    }

    #[test]
    fn test_missing_release_uses_placeholders() {
        let release = Release::resolve(&store(), ProductSlug::Mobile, ChannelSlug::Beta, &suffixes());
        assert_eq!(release.version, "");
        assert_eq!(release.sub_version, "");
        assert_eq!(release.text, "");
        assert_eq!(release.formatted_date(), "September 9, 1999");
        assert_eq!(release.notes().count(), 0);

        let doc = release.document();
        assert!(doc.get("version").is_none());
        assert!(doc.get("text").is_none());
        assert_eq!(doc["path"], "en-US/mobile/.0beta/releasenotes/");
    }

    #[test]
    fn test_unreachable_store_degrades() {
        let release = Release::resolve(&MemoryStore::unreachable(), ProductSlug::Firefox, ChannelSlug::Beta, &suffixes());
        assert_eq!(release.product.id, None);
        assert_eq!(release.version, "");
        assert_eq!(release.document()["product"], json!({
            "name": "Firefox",
            "slug": "firefox",
            "alt_product": "mobile",
        }));
    }

    #[test]
    fn test_date_strips_leading_zero() {
        let release = Release::resolve(&store(), ProductSlug::Firefox, ChannelSlug::Release, &suffixes());
        assert_eq!(release.formatted_date(), "April 2, 2013");
    }

    #[test]
    fn test_bad_date_falls_back() {
        let store = MemoryStore::new()
            .with_product(1, "Firefox", None)
            .with_channel(2, "Beta")
            .with_release(1, 2, row("20", "0", "soon"));
        let release = Release::resolve(&store, ProductSlug::Firefox, ChannelSlug::Beta, &suffixes());
        assert_eq!(release.version, "20");
        assert_eq!(release.date.to_string(), PLACEHOLDER_DATE);
    }

    #[test]
    fn test_document_shape() {
        let store = store().with_note(
            Some(1),
            NoteRow {
                bug_num: Some(555),
                description: Some("Fixed hang".into()),
                fixed_in_version: Some(20),
                ..NoteRow::default()
            },
        );
        let release = Release::resolve(&store, ProductSlug::Firefox, ChannelSlug::Release, &suffixes());
        let doc = release.document();

        assert_eq!(doc["version"], 20);
        assert_eq!(doc["sub_version"], 0);
        assert_eq!(doc["channel"], json!({ "name": "Release", "id": 3 }));
        assert_eq!(doc["notes"], json!([{
            "type": "fixed",
            "tag": "FIXED",
            "description": "Fixed hang",
            "bug": 555,
        }]));
    }
}
