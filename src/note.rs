// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Note entries

use serde_json::{json, Value};

/// One entry of a release's notes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    /// A feature or change without a bug reference
    WhatsNew {
        /// Note body
        description: Option<String>,
        /// Tag text; the document falls back to `WHATS_NEW`
        tag: Option<String>,
    },
    /// A bug fixed in this release
    Fixed {
        /// Note body
        description: Option<String>,
        /// Bug number
        bug: Option<i64>,
    },
    /// A bug open as of this release
    KnownIssue {
        /// Note body
        description: Option<String>,
        /// Bug number
        bug: Option<i64>,
        /// Version that fixes it, if any
        fixed_in_version: Option<i64>,
        /// Display name of the channel that fixes it, if any
        fixed_in_channel: Option<String>,
        /// Version in which it first appeared
        first_in: Option<i64>,
    },
}

impl Note {
    /// Document type string
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WhatsNew { .. } => "whats_new",
            Self::Fixed { .. } => "fixed",
            Self::KnownIssue { .. } => "known_issues",
        }
    }

    /// Explicit tag if one is set and non-empty, else the upper-cased kind
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::WhatsNew { tag: Some(tag), .. } if !tag.is_empty() => tag.clone(),
            _ => self.kind().to_uppercase(),
        }
    }

    /// Note body
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::WhatsNew { description, .. }
            | Self::Fixed { description, .. }
            | Self::KnownIssue { description, .. } => description.as_deref(),
        }
    }

    /// Bug number, never set for what's-new notes
    #[must_use]
    pub fn bug(&self) -> Option<i64> {
        match self {
            Self::WhatsNew { .. } => None,
            Self::Fixed { bug, .. } | Self::KnownIssue { bug, .. } => *bug,
        }
    }

    /// Document form with every key present; absent fields are `null`
    #[must_use]
    pub fn to_value(&self) -> Value {
        let (first_in, fixed_in_version, fixed_in_channel) = match self {
            Self::KnownIssue { first_in, fixed_in_version, fixed_in_channel, .. } => {
                (*first_in, *fixed_in_version, fixed_in_channel.as_deref())
            }
            _ => (None, None, None),
        };

        json!({
            "type": self.kind(),
            "tag": self.tag(),
            "description": self.description(),
            "bug": self.bug(),
            "first_in": first_in,
            "fixed_in_version": fixed_in_version,
            "fixed_in_channel": fixed_in_channel,
        })
    }
}
