// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Relnotes library - static JSON release notes for a product line
//!
//! This crate reads release metadata and categorized notes from a SQLite
//! store and assembles one pruned JSON document per (product, channel) pair.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod build;
pub mod channel;
pub mod commands;
pub mod config;
pub mod error;
pub mod note;
pub mod notes;
pub mod product;
pub mod release;
pub mod serialize;
pub mod store;

/// Canonical product and channel identifiers
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    // =========================================================================
    // Products
    // =========================================================================

    /// Canonical product slugs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ProductSlug {
        /// Desktop browser
        Firefox,
        /// Mobile browser
        Mobile,
        /// Extended support release
        Esr,
    }

    impl ProductSlug {
        /// Parse a slug, `None` if it is not canonical
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.trim() {
                "firefox" => Some(Self::Firefox),
                "mobile" => Some(Self::Mobile),
                "esr" => Some(Self::Esr),
                _ => None,
            }
        }

        /// The slug as written in paths and documents
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Firefox => "firefox",
                Self::Mobile => "mobile",
                Self::Esr => "esr",
            }
        }

        /// Display name, also the lookup key in the Products table
        #[must_use]
        pub fn display_name(&self) -> &'static str {
            match self {
                Self::Firefox => "Firefox",
                Self::Mobile => "Firefox for mobile",
                Self::Esr => "Firefox ESR",
            }
        }

        /// The sibling product family (empty for ESR)
        #[must_use]
        pub fn alt_product(&self) -> &'static str {
            match self {
                Self::Firefox => "mobile",
                Self::Mobile => "firefox",
                Self::Esr => "",
            }
        }

        /// Product segment used in output paths; ESR shares the desktop tree
        #[must_use]
        pub fn path_segment(&self) -> &'static str {
            match self {
                Self::Esr => "firefox",
                other => other.as_str(),
            }
        }
    }

    impl fmt::Display for ProductSlug {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    // =========================================================================
    // Channels
    // =========================================================================

    /// Canonical channel slugs
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ChannelSlug {
        /// Developer preview channel
        Aurora,
        /// Beta channel
        Beta,
        /// General release
        Release,
        /// Extended support release
        Esr,
    }

    impl ChannelSlug {
        /// Parse a slug, `None` if it is not canonical
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.trim() {
                "aurora" => Some(Self::Aurora),
                "beta" => Some(Self::Beta),
                "release" => Some(Self::Release),
                "esr" => Some(Self::Esr),
                _ => None,
            }
        }

        /// The slug as written in configuration
        #[must_use]
        pub fn as_str(&self) -> &'static str {
            match self {
                Self::Aurora => "aurora",
                Self::Beta => "beta",
                Self::Release => "release",
                Self::Esr => "esr",
            }
        }

        /// Display name, also the lookup key in the Channels table
        #[must_use]
        pub fn display_name(&self) -> &'static str {
            match self {
                Self::Aurora => "Aurora",
                Self::Beta => "Beta",
                Self::Release => "Release",
                Self::Esr => "ESR",
            }
        }

        /// Position in release chronology.
        ///
        /// Nightly is rank 0 but is never built, so it only appears through
        /// [`ChannelSlug::rank_of_name`].
        #[must_use]
        pub fn rank(&self) -> u8 {
            match self {
                Self::Aurora => 1,
                Self::Beta => 2,
                Self::Release => 3,
                Self::Esr => 4,
            }
        }

        /// Rank of a channel by its stored display name
        #[must_use]
        pub fn rank_of_name(name: &str) -> Option<u8> {
            match name {
                "Nightly" => Some(0),
                "Aurora" => Some(Self::Aurora.rank()),
                "Beta" => Some(Self::Beta.rank()),
                "Release" => Some(Self::Release.rank()),
                "ESR" => Some(Self::Esr.rank()),
                _ => None,
            }
        }

        /// Fixed path segment for this channel's notes
        #[must_use]
        pub fn release_string(&self) -> &'static str {
            match self {
                Self::Aurora => "auroranotes",
                Self::Beta | Self::Release | Self::Esr => "releasenotes",
            }
        }

        /// ESR releases compare notes on sub-version instead of version
        #[must_use]
        pub fn is_esr(&self) -> bool {
            matches!(self, Self::Esr)
        }
    }

    impl fmt::Display for ChannelSlug {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::release::Release;
    pub use crate::store::ReleaseStore;
    pub use crate::types::*;
    pub use anyhow::{Context, Result};
}
