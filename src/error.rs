// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Store errors

use thiserror::Error;

/// Faults raised by a [`crate::store::ReleaseStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing database could not be opened
    #[error("open error: {0}")]
    Open(String),

    /// A query failed to prepare or execute
    #[error("query error: {0}")]
    Query(String),

    /// A column held a value of an unexpected type
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => Self::Decode(e.to_string()),
            other => Self::Query(other.to_string()),
        }
    }
}
