// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Pruning and canonical JSON encoding

use anyhow::{Context, Result};
use serde_json::{Map, Value};

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Drop object keys whose value is `null` or `""`, recursing into nested
/// objects. Arrays are passed through untouched.
#[must_use]
pub fn prune(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .iter()
                .filter(|(_, v)| !is_empty(v))
                .map(|(k, v)| {
                    let v = if v.is_object() { prune(v) } else { v.clone() };
                    (k.clone(), v)
                })
                .collect();
            Value::Object(pruned)
        }
        other => other.clone(),
    }
}

/// Rebuild every object (including those inside arrays) with sorted keys
fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k.clone(), canonical(v))).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}

/// Render as two-space indented JSON with sorted keys.
///
/// Equal values always encode to identical bytes.
pub fn encode(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(&canonical(value)).context("Failed to encode release document")
}
