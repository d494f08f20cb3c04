// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Benchmarks for document pruning and encoding

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use relnotes::note::Note;
use relnotes::serialize::{encode, prune};
use serde_json::{json, Value};

fn sample_document(notes: usize) -> Value {
    let notes: Vec<Value> = (0..notes)
        .map(|i| {
            let note = Note::KnownIssue {
                description: Some(format!("Issue number {i}")),
                bug: Some(800_000 + i64::try_from(i).unwrap_or(0)),
                fixed_in_version: None,
                fixed_in_channel: None,
                first_in: Some(20),
            };
            prune(&note.to_value())
        })
        .collect();

    json!({
        "product": { "name": "Firefox", "slug": "firefox", "id": 1, "text": null, "alt_product": "mobile" },
        "channel": { "name": "Beta", "id": 2 },
        "path": "en-US/firefox/20.0beta/releasenotes/",
        "filename": "index.json",
        "notes": notes,
        "text": "",
        "version": 20,
        "sub_version": 0,
        "date": "January 1, 2020",
    })
}

fn bench_prune(c: &mut Criterion) {
    let doc = sample_document(500);
    c.bench_function("prune_500_notes", |b| b.iter(|| prune(black_box(&doc))));
}

fn bench_encode(c: &mut Criterion) {
    let doc = prune(&sample_document(500));
    c.bench_function("encode_500_notes", |b| b.iter(|| encode(black_box(&doc))));
}

criterion_group!(benches, bench_prune, bench_encode);
criterion_main!(benches);
