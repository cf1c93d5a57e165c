// src/engine/merge.rs
//
// Keyed union of the stored collection and a fresh batch.
// Newest timestamp wins per key; ties keep what was already stored.
// Output: timestamp descending (key ascending on equal times), at most `cap`.

use std::collections::HashMap;

use crate::record::Record;

pub fn merge_capped(prev: &[Record], batch: &[Record], cap: usize) -> Vec<Record> {
    let mut by_key: HashMap<&str, &Record> = HashMap::with_capacity(prev.len() + batch.len());

    for r in prev.iter().chain(batch) {
        by_key
            .entry(r.key.as_str())
            .and_modify(|kept| {
                if r.timestamp > kept.timestamp {
                    *kept = r;
                }
            })
            .or_insert(r);
    }

    let mut merged: Vec<Record> = by_key.into_values().cloned().collect();
    sort_newest_first(&mut merged);
    merged.truncate(cap);
    merged
}

pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.key.cmp(&b.key)));
}
