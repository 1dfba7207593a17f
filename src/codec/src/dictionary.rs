use std::num::NonZero;
use std::thread;

use ahash::{AHashMap, AHashSet};
use log::debug;

use crate::scan::{PREFIX_LEN, prefix_slot};

/// Maps each distinct value of a string column to a unique integer code.
///
/// Built once, either by [`Dictionary::build`] at encode time or from a
/// persisted file at load time, and read-shared afterward. Builder-produced
/// codes are dense in `0..len()`; loaded dictionaries keep whatever
/// non-negative codes the file carried.
#[derive(Debug, Default)]
pub struct Dictionary {
    codes: AHashMap<String, u32>,
}

impl Dictionary {
    /// Build a dictionary over `rows` with `threads` worker threads.
    ///
    /// Rows are split into contiguous chunks, one worker per chunk. Workers
    /// only ever write thread-local state; the merge afterwards is the one
    /// serialized step and assigns final codes in worker order, first writer
    /// wins. Code values therefore depend on the thread count, but every
    /// distinct value gets exactly one code and no code is reused.
    pub fn build(rows: &[String], threads: NonZero<usize>) -> Self {
        let chunk_len = rows.len().div_ceil(threads.get()).max(1);
        let locals: Vec<Vec<&str>> = thread::scope(|scope| {
            let workers: Vec<_> = rows
                .chunks(chunk_len)
                .map(|chunk| scope.spawn(move || distinct_in_order(chunk)))
                .collect();
            workers
                .into_iter()
                .map(|worker| worker.join().expect("dictionary worker panicked"))
                .collect()
        });

        let mut codes = AHashMap::new();
        for local in locals {
            for value in local {
                if !codes.contains_key(value) {
                    let code = codes.len() as u32;
                    codes.insert(value.to_owned(), code);
                }
            }
        }
        debug!(
            "dictionary built: {} distinct values over {} rows",
            codes.len(),
            rows.len()
        );
        Self { codes }
    }

    /// Code assigned to `value`, if present.
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.codes.get(value).copied()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the dictionary holds no values.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate over `(value, code)` pairs, in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.codes.iter().map(|(value, &code)| (value.as_str(), code))
    }

    /// Record a `(value, code)` pair read back from a persisted file.
    /// The caller checks consistency before inserting.
    pub(crate) fn insert(&mut self, value: String, code: u32) {
        self.codes.insert(value, code);
    }

    /// Materialize one [`DictionaryView`] per distinct value, in arbitrary
    /// order.
    pub(crate) fn views(&self) -> Vec<DictionaryView> {
        self.codes
            .iter()
            .map(|(value, &code)| DictionaryView {
                code,
                slot: prefix_slot(value.as_bytes()),
                value: value.clone(),
            })
            .collect()
    }
}

/// A dictionary entry paired with its zero-padded leading-byte slot.
///
/// Prefix queries compare the slot first and touch the full value only when
/// the slot alone cannot decide.
#[derive(Debug, Clone)]
pub(crate) struct DictionaryView {
    code: u32,
    slot: [u8; PREFIX_LEN],
    value: String,
}

impl DictionaryView {
    pub(crate) fn code(&self) -> u32 {
        self.code
    }

    pub(crate) fn slot(&self) -> &[u8; PREFIX_LEN] {
        &self.slot
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }
}

fn distinct_in_order(chunk: &[String]) -> Vec<&str> {
    let mut seen = AHashSet::new();
    let mut order = Vec::new();
    for value in chunk {
        if seen.insert(value.as_str()) {
            order.push(value.as_str());
        }
    }
    order
}
