use std::path::Path;
use std::sync::RwLock;

use ahash::AHashSet;
use itertools::Itertools;
use log::info;

use crate::baseline;
use crate::config::{CodecConfig, QueryStrategy};
use crate::dictionary::{Dictionary, DictionaryView};
use crate::error::{CodecError, Result};
use crate::format::{self, EncodedFile};
use crate::index::InvertedIndex;
use crate::scan;

/// Everything the codec holds for one column.
///
/// Built whole by encode or load and installed in one write; never mutated
/// in place afterward.
#[derive(Debug, Default)]
struct ColumnState {
    dictionary: Dictionary,
    encoded: Vec<u32>,
    raw: Box<[String]>,
    index: InvertedIndex,
    views: Vec<DictionaryView>,
}

impl ColumnState {
    /// Derive the encoded column, index, and views for freshly read rows.
    fn from_rows(rows: Vec<String>, dictionary: Dictionary) -> Self {
        let encoded: Vec<u32> = rows
            .iter()
            .map(|value| {
                dictionary
                    .code_of(value)
                    .expect("every row value is interned during build")
            })
            .collect();
        let index = InvertedIndex::from_codes(&encoded);
        let views = dictionary.views();
        Self {
            dictionary,
            encoded,
            raw: rows.into_boxed_slice(),
            index,
            views,
        }
    }

    /// Rebuild every structure from the records of an encoded file.
    ///
    /// The dictionary is reconstructed from the record pairs; a value seen
    /// with two different codes, or one code spanning two values, is a
    /// format error.
    fn from_encoded_file(file: EncodedFile) -> Result<Self> {
        let EncodedFile { codes, values } = file;

        let mut dictionary = Dictionary::default();
        let mut seen_codes = AHashSet::new();
        for (row, (&code, value)) in codes.iter().zip(&values).enumerate() {
            match dictionary.code_of(value) {
                Some(existing) if existing == code => {}
                Some(_) => {
                    return Err(CodecError::InconsistentDictionary {
                        line: 2 + row * 2,
                        value: value.clone(),
                    });
                }
                None => {
                    if !seen_codes.insert(code) {
                        return Err(CodecError::InconsistentDictionary {
                            line: 2 + row * 2,
                            value: value.clone(),
                        });
                    }
                    dictionary.insert(value.clone(), code);
                }
            }
        }

        let index = InvertedIndex::from_codes(&codes);
        let views = dictionary.views();
        Ok(Self {
            dictionary,
            encoded: codes,
            raw: values.into_boxed_slice(),
            index,
            views,
        })
    }
}

/// Dictionary-encoding codec over one string column.
///
/// The codec owns the dictionary, the encoded column, the raw column, and
/// the inverted index behind one reader-writer lock: any number of queries
/// run concurrently under the read lock, and encode/load install a
/// fully-built replacement state under the write lock. A failed encode or
/// load leaves prior state untouched.
///
/// # Example
/// ```rust
/// use dict_codec::DictionaryCodec;
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let input = dir.path().join("column.txt");
/// std::fs::write(&input, "apple\nbanana\napple\napricot\n").unwrap();
///
/// let codec = DictionaryCodec::new();
/// codec.encode(&input, &dir.path().join("column.dict"))?;
///
/// assert_eq!(codec.query_equal("apple"), vec![0, 2]);
/// assert_eq!(codec.query_prefix("ap"), vec![0, 2, 3]);
/// # Ok::<(), dict_codec::CodecError>(())
/// ```
#[derive(Debug, Default)]
pub struct DictionaryCodec {
    config: CodecConfig,
    state: RwLock<ColumnState>,
}

impl DictionaryCodec {
    /// Create an empty codec with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty codec with `config`.
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            state: RwLock::default(),
        }
    }

    /// Dictionary-encode the raw column at `input` (one value per line) and
    /// persist it to `output`.
    ///
    /// On success the codec holds the encoded column and is ready for
    /// queries without a separate [`Self::load`]. On failure nothing
    /// changes: prior in-memory state stays as it was and no partial output
    /// file remains.
    pub fn encode(&self, input: &Path, output: &Path) -> Result<()> {
        let rows = format::read_raw_column(input)?;
        let dictionary = Dictionary::build(&rows, self.config.build_threads());
        let state = ColumnState::from_rows(rows, dictionary);
        format::write_encoded(output, &state.encoded, &state.raw)?;
        info!(
            "encoded {} rows ({} distinct) to {}",
            state.raw.len(),
            state.dictionary.len(),
            output.display()
        );
        *self.state.write().unwrap() = state;
        Ok(())
    }

    /// Load a previously encoded file, replacing any in-memory state.
    ///
    /// The file is parsed and validated in full before the state is
    /// swapped; on any error the prior state is untouched.
    pub fn load(&self, path: &Path) -> Result<()> {
        let file = format::read_encoded(path)?;
        let state = ColumnState::from_encoded_file(file)?;
        info!(
            "loaded {} rows ({} distinct) from {}",
            state.raw.len(),
            state.dictionary.len(),
            path.display()
        );
        *self.state.write().unwrap() = state;
        Ok(())
    }

    /// Number of rows in the loaded column.
    pub fn row_count(&self) -> usize {
        self.state.read().unwrap().raw.len()
    }

    /// Whether the loaded column has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Number of distinct values in the dictionary.
    pub fn distinct_count(&self) -> usize {
        self.state.read().unwrap().dictionary.len()
    }

    /// Original value at `index`.
    pub fn get_row(&self, index: usize) -> Result<String> {
        let state = self.state.read().unwrap();
        state
            .raw
            .get(index)
            .cloned()
            .ok_or(CodecError::RowOutOfRange {
                index,
                len: state.raw.len(),
            })
    }

    /// Rows holding exactly `value`, ascending, answered with the
    /// configured [`QueryStrategy`].
    pub fn query_equal(&self, value: &str) -> Vec<usize> {
        match self.config.strategy() {
            QueryStrategy::Scan => self.query_equal_scan(value),
            QueryStrategy::Index => self.query_equal_index(value),
            QueryStrategy::Vectorized => self.query_equal_vectorized(value),
        }
    }

    /// Equality by one scalar pass over the encoded column.
    pub fn query_equal_scan(&self, value: &str) -> Vec<usize> {
        let state = self.state.read().unwrap();
        let mut rows = Vec::new();
        if let Some(code) = state.dictionary.code_of(value) {
            scan::scan_codes(&state.encoded, code, &mut rows);
        }
        rows
    }

    /// Equality by inverted-index lookup; no column scan.
    pub fn query_equal_index(&self, value: &str) -> Vec<usize> {
        let state = self.state.read().unwrap();
        match state.dictionary.code_of(value) {
            Some(code) => state.index.rows(code).to_vec(),
            None => Vec::new(),
        }
    }

    /// Equality by chunked scan; identical results to
    /// [`Self::query_equal_scan`].
    pub fn query_equal_vectorized(&self, value: &str) -> Vec<usize> {
        let state = self.state.read().unwrap();
        let mut rows = Vec::new();
        if let Some(code) = state.dictionary.code_of(value) {
            scan::scan_codes_chunked(&state.encoded, code, &mut rows);
        }
        rows
    }

    /// Rows whose value starts with `prefix` (byte-wise), ascending,
    /// answered with the configured [`QueryStrategy`].
    pub fn query_prefix(&self, prefix: &str) -> Vec<usize> {
        let mut rows = match self.config.strategy() {
            QueryStrategy::Scan => self.query_prefix_scan(prefix),
            QueryStrategy::Index => self.query_prefix_index(prefix),
            QueryStrategy::Vectorized => self.query_prefix_vectorized(prefix),
        };
        rows.sort_unstable();
        rows
    }

    /// Prefix query scanning the encoded column once per matching value.
    ///
    /// Emission is grouped by matching value; rows within one value are
    /// ascending. [`Self::query_prefix`] sorts the union.
    pub fn query_prefix_scan(&self, prefix: &str) -> Vec<usize> {
        let state = self.state.read().unwrap();
        let mut rows = Vec::new();
        for (value, code) in state.dictionary.iter() {
            if value.as_bytes().starts_with(prefix.as_bytes()) {
                scan::scan_codes(&state.encoded, code, &mut rows);
            }
        }
        rows
    }

    /// Prefix query merging precomputed posting lists, ascending.
    pub fn query_prefix_index(&self, prefix: &str) -> Vec<usize> {
        let state = self.state.read().unwrap();
        // Each row holds exactly one code, so posting lists of distinct
        // codes are disjoint and the merge needs no dedup.
        state
            .dictionary
            .iter()
            .filter(|(value, _)| value.as_bytes().starts_with(prefix.as_bytes()))
            .map(|(_, code)| state.index.rows(code).iter().copied())
            .kmerge()
            .collect()
    }

    /// Prefix query over dictionary views: the fixed-width leading-byte
    /// slot decides most entries, the chunked scan collects rows for those
    /// that match. Same set of rows as [`Self::query_prefix_scan`].
    pub fn query_prefix_vectorized(&self, prefix: &str) -> Vec<usize> {
        let state = self.state.read().unwrap();
        let mut rows = Vec::new();
        for view in &state.views {
            if scan::slot_starts_with(view.slot(), view.value(), prefix) {
                scan::scan_codes_chunked(&state.encoded, view.code(), &mut rows);
            }
        }
        rows
    }

    /// Matching distinct values, each paired with its ascending rows.
    pub fn query_prefix_grouped(&self, prefix: &str) -> Vec<(String, Vec<usize>)> {
        let state = self.state.read().unwrap();
        state
            .dictionary
            .iter()
            .filter(|(value, _)| value.as_bytes().starts_with(prefix.as_bytes()))
            .map(|(value, code)| (value.to_owned(), state.index.rows(code).to_vec()))
            .collect()
    }

    /// Equality by direct string comparison over the raw column; the
    /// non-indexed reference the encoded paths are validated against.
    pub fn baseline_equal(&self, value: &str) -> Vec<usize> {
        baseline::search_equal(&self.state.read().unwrap().raw, value)
    }

    /// Prefix by direct string comparison over the raw column.
    pub fn baseline_prefix(&self, prefix: &str) -> Vec<usize> {
        baseline::search_prefix(&self.state.read().unwrap().raw, prefix)
    }
}
