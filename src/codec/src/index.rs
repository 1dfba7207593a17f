use ahash::AHashMap;

/// Maps each code of the encoded column to the ascending rows holding it.
///
/// Complete by construction: every occurrence of every code is recorded,
/// once. Keyed by map rather than dense array because loaded files may carry
/// non-dense codes; only builder-produced dictionaries are dense.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: AHashMap<u32, Vec<usize>>,
}

impl InvertedIndex {
    /// Build the index in one pass over the encoded column. Positions are
    /// appended in row order, so every posting list is ascending.
    pub fn from_codes(codes: &[u32]) -> Self {
        let mut postings: AHashMap<u32, Vec<usize>> = AHashMap::new();
        for (row, &code) in codes.iter().enumerate() {
            postings.entry(code).or_default().push(row);
        }
        Self { postings }
    }

    /// Rows holding `code`, ascending; empty if the code never occurs.
    pub fn rows(&self, code: u32) -> &[usize] {
        self.postings.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct codes present in the column.
    pub fn distinct_codes(&self) -> usize {
        self.postings.len()
    }
}
