use std::{fmt::Display, num::NonZero, str::FromStr};

use serde::Serialize;

/// Which algorithm answers the dispatching query operations.
///
/// All three produce identical results; they differ only in how they walk
/// the encoded representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum QueryStrategy {
    /// One scalar pass over the encoded column per query.
    #[serde(rename = "scan")]
    Scan,

    /// Precomputed inverted-index lookup, proportional to matches.
    #[serde(rename = "index")]
    #[default]
    Index,

    /// Chunked data-parallel scan over the encoded column, scalar tail.
    #[serde(rename = "vectorized")]
    Vectorized,
}

impl Display for QueryStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                QueryStrategy::Scan => "scan",
                QueryStrategy::Index => "index",
                QueryStrategy::Vectorized => "vectorized",
            }
        )
    }
}

impl FromStr for QueryStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "scan" => QueryStrategy::Scan,
            "index" => QueryStrategy::Index,
            "vectorized" => QueryStrategy::Vectorized,
            _ => return Err(format!("Invalid query strategy: {s}")),
        })
    }
}

/// Tuning for dictionary building and query dispatch.
#[derive(Debug, Clone, Copy)]
pub struct CodecConfig {
    strategy: QueryStrategy,
    build_threads: NonZero<usize>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strategy: QueryStrategy::default(),
            build_threads: std::thread::available_parallelism()
                .unwrap_or(NonZero::new(1).unwrap()),
        }
    }
}

impl CodecConfig {
    /// Create a config with defaults: index strategy, one build worker per
    /// available core.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy used by the dispatching query operations.
    pub fn with_strategy(mut self, strategy: QueryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the number of worker threads for dictionary building.
    pub fn with_build_threads(mut self, threads: NonZero<usize>) -> Self {
        self.build_threads = threads;
        self
    }

    /// The configured query strategy.
    pub fn strategy(&self) -> QueryStrategy {
        self.strategy
    }

    /// The configured dictionary-build thread count.
    pub fn build_threads(&self) -> NonZero<usize> {
        self.build_threads
    }
}
