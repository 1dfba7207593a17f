//! Shared input generation for the codec benchmarks.

use rand::Rng;

/// Generate a low-cardinality column: `rows` values drawn uniformly from a
/// pool of `distinct` values whose names share a handful of prefixes.
pub fn generate_column(rows: usize, distinct: usize) -> Vec<String> {
    let stems = ["alpha_", "beta_", "gamma_"];
    let pool: Vec<String> = (0..distinct)
        .map(|i| format!("{}{:04}", stems[i % stems.len()], i))
        .collect();

    let mut rng = rand::rng();
    (0..rows)
        .map(|_| pool[rng.random_range(0..pool.len())].clone())
        .collect()
}
