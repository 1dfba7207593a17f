use std::fs;
use std::num::NonZero;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use crate::{CodecConfig, DictionaryCodec, QueryStrategy};

fn write_column(dir: &TempDir, values: &[String]) -> PathBuf {
    let path = dir.path().join("column.txt");
    fs::write(&path, values.join("\n")).unwrap();
    path
}

fn encode_with_threads(dir: &TempDir, values: &[String], threads: usize) -> DictionaryCodec {
    let input = write_column(dir, values);
    let output = dir.path().join(format!("column-t{threads}.dict"));
    let config = CodecConfig::new().with_build_threads(NonZero::new(threads).unwrap());
    let codec = DictionaryCodec::with_config(config);
    codec.encode(&input, &output).unwrap();
    codec
}

/// Deterministic low-cardinality column with heavily shared prefixes, some
/// values longer than the vectorized path's leading-byte slot.
fn generate_column(rows: usize) -> Vec<String> {
    let stems = [
        "alpha",
        "alp",
        "alphabetical",
        "beta",
        "be",
        "gamma",
        "gammaray",
        "",
    ];
    let mut state = 0x9E37_79B9u32;
    (0..rows)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            let stem = stems[(state >> 16) as usize % stems.len()];
            format!("{stem}{}", state % 5)
        })
        .collect()
}

fn sorted(mut rows: Vec<usize>) -> Vec<usize> {
    rows.sort_unstable();
    rows
}

#[test]
fn test_roundtrip_reconstructs_column() {
    let dir = TempDir::new().unwrap();
    let values = generate_column(1000);
    let input = write_column(&dir, &values);
    let output = dir.path().join("column.dict");

    let codec = DictionaryCodec::new();
    codec.encode(&input, &output).unwrap();

    let reloaded = DictionaryCodec::new();
    reloaded.load(&output).unwrap();

    assert_eq!(reloaded.row_count(), values.len());
    assert_eq!(reloaded.distinct_count(), codec.distinct_count());
    for (row, value) in values.iter().enumerate() {
        assert_eq!(reloaded.get_row(row).unwrap(), *value);
    }
}

#[test]
fn test_persisted_file_is_consistent() {
    // The persisted pairs carry the encoding invariant: one code per
    // distinct value, the same code at every occurrence, row order intact.
    let dir = TempDir::new().unwrap();
    let values = generate_column(500);
    let input = write_column(&dir, &values);
    let output = dir.path().join("column.dict");
    DictionaryCodec::new().encode(&input, &output).unwrap();

    let content = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0].parse::<usize>().unwrap(), values.len());
    assert_eq!(lines.len(), 1 + 2 * values.len());

    let mut value_to_code = std::collections::HashMap::new();
    let mut code_to_value = std::collections::HashMap::new();
    for (row, value) in values.iter().enumerate() {
        let code: u32 = lines[1 + row * 2].parse().unwrap();
        assert_eq!(lines[2 + row * 2], value, "row {row}");
        assert_eq!(*value_to_code.entry(value).or_insert(code), code);
        assert_eq!(code_to_value.entry(code).or_insert(value), &value);
    }
}

#[test]
fn test_variants_agree_with_baseline() {
    let dir = TempDir::new().unwrap();
    let values = generate_column(2000);
    let codec = encode_with_threads(&dir, &values, 4);

    let mut needles: Vec<String> = values.clone();
    needles.dedup();
    needles.push("nowhere".to_string());
    for needle in &needles {
        let expected = codec.baseline_equal(needle);
        assert_eq!(codec.query_equal_scan(needle), expected, "needle {needle:?}");
        assert_eq!(codec.query_equal_index(needle), expected, "needle {needle:?}");
        assert_eq!(
            codec.query_equal_vectorized(needle),
            expected,
            "needle {needle:?}"
        );
    }

    // Prefixes straddling the fixed slot width exercise both slot paths.
    let prefixes = [
        "", "a", "al", "alp", "alpha", "alphabet", "alphabetic", "alphabetical1", "b", "gam",
        "gammaray", "zzz",
    ];
    for prefix in prefixes {
        let expected = codec.baseline_prefix(prefix);
        assert_eq!(sorted(codec.query_prefix_scan(prefix)), expected, "prefix {prefix:?}");
        assert_eq!(
            sorted(codec.query_prefix_vectorized(prefix)),
            expected,
            "prefix {prefix:?}"
        );
        assert_eq!(codec.query_prefix_index(prefix), expected, "prefix {prefix:?}");
        assert_eq!(codec.query_prefix(prefix), expected, "prefix {prefix:?}");
    }
}

#[test]
fn test_prefix_is_byte_wise() {
    let dir = TempDir::new().unwrap();
    let values: Vec<String> = ["こんにちは", "こんばんは", "hello", "こんにちは"]
        .iter()
        .map(|v| v.to_string())
        .collect();
    let codec = encode_with_threads(&dir, &values, 2);

    // "こん" is 6 bytes; both Japanese greetings share it.
    assert_eq!(codec.query_prefix("こん"), vec![0, 1, 3]);
    assert_eq!(codec.query_prefix("こんに"), vec![0, 3]);
    assert_eq!(codec.query_prefix("こん"), codec.baseline_prefix("こん"));
}

#[test]
fn test_thread_counts_yield_identical_queries() {
    let dir = TempDir::new().unwrap();
    let values = generate_column(1500);
    let codecs: Vec<DictionaryCodec> = [1, 2, 8]
        .into_iter()
        .map(|t| encode_with_threads(&dir, &values, t))
        .collect();

    let reference = &codecs[0];
    for codec in &codecs[1..] {
        assert_eq!(codec.distinct_count(), reference.distinct_count());
        for needle in ["alpha1", "be3", "gammaray0", "", "nowhere"] {
            assert_eq!(codec.query_equal(needle), reference.query_equal(needle));
        }
        for prefix in ["al", "gamma", ""] {
            assert_eq!(codec.query_prefix(prefix), reference.query_prefix(prefix));
        }
    }
}

#[test]
fn test_grouped_prefix_flattens_to_prefix_query() {
    let dir = TempDir::new().unwrap();
    let values = generate_column(800);
    let codec = encode_with_threads(&dir, &values, 4);

    for prefix in ["al", "gamma", "", "zzz"] {
        let groups = codec.query_prefix_grouped(prefix);
        let mut flattened = Vec::new();
        for (value, rows) in &groups {
            assert!(value.as_bytes().starts_with(prefix.as_bytes()));
            assert!(rows.windows(2).all(|w| w[0] < w[1]), "rows ascending");
            flattened.extend_from_slice(rows);
        }
        assert_eq!(sorted(flattened), codec.query_prefix(prefix), "prefix {prefix:?}");
    }
}

#[test]
fn test_concurrent_queries_agree() {
    let dir = TempDir::new().unwrap();
    let values = generate_column(1000);
    let codec = Arc::new(encode_with_threads(&dir, &values, 4));

    let expected_equal = codec.query_equal("alpha1");
    let expected_prefix = codec.query_prefix("al");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let codec = codec.clone();
        let expected_equal = expected_equal.clone();
        let expected_prefix = expected_prefix.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                assert_eq!(codec.query_equal("alpha1"), expected_equal);
                assert_eq!(codec.query_prefix("al"), expected_prefix);
                assert_eq!(codec.query_equal_vectorized("alpha1"), expected_equal);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_load_replaces_prior_column() {
    let dir = TempDir::new().unwrap();
    let first: Vec<String> = ["one", "two"].iter().map(|v| v.to_string()).collect();
    let second: Vec<String> = ["three", "four", "three"].iter().map(|v| v.to_string()).collect();

    let input = write_column(&dir, &first);
    let out_first = dir.path().join("first.dict");
    let codec = DictionaryCodec::new();
    codec.encode(&input, &out_first).unwrap();

    let input = write_column(&dir, &second);
    let out_second = dir.path().join("second.dict");
    codec.encode(&input, &out_second).unwrap();
    assert_eq!(codec.row_count(), 3);
    assert_eq!(codec.query_equal("one"), Vec::<usize>::new());
    assert_eq!(codec.query_equal("three"), vec![0, 2]);

    codec.load(&out_first).unwrap();
    assert_eq!(codec.row_count(), 2);
    assert_eq!(codec.query_equal("one"), vec![0]);
}

#[test]
fn test_strategies_are_interchangeable() {
    let dir = TempDir::new().unwrap();
    let values = generate_column(600);
    let input = write_column(&dir, &values);
    let output = dir.path().join("column.dict");

    let results: Vec<(Vec<usize>, Vec<usize>)> = [
        QueryStrategy::Scan,
        QueryStrategy::Index,
        QueryStrategy::Vectorized,
    ]
    .into_iter()
    .map(|strategy| {
        let codec = DictionaryCodec::with_config(CodecConfig::new().with_strategy(strategy));
        codec.encode(&input, &output).unwrap();
        (codec.query_equal("alpha1"), codec.query_prefix("al"))
    })
    .collect();

    assert_eq!(results[0], results[1]);
    assert_eq!(results[1], results[2]);
}
