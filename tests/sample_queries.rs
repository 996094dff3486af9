//! Sample Query Tests
//!
//! Reads back a loaded table the way downstream analysis does: projection,
//! registry exclusion rules, random order and a row limit.

use std::fs;

use seerload::loader::{run, LoadConfig, LoadSession};
use seerload::sample::{ExclusionRule, SampleError, SampleQuery};
use seerload::storage::StoreGateway;
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

const DICTIONARY: &str = "\
  @ 1   AGE_DX    $char3.  /* Age at diagnosis */
  @ 4   YR_BRTH   $char4.  /* Year of birth */
  @ 8   SEQ_NUM   $char2.  /* Sequence number */
  @ 10  GRADE     $char1.  /* Grade */
";

/// Loads `lines` into a fresh store and returns it opened for reading.
fn loaded_store(dir: &TempDir, lines: &[&str]) -> StoreGateway {
    fs::write(dir.path().join("read.sas"), DICTIONARY).unwrap();
    fs::write(dir.path().join("breast.txt"), lines.join("\n")).unwrap();

    let mut config = LoadConfig::new(dir.path().to_string_lossy());
    config.dictionary = "read.sas".into();
    config.data = "breast.txt".into();
    config.verbose = false;

    let session = LoadSession::prepare(config).unwrap();
    run(&session).unwrap();

    StoreGateway::open_existing(&dir.path().join("seer.db")).unwrap()
}

fn first_column(rows: &[Vec<Option<String>>]) -> Vec<String> {
    rows.iter().map(|r| r[0].clone().unwrap_or_default()).collect()
}

// =============================================================================
// Exclusion Rules
// =============================================================================

/// Test: registry rules drop unknown codes and blanks.
#[test]
fn test_registry_rules_exclude_unknown_codes() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(
        &dir,
        &[
            "0451954011", // kept
            "9991954012", // unknown age
            "061    013", // blank birth year
            "0521947882", // unknown sequence
            "0711930009", // unknown grade
            "0661948002", // kept
        ],
    );

    let output = SampleQuery::new("seer")
        .with_columns(["AGE_DX"])
        .with_limit(100)
        .excluding(ExclusionRule::registry_defaults())
        .execute(&store)
        .unwrap();

    assert_eq!(first_column(&output.rows), vec!["045", "066"]);
    assert_eq!(
        output.skipped_rules,
        vec!["EOD10_SZ = 999", "EOD10_PN >= 95"]
    );
}

/// Test: without rules every row is eligible.
#[test]
fn test_no_rules_returns_everything() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir, &["0451954011", "9991954012"]);

    let output = SampleQuery::new("seer").with_limit(10).execute(&store).unwrap();
    assert_eq!(output.rows.len(), 2);
    assert_eq!(
        output.columns,
        vec!["SOURCE", "AGE_DX", "YR_BRTH", "SEQ_NUM", "GRADE"]
    );
}

// =============================================================================
// Limits And Ordering
// =============================================================================

/// Test: a random sample honors the limit and returns loaded rows only.
#[test]
fn test_random_sample_respects_limit() {
    let dir = TempDir::new().unwrap();
    let lines: Vec<String> = (0..50).map(|i| format!("{:03}1950011", i)).collect();
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let store = loaded_store(&dir, &lines);

    let output = SampleQuery::new("seer")
        .with_columns(["AGE_DX"])
        .with_limit(7)
        .randomized(true)
        .execute(&store)
        .unwrap();

    assert_eq!(output.rows.len(), 7);
    for age in first_column(&output.rows) {
        let age: u32 = age.parse().unwrap();
        assert!(age < 50);
    }
}

/// Test: a zero limit is rejected.
#[test]
fn test_zero_limit_rejected() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir, &["0451954011"]);

    let err = SampleQuery::new("seer").with_limit(0).execute(&store).unwrap_err();
    assert!(matches!(err, SampleError::InvalidLimit));
}

// =============================================================================
// Validation
// =============================================================================

/// Test: unknown columns and tables are errors, not empty results.
#[test]
fn test_unknown_names_rejected() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir, &["0451954011"]);

    let err = SampleQuery::new("seer")
        .with_columns(["STAGE"])
        .execute(&store)
        .unwrap_err();
    assert!(matches!(err, SampleError::UnknownColumn { .. }));

    let err = SampleQuery::new("respir").execute(&store).unwrap_err();
    assert!(matches!(err, SampleError::UnknownTable(_)));

    let err = SampleQuery::new("seer; DROP TABLE seer").execute(&store).unwrap_err();
    assert!(matches!(err, SampleError::Schema(_)));
}
