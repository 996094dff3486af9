//! Source file resolution
//!
//! The data option names one file or a pattern relative to the base
//! directory. `*` and `?` are allowed in the file name only; matches are
//! returned sorted by name so load order is deterministic.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::config::relative_path;
use super::errors::{LoadError, LoadResult};

/// Provenance value of a source file: base name with the extension stripped.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?'])
}

/// Resolves `pattern` under `base` into the ordered list of files to load.
///
/// A pattern without wildcards resolves to that single path; whether it
/// exists is checked when the file is opened. A wildcard pattern that
/// matches nothing is an error.
pub fn resolve_sources(base: &Path, pattern: &str) -> LoadResult<Vec<PathBuf>> {
    let relative = relative_path(pattern);
    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| LoadError::config(format!("data pattern '{}' names no file", pattern)))?;
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    let dir = base.join(parent);

    if has_wildcard(&parent.to_string_lossy()) {
        return Err(LoadError::config(format!(
            "data pattern '{}': wildcards are only supported in the file name",
            pattern
        )));
    }

    if !has_wildcard(&name) {
        return Ok(vec![dir.join(name)]);
    }

    let matcher = wildcard_regex(&name)?;
    let entries = fs::read_dir(&dir).map_err(|e| LoadError::SourceScan {
        dir: dir.clone(),
        source: e,
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::SourceScan {
            dir: dir.clone(),
            source: e,
        })?;
        let path = entry.path();
        let matched = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| matcher.is_match(n));
        if matched && path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(LoadError::NoSources {
            pattern: name,
            dir,
        });
    }

    matches.sort();
    Ok(matches)
}

/// Translates a file-name wildcard into an anchored regex.
fn wildcard_regex(pattern: &str) -> LoadResult<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|e| LoadError::config(format!("invalid data pattern '{}': {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_source_name_strips_extension() {
        assert_eq!(source_name(Path::new("/data/yr1973_2012.seer9/breast.txt")), "breast");
        assert_eq!(source_name(Path::new("respir")), "respir");
        assert_eq!(source_name(Path::new("archive.tar.gz")), "archive.tar");
    }

    #[test]
    fn test_wildcard_matches_sorted() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("incidence");
        fs::create_dir(&dir).unwrap();
        touch(&dir, "respir.txt");
        touch(&dir, "breast.txt");
        touch(&dir, "colrect.txt");
        touch(&dir, "notes.md");

        let found = resolve_sources(tmp.path(), "incidence/*.txt").unwrap();
        let names: Vec<_> = found.iter().map(|p| source_name(p)).collect();
        assert_eq!(names, vec!["breast", "colrect", "respir"]);
    }

    #[test]
    fn test_question_mark_wildcard() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "part1.txt");
        touch(tmp.path(), "part2.txt");
        touch(tmp.path(), "part10.txt");

        let found = resolve_sources(tmp.path(), "part?.txt").unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_backslash_pattern() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("incidence");
        fs::create_dir(&dir).unwrap();
        touch(&dir, "breast.txt");

        let found = resolve_sources(tmp.path(), r"incidence\*.txt").unwrap();
        assert_eq!(found, vec![dir.join("breast.txt")]);
    }

    #[test]
    fn test_literal_path_passthrough() {
        let tmp = TempDir::new().unwrap();
        let found = resolve_sources(tmp.path(), "incidence/breast.txt").unwrap();
        assert_eq!(found, vec![tmp.path().join("incidence").join("breast.txt")]);
    }

    #[test]
    fn test_no_match_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "breast.dat");
        let err = resolve_sources(tmp.path(), "*.txt").unwrap_err();
        assert!(matches!(err, LoadError::NoSources { .. }));
    }

    #[test]
    fn test_wildcard_in_directory_rejected() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_sources(tmp.path(), "yr*/breast.txt").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn test_regex_metacharacters_escaped() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a+b.txt");
        touch(tmp.path(), "aab.txt");
        let found = resolve_sources(tmp.path(), "a+b*").unwrap();
        assert_eq!(found, vec![tmp.path().join("a+b.txt")]);
    }
}
