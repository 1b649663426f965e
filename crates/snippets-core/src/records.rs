//! JSON Lines input and pretty-printed JSON output.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads a JSON Lines file: one JSON value per line, blank lines skipped.
/// `max_num` caps how many records are read (the rest of the file is not
/// parsed).
pub fn load_json_lines(path: &Path, max_num: Option<usize>) -> Result<Vec<Value>> {
    if max_num == Some(0) {
        return Ok(Vec::new());
    }
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid JSON", path.display(), lineno + 1))?;
        records.push(value);
        if max_num.is_some_and(|cap| records.len() >= cap) {
            break;
        }
    }
    Ok(records)
}

/// Writes `value` as a single pretty-printed JSON document, creating parent
/// directories as needed.
pub fn dump_json_pretty<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }
    let text = serde_json::to_string_pretty(value).context("serialize to JSON")?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_lines_and_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.jsonl");
        fs::write(&path, "{\"a\": 1}\n\n  \n{\"a\": 2}\n{\"a\": 3}\n").unwrap();
        let records = load_json_lines(&path, None).unwrap();
        assert_eq!(records, vec![json!({"a": 1}), json!({"a": 2}), json!({"a": 3})]);
    }

    #[test]
    fn max_num_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.jsonl");
        fs::write(&path, "1\n2\n3\n4\n").unwrap();
        let records = load_json_lines(&path, Some(2)).unwrap();
        assert_eq!(records, vec![json!(1), json!(2)]);
        assert!(load_json_lines(&path, Some(0)).unwrap().is_empty());
    }

    #[test]
    fn invalid_line_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "{\"ok\": true}\nnot-json\n").unwrap();
        let err = load_json_lines(&path, None).unwrap_err();
        assert!(format!("{:#}", err).contains(":2"));
    }

    #[test]
    fn dump_creates_parent_dirs_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/results.json");
        dump_json_pretty(&json!({"stats": {"n": 3}}), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains('\n'), "expected pretty-printed output");
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["stats"]["n"], json!(3));
    }
}
