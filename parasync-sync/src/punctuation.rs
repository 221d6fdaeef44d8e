//! Full-width punctuation pass over the localized `.json` files.
//!
//! Only string values are touched; keys such as `item.mod.gear` must stay
//! ASCII for the game to find them. Within a value, an ASCII mark is replaced by its full-width form only when both of its
//! neighbours exist and neither is a quote, a colon or a CJK ideograph
//! (U+4E00..=U+9FA5). That leaves JSON structure (`"k":"v"`, `{`, `,` at line
//! ends) and text already punctuated next to Chinese characters alone.
//! Marks are processed one after another in table order; each pass looks at
//! the text as the previous pass left it.

use std::path::Path;

use chrono::Utc;
use ignore::WalkBuilder;
use serde_json::Value;

use parasync_client::render::to_pack_json;

use crate::error::{io_err, SyncError};
use crate::writer::{atomic_write, SyncReport};

/// ASCII mark and its replacement, in application order.
pub const FULL_WIDTH: [(char, char); 16] = [
    (',', '，'),
    ('.', '。'),
    (';', '；'),
    ('?', '？'),
    ('!', '！'),
    ('(', '（'),
    (')', '）'),
    ('[', '【'),
    (']', '】'),
    ('{', '｛'),
    ('}', '｝'),
    ('<', '《'),
    ('>', '》'),
    ('/', '／'),
    ('\\', '＼'),
    ('|', '｜'),
];

fn is_boundary(c: char) -> bool {
    matches!(c, '"' | '\'' | ':' | '\u{4E00}'..='\u{9FA5}')
}

fn replace_mark(text: &str, ascii: char, full: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between = i > 0
                && i + 1 < chars.len()
                && !is_boundary(chars[i - 1])
                && !is_boundary(chars[i + 1]);
            if c == ascii && between {
                full
            } else {
                c
            }
        })
        .collect()
}

/// Apply every replacement in [`FULL_WIDTH`] to `text`.
pub fn normalize(text: &str) -> String {
    FULL_WIDTH
        .iter()
        .fold(text.to_owned(), |acc, &(ascii, full)| {
            if acc.contains(ascii) {
                replace_mark(&acc, ascii, full)
            } else {
                acc
            }
        })
}

/// Normalize every string inside `value`, leaving object keys alone.
/// Returns whether anything changed.
pub fn normalize_value(value: &mut Value) -> bool {
    match value {
        Value::String(text) => {
            let normalized = normalize(text);
            let changed = normalized != *text;
            *text = normalized;
            changed
        }
        Value::Array(items) => items.iter_mut().fold(false, |acc, v| normalize_value(v) | acc),
        Value::Object(map) => map.values_mut().fold(false, |acc, v| normalize_value(v) | acc),
        _ => false,
    }
}

/// Normalized document for `content`, or `None` when nothing changes.
fn normalize_document(content: &str) -> Result<Option<String>, serde_json::Error> {
    let mut document: Value = serde_json::from_str(content.trim_start_matches('\u{feff}'))?;
    if !normalize_value(&mut document) {
        return Ok(None);
    }
    to_pack_json(&document).map(Some)
}

/// Normalize every `.json` file under `output_root` in place.
///
/// Files are rewritten through the same compare-then-atomic-write path as a
/// sync, so an already clean file is reported as unchanged and keeps its
/// mtime. Changed files are written back in the pack layout. Files that are
/// not valid JSON are skipped with a warning. A missing `output_root` yields
/// an empty report.
pub fn check(output_root: &Path, dry_run: bool) -> Result<SyncReport, SyncError> {
    let started_at = Utc::now();
    let mut writes = Vec::new();

    if output_root.exists() {
        let walker = WalkBuilder::new(output_root)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        for entry in walker {
            let entry = entry.map_err(|source| SyncError::Walk {
                path: output_root.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if !is_json || !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
            let relative = path.strip_prefix(output_root).unwrap_or(path);
            let normalized = match normalize_document(&content) {
                Ok(normalized) => normalized.unwrap_or(content),
                Err(e) => {
                    tracing::warn!("skipping {}: {e}", relative.display());
                    continue;
                }
            };
            writes.push(atomic_write(path, relative, &normalized, dry_run)?);
        }
    } else {
        tracing::debug!("{} does not exist, nothing to check", output_root.display());
    }

    let report = SyncReport {
        started_at,
        finished_at: Utc::now(),
        dry_run,
        writes,
    };
    tracing::info!(
        "punctuation check finished: {} changed, {} unchanged",
        report.changed().len(),
        report.unchanged_count()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::WriteResult;
    use rstest::rstest;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[rstest]
    #[case::between_latin_letters("a,b", "a，b")]
    #[case::after_word_before_space("Hello, world", "Hello， world")]
    #[case::ellipsis_runs("wait...ok", "wait。。。ok")]
    #[case::next_to_cjk_left_alone("中,文", "中,文")]
    #[case::cjk_on_one_side("中,a", "中,a")]
    #[case::quote_neighbour("\",x", "\",x")]
    #[case::colon_neighbour("a:(b", "a:(b")]
    #[case::start_of_text(",a", ",a")]
    #[case::end_of_text("a.", "a.")]
    #[case::single_quote("it's.x", "it's。x")]
    #[case::brackets("f(x)y", "f（x）y")]
    #[case::slash_and_pipe("a/b|c", "a／b｜c")]
    #[case::backslash("a\\b", "a＼b")]
    #[case::angle("x<y>z", "x《y》z")]
    fn lookaround_rule(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[test]
    fn earlier_replacements_count_as_ordinary_neighbours() {
        // `,` becomes `，` first; the `.` pass then sees `，` on its left.
        assert_eq!(normalize("a,.b"), "a，。b");
    }

    #[test]
    fn keys_are_left_alone() {
        let doc = "{\n    \"a.key\":\"Hello, world.\",\n    \"b.key\":\"齿轮,\"\n}";
        assert_eq!(
            normalize_document(doc).unwrap().as_deref(),
            Some("{\n    \"a.key\":\"Hello， world.\",\n    \"b.key\":\"齿轮,\"\n}")
        );
    }

    #[test]
    fn clean_document_is_not_reformatted() {
        assert_eq!(normalize_document("{ \"a.b\": \"甲。\" }").unwrap(), None);
    }

    #[test]
    fn check_rewrites_json_files_only() {
        let out = TempDir::new().unwrap();
        fs::create_dir_all(out.path().join("lang")).unwrap();
        fs::write(out.path().join("lang/zh_cn.json"), "{\"k\":\"a,b\"}").unwrap();
        fs::write(out.path().join("lang/clean.json"), "{\"k\":\"甲\"}").unwrap();
        fs::write(out.path().join("notes.txt"), "a,b").unwrap();

        let report = check(out.path(), false).unwrap();

        let changed: BTreeSet<PathBuf> = [PathBuf::from("lang/zh_cn.json")].into();
        assert_eq!(report.changed(), changed);
        assert_eq!(report.unchanged_count(), 1);
        assert_eq!(
            fs::read_to_string(out.path().join("lang/zh_cn.json")).unwrap(),
            "{\n    \"k\":\"a，b\"\n}"
        );
        assert_eq!(fs::read_to_string(out.path().join("notes.txt")).unwrap(), "a,b");
    }

    #[test]
    fn check_dry_run_writes_nothing() {
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("zh_cn.json"), "{\"k\":\"a,b\"}").unwrap();

        let report = check(out.path(), true).unwrap();

        assert!(matches!(report.writes[..], [WriteResult::WouldWrite { .. }]));
        assert_eq!(
            fs::read_to_string(out.path().join("zh_cn.json")).unwrap(),
            "{\"k\":\"a,b\"}"
        );
    }

    #[test]
    fn check_is_idempotent() {
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("zh_cn.json"), "{\"k\":\"x(y).z\"}").unwrap();

        check(out.path(), false).unwrap();
        let second = check(out.path(), false).unwrap();

        assert!(second.changed().is_empty());
    }

    #[test]
    fn invalid_json_is_skipped() {
        let out = TempDir::new().unwrap();
        fs::write(out.path().join("broken.json"), "{\"k\":\"a,b\"").unwrap();

        let report = check(out.path(), false).unwrap();

        assert!(report.writes.is_empty());
        assert_eq!(
            fs::read_to_string(out.path().join("broken.json")).unwrap(),
            "{\"k\":\"a,b\""
        );
    }

    #[test]
    fn missing_output_root_is_empty() {
        let out = TempDir::new().unwrap();
        let report = check(&out.path().join("absent"), false).unwrap();
        assert!(report.writes.is_empty());
    }
}
