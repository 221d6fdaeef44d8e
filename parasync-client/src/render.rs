//! Rendering of one remote file's entries into the localized JSON document.
//!
//! Output layout matches what the pack's resource loaders and the existing
//! `CNPack` history expect: a JSON object indented by four spaces, `"k":"v"`
//! pairs without a space after the colon, non-ASCII written verbatim and no
//! trailing newline.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};

use parasync_core::{RemoteFile, SourceError, TranslationEntry};

const NBSP: char = '\u{00A0}';

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Local relative path for a remote file name: the `en_us` in the file name
/// becomes `zh_cn`, parent directories stay untouched.
pub fn local_path_for(name: &str) -> PathBuf {
    let remote = Path::new(name);
    let file_name = remote
        .file_name()
        .map(|n| n.to_string_lossy().replace("en_us", "zh_cn"))
        .unwrap_or_default();
    match remote.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Whether a listed file should be left out of the sync.
pub fn is_skipped(name: &str, skip_patterns: &[String]) -> bool {
    skip_patterns
        .iter()
        .any(|p| !p.is_empty() && name.contains(p.as_str()))
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Final text for one entry after the pack-specific fixups.
pub fn entry_value(entry: &TranslationEntry, is_quest_file: bool) -> String {
    let value = entry.chosen_text().replace("\\\"", "\"");
    if is_quest_file && !value.contains("image") {
        value.replace(' ', &NBSP.to_string())
    } else {
        value
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Render the localized document for `file`.
///
/// When `<source_dir>/<file.name>` exists its key order is kept and keys
/// unknown to it are dropped; otherwise all entries are emitted sorted by key.
pub fn render_file(
    file: &RemoteFile,
    entries: &[TranslationEntry],
    source_dir: &Path,
) -> Result<String, SourceError> {
    let is_quest_file = file.name.contains("quests");
    let translated: HashMap<&str, String> = entries
        .iter()
        .map(|e| (e.key.as_str(), entry_value(e, is_quest_file)))
        .collect();

    let document = match load_source(&source_path(source_dir, &file.name)?)? {
        Some(source) => source
            .into_iter()
            .map(|(key, original)| {
                let value = translated
                    .get(key.as_str())
                    .map(|v| Value::String(v.clone()))
                    .unwrap_or(original);
                (key, value)
            })
            .collect::<Map<String, Value>>(),
        None => {
            tracing::debug!("no source for {}, sorting keys", file.name);
            translated
                .into_iter()
                .collect::<BTreeMap<_, _>>()
                .into_iter()
                .map(|(k, v)| (k.to_owned(), Value::String(v)))
                .collect()
        }
    };

    to_pack_json(&Value::Object(document)).map_err(|e| SourceError::Decode {
        context: file.name.clone(),
        message: e.to_string(),
    })
}

/// `<source_dir>/<name>`, refusing names that would leave `source_dir`.
fn source_path(source_dir: &Path, name: &str) -> Result<PathBuf, SourceError> {
    let relative = Path::new(name);
    let inside = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && relative.components().any(|c| matches!(c, Component::Normal(_)));
    if !inside {
        return Err(SourceError::Decode {
            context: name.to_owned(),
            message: "remote file name escapes the source directory".to_owned(),
        });
    }
    Ok(source_dir.join(relative))
}

fn load_source(path: &Path) -> Result<Option<Map<String, Value>>, SourceError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SourceError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let decode = |message: String| SourceError::Decode {
        context: path.display().to_string(),
        message,
    };
    match serde_json::from_str::<Value>(contents.trim_start_matches('\u{feff}')) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(decode("expected a JSON object".to_owned())),
        Err(e) => Err(decode(e.to_string())),
    }
}

/// Serialize with four-space indentation and a bare `:` between key and value.
pub fn to_pack_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PackFormatter::new());
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct PackFormatter<'a>(PrettyFormatter<'a>);

impl PackFormatter<'_> {
    fn new() -> Self {
        Self(PrettyFormatter::with_indent(b"    "))
    }
}

impl Formatter for PackFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.begin_array(w)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_array(w)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, w: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(w, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_array_value(w)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.begin_object(w)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_object(w)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, w: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(w, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        w.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, w: &mut W) -> io::Result<()> {
        self.0.end_object_value(w)
    }
}
