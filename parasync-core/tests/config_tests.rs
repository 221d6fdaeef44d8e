//! Config file loading and layering tests.

use std::path::PathBuf;

use assert_fs::prelude::*;
use parasync_core::{
    config::{self, ConfigFile, Overrides, SyncConfig},
    ConfigError, ProjectId,
};
use predicates::prelude::predicate;
use rstest::rstest;

fn credentials() -> Overrides {
    Overrides {
        api_token: Some("token".into()),
        ..Overrides::default()
    }
}

// ---------------------------------------------------------------------------
// 1. Loading
// ---------------------------------------------------------------------------

#[test]
fn missing_default_file_is_an_empty_layer() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = config::load_default_at(dir.path()).expect("load");
    assert_eq!(file, ConfigFile::default());
}

#[test]
fn explicit_missing_file_is_an_io_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = config::load_file_at(&dir.path().join("nope.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("nope.yaml"));
}

#[test]
fn full_file_is_parsed() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("parasync.yaml");
    file.write_str(
        "project_id: \"10086\"\n\
         output_dir: out/CNPack\n\
         source_dir: upstream\n\
         base_url: http://localhost:8080/api\n\
         timeout_secs: 5\n\
         max_retries: 0\n\
         retry_delay_ms: 10\n\
         skip_patterns: [TM, glossary]\n",
    )
    .expect("write");
    file.assert(predicate::path::exists());

    let layer = config::load_default_at(dir.path()).expect("load");
    let cfg = SyncConfig::resolve(layer, credentials()).expect("resolve");
    assert_eq!(cfg.project_id, ProjectId::from("10086"));
    assert_eq!(cfg.output_dir, PathBuf::from("out/CNPack"));
    assert_eq!(cfg.source_dir, PathBuf::from("upstream"));
    assert_eq!(cfg.base_url, "http://localhost:8080/api");
    assert_eq!(cfg.timeout.as_secs(), 5);
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_delay.as_millis(), 10);
    assert_eq!(cfg.skip_patterns, vec!["TM".to_string(), "glossary".to_string()]);
}

// ---------------------------------------------------------------------------
// 2. Rejections
// ---------------------------------------------------------------------------

#[rstest]
#[case("unknown_key", "projectid: 1\n")]
#[case("token_in_file", "api_token: leaked\n")]
#[case("wrong_shape", "- a list\n- not a mapping\n")]
fn bad_files_return_parse_error_with_path(#[case] label: &str, #[case] body: &str) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("parasync.yaml").write_str(body).expect("write");

    let err = config::load_default_at(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{label}: got {err}");
    assert!(err.to_string().contains("parasync.yaml"), "{label}: {err}");
}

#[test]
fn numeric_project_id_is_accepted() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("parasync.yaml").write_str("project_id: 10086\n").expect("write");

    let layer = config::load_default_at(dir.path()).expect("load");
    assert_eq!(layer.project_id, Some(ProjectId::from("10086")));
}
