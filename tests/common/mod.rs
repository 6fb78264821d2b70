#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use csv_fieldset::{FieldSet, Source};
use tempfile::{TempDir, tempdir};

/// Absolute path of a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("read fixture")
}

pub fn fields(names: &[&str]) -> FieldSet {
    FieldSet::from_names(names.iter().copied()).expect("valid field set")
}

pub fn source<'a>(text: &'a str) -> Source<'a> {
    Source::new("test.csv", text)
}

/// Scratch directory for CLI tests, removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` to `name` inside the workspace and returns its path.
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }
}
