//! Shared test infrastructure for taskdoc integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use taskdoc::{Editor, Meta, Store, Task};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub store: Store,
}

impl TestEnv {
    /// Create a new test environment over an empty task directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let store = Store::open(&root).expect("Failed to open store");
        Self { temp_dir, root, store }
    }

    /// Like `new`, but the store lives in a `store/` subdirectory so files can
    /// be placed next to it, outside its root.
    pub fn nested() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("store");
        fs::create_dir(&root).expect("Failed to create store dir");
        let store = Store::open(&root).expect("Failed to open store");
        Self { temp_dir, root, store }
    }

    /// Save a task whose metadata is given as YAML.
    pub fn save_task(&self, path: &str, meta_yaml: &str, contents: &str) -> Task {
        let task = self.store.create(meta(meta_yaml), contents, path);
        self.store.save(&task).expect("Failed to save task");
        task
    }

    /// Write a raw file into the task directory.
    pub fn write_raw(&self, path: &str, text: &str) {
        fs::write(self.root.join(path), text).expect("Failed to write file");
    }

    /// Read a raw file from the task directory.
    pub fn read_raw(&self, path: &str) -> String {
        fs::read_to_string(self.root.join(path)).expect("Failed to read file")
    }

    /// Load a task, panicking if it is missing.
    pub fn load(&self, path: &str) -> Task {
        self.store.load(path).expect("Failed to load task")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse YAML into metadata.
pub fn meta(yaml: &str) -> Meta {
    taskdoc::parse_meta(yaml).expect("Invalid YAML in test")
}

/// Editor double that overwrites the file with fixed text.
pub struct ScriptedEditor {
    pub text: String,
}

impl ScriptedEditor {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

impl Editor for ScriptedEditor {
    fn edit(&self, path: &Path) -> eyre::Result<()> {
        fs::write(path, &self.text)?;
        Ok(())
    }
}

/// Editor double that always fails.
pub struct FailingEditor;

impl Editor for FailingEditor {
    fn edit(&self, _path: &Path) -> eyre::Result<()> {
        eyre::bail!(taskdoc::TaskError::Editor("editor exited with status 1".to_string()))
    }
}
