//! File-backed task store.
//!
//! Every task lives in its own `*.md` document directly under the store root.
//! Paths handed to the store are always relative to that root.

use crate::document;
use crate::matcher;
use crate::types::{Meta, Task, TaskError, Value};
use eyre::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// File extension of task documents.
pub const TASK_EXTENSION: &str = "md";

/// Metadata key holding the task title.
pub const TITLE_KEY: &str = "title";

/// Map a title to its task path: spaces become underscores, `.md` appended.
pub fn title_to_path(title: &str) -> String {
    format!("{}.{}", title.replace(' ', "_"), TASK_EXTENSION)
}

/// Accept a task name with or without the `.md` extension.
pub fn with_extension(name: &str) -> String {
    let name = normalize_path(name);
    if Path::new(&name).extension().is_some_and(|ext| ext == TASK_EXTENSION) {
        name
    } else {
        format!("{}.{}", name, TASK_EXTENSION)
    }
}

/// Strip leading `./` segments so equal locations compare equal.
pub fn normalize_path(path: &str) -> String {
    let mut path = path.trim();
    while let Some(rest) = path.strip_prefix("./") {
        path = rest.trim_start_matches('/');
    }
    path.to_string()
}

/// True if `path` names a location under the store root: relative, with no
/// `..` segments.
pub fn is_contained(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn validate_title(title: &str) -> Result<(), TaskError> {
    if title.trim().is_empty() {
        return Err(TaskError::InvalidTitle("title is required".to_string()));
    }
    if title.chars().any(|c| c.is_control()) {
        return Err(TaskError::InvalidTitle("title contains control characters".to_string()));
    }
    if title.contains('/') || title.contains('\\') {
        return Err(TaskError::InvalidTitle("title cannot contain path separators".to_string()));
    }
    Ok(())
}

/// The task store.
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store rooted at an existing directory.
    pub fn open(root: &Path) -> Result<Self> {
        let metadata = fs::metadata(root).map_err(|source| {
            eyre::eyre!(TaskError::Io {
                path: root.to_path_buf(),
                source,
            })
        })?;
        if !metadata.is_dir() {
            eyre::bail!("Store root is not a directory: {}", root.display());
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Map a root-relative path onto the filesystem, refusing anything that
    /// would escape the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        if !is_contained(path) {
            eyre::bail!(TaskError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(path))
    }

    /// Build a task in memory. Nothing is written until `save`.
    pub fn create(&self, meta: Meta, contents: &str, path: &str) -> Task {
        Task::new(normalize_path(path), meta, contents)
    }

    /// Build a new task for `title` at a collision-free path.
    ///
    /// Metadata starts as `{title: <title>}`; `attributes` are merged in without
    /// overwriting it.
    pub fn draft(&self, title: &str, attributes: Meta) -> Result<Task> {
        validate_title(title).map_err(|e| eyre::eyre!(e))?;

        let path = self.allocate_path(title)?;
        let mut meta = Meta::new();
        meta.insert(TITLE_KEY.to_string(), Value::from(title));
        for (key, value) in attributes {
            meta.entry(key).or_insert(value);
        }

        Ok(self.create(meta, "", &path))
    }

    /// Write a task document, replacing whatever is stored at its path.
    pub fn save(&self, task: &Task) -> Result<()> {
        let text = document::encode(&task.meta, &task.contents)
            .wrap_err_with(|| format!("Failed to encode {}", task.path))?;
        let file = self.resolve(&task.path)?;

        fs::write(&file, text).map_err(|source| eyre::eyre!(TaskError::Io { path: file, source }))?;

        info!("Saved task {}", task.path);
        Ok(())
    }

    /// Load a task by root-relative path, returning `None` if no document exists.
    pub fn get(&self, path: &str) -> Result<Option<Task>> {
        let path = normalize_path(path);
        let file = self.resolve(&path)?;

        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(eyre::eyre!(TaskError::Io { path: file, source })),
        };

        let (meta, contents) = document::decode(&text)
            .map_err(|e| eyre::eyre!(e))
            .wrap_err_with(|| format!("Failed to decode {}", path))?;

        debug!("Loaded task {}", path);
        Ok(Some(Task::new(path, meta, contents)))
    }

    /// Load a task by root-relative path.
    pub fn load(&self, path: &str) -> Result<Task> {
        self.get(path)?
            .ok_or_else(|| eyre::eyre!(TaskError::NotFound(normalize_path(path))))
    }

    /// Look up the task whose path derives from `title`.
    pub fn search_by_title(&self, title: &str) -> Result<Option<Task>> {
        self.get(&title_to_path(title))
    }

    /// Pick a path for `title` that no stored task uses yet.
    ///
    /// Probes `title`, then `title.1`, `title.2`, ... until a lookup misses.
    pub fn allocate_path(&self, title: &str) -> Result<String> {
        let mut candidate = title.to_string();
        let mut suffix = 0u32;

        while self.search_by_title(&candidate)?.is_some() {
            suffix += 1;
            candidate = format!("{}.{}", title, suffix);
        }

        debug!("Allocated {} for title {:?}", title_to_path(&candidate), title);
        Ok(title_to_path(&candidate))
    }

    /// Paths of every task whose metadata contains `query`, sorted by name.
    ///
    /// Only `*.md` files directly under the root are considered. Any load
    /// failure aborts the whole scan.
    pub fn find_by_meta(&self, query: &Meta) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root).map_err(|source| {
            eyre::eyre!(TaskError::Io {
                path: self.root.clone(),
                source,
            })
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| {
                eyre::eyre!(TaskError::Io {
                    path: self.root.clone(),
                    source,
                })
            })?;
            let file_path = entry.path();
            if !file_path.is_file() || file_path.extension().is_none_or(|ext| ext != TASK_EXTENSION) {
                continue;
            }
            let name = entry.file_name();
            let name = name
                .to_str()
                .ok_or_else(|| eyre::eyre!(TaskError::InvalidPath(name.to_string_lossy().into_owned())))?;
            names.push(name.to_string());
        }
        names.sort();

        let mut found = Vec::new();
        for name in names {
            let task = self.load(&name)?;
            if matcher::matches(&task.meta, query) {
                found.push(task.path);
            }
        }

        debug!("{} task(s) matched query", found.len());
        Ok(found)
    }
}
