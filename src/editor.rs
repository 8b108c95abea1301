//! External editor integration.
//!
//! The editor is a collaborator behind the [`Editor`] trait: it is handed a
//! file path and blocks until the user is done with it. The flows here write
//! a temporary file, run the editor, and read the result back.

use crate::document;
use crate::types::{Meta, Task, TaskError};
use eyre::{Context, Result};
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

/// Something that lets the user edit a file in place.
pub trait Editor {
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Runs an external program, e.g. `vi` or `code --wait`, with the file path
/// appended as its last argument.
#[derive(Debug, Clone)]
pub struct CommandEditor {
    program: String,
}

impl CommandEditor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Editor for CommandEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let mut parts = self.program.split_whitespace();
        let Some(binary) = parts.next() else {
            eyre::bail!(TaskError::Editor("no editor configured".to_string()));
        };

        debug!("Launching editor {} on {}", self.program, path.display());
        let status = Command::new(binary).args(parts).arg(path).status().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                eyre::eyre!(TaskError::Editor(format!("editor '{}' not found", binary)))
            } else {
                eyre::eyre!(TaskError::Editor(format!("failed to launch editor '{}': {}", binary, e)))
            }
        })?;

        if !status.success() {
            eyre::bail!(TaskError::Editor(format!("editor '{}' exited with {}", binary, status)));
        }

        Ok(())
    }
}

fn temp_file(prefix: &str, suffix: &str, initial: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(suffix)
        .tempfile()
        .context("Failed to create temporary file")?;
    file.write_all(initial.as_bytes())
        .and_then(|_| file.flush())
        .context("Failed to write temporary file")?;
    Ok(file)
}

fn read_back(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        eyre::eyre!(TaskError::Io {
            path: path.to_path_buf(),
            source,
        })
    })
}

/// Let the user edit a task document, replacing the task's metadata and
/// contents with the edited version. The path is left alone.
pub fn edit_task(editor: &dyn Editor, task: &mut Task) -> Result<()> {
    let text = document::encode(&task.meta, &task.contents)?;
    let file = temp_file("task.", ".md", &text)?;

    editor.edit(file.path())?;

    let edited = read_back(file.path())?;
    let (meta, contents) = document::decode(&edited)
        .map_err(|e| eyre::eyre!(e))
        .wrap_err("Edited task could not be parsed")?;

    task.meta = meta;
    task.contents = contents;
    Ok(())
}

/// Let the user write a YAML metadata query in an empty file.
pub fn compose_query(editor: &dyn Editor) -> Result<Meta> {
    let file = temp_file("meta.", ".yaml", "")?;

    editor.edit(file.path())?;

    let text = read_back(file.path())?;
    document::parse_meta(&text)
        .map_err(|e| eyre::eyre!(e))
        .wrap_err("Query could not be parsed")
}
