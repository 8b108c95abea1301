//! Taskdoc: plain-text task files with structured metadata.
//!
//! Each task is a markdown document with a YAML header. Tasks can be searched
//! by metadata containment, and links between tasks can be turned into
//! `backlinks` entries on the tasks they point at.
//!
//! # Example
//!
//! ```no_run
//! use taskdoc::{Meta, Store, Value, generate_backlinks};
//! use std::path::Path;
//!
//! let store = Store::open(Path::new("./tasks")).unwrap();
//!
//! // Create and persist a task
//! let mut task = store.draft("Write docs", Meta::new()).unwrap();
//! task.contents = "Depends on [Outline](./Outline.md)".to_string();
//! store.save(&task).unwrap();
//!
//! // Search by metadata
//! let mut query = Meta::new();
//! query.insert("title".to_string(), Value::from("Write docs"));
//! assert_eq!(store.find_by_meta(&query).unwrap(), vec!["Write_docs.md"]);
//!
//! // Record the reference on Outline.md
//! let report = generate_backlinks(&store, &task.path).unwrap();
//! assert!(report.failures.is_empty());
//! ```

mod document;
mod links;
mod matcher;
mod store;
mod types;

pub mod attributes;
pub mod backlinks;
pub mod editor;

// Re-export public API
pub use backlinks::{BACKLINKS_KEY, BacklinkFailure, BacklinkReport, add_backlink, generate_backlinks};
pub use document::{DELIMITER, decode, encode, parse_meta};
pub use editor::{CommandEditor, Editor, compose_query, edit_task};
pub use links::{extract_links, is_external};
pub use matcher::matches;
pub use store::{Store, TASK_EXTENSION, TITLE_KEY, is_contained, normalize_path, title_to_path, with_extension};
pub use types::{Link, Meta, Task, TaskError, Value};
