//! Whole-document JSON persistence with atomic replacement
//!
//! Both durable documents (checkpoint state and the learned alias overlay)
//! are read fully at startup and rewritten fully after every mutation. A
//! write goes to `<file>.tmp` first and is then renamed over the target, so a
//! reader never observes a partial document.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// A persisted document with an explicit schema version.
pub trait Versioned {
    const VERSION: u32;

    fn version(&self) -> u32;
}

/// Result of reading a document from disk.
#[derive(Debug)]
pub enum LoadOutcome<T> {
    Loaded(T),
    Missing,
    /// Unreadable, unparsable or wrong schema version; the reason is attached.
    Invalid(String),
}

pub fn load_document<T>(path: &Path) -> LoadOutcome<T>
where
    T: DeserializeOwned + Versioned,
{
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LoadOutcome::Missing,
        Err(e) => return LoadOutcome::Invalid(format!("read failed: {e}")),
    };

    match serde_json::from_str::<T>(&content) {
        Ok(doc) if doc.version() == T::VERSION => LoadOutcome::Loaded(doc),
        Ok(doc) => LoadOutcome::Invalid(format!(
            "schema version {} does not match expected {}",
            doc.version(),
            T::VERSION
        )),
        Err(e) => LoadOutcome::Invalid(format!("parse failed: {e}")),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn save_document<T: Serialize>(path: &Path, doc: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(doc).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = temp_path(path);
    fs::write(&tmp, json).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
