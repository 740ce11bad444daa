//! Atomic output: every file of a run lands, or none does.
//!
//! Files are first written to a staging directory inside the destination (so
//! renames never cross filesystems), then renamed into place one by one. Files
//! they replace are parked in the staging directory until the run commits; on
//! failure the placed files are removed and the parked ones restored.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::emit::ConversionUnit;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("output path `{}` must be relative and stay inside the output directory", .0.display())]
    InvalidPath(PathBuf),
}

impl OutputError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> OutputError + '_ {
        move |source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;

const STAGING_PREFIX: &str = ".testport-staging-";

/// A file renamed into place, and what it replaced
struct Placed {
    destination: PathBuf,
    parked: Option<PathBuf>,
}

/// Write `files` under `root`, all or nothing.
pub fn write_atomic(root: impl AsRef<Path>, files: &[ConversionUnit]) -> Result<()> {
    let root = root.as_ref();
    for file in files {
        check_relative(&file.path)?;
    }
    fs::create_dir_all(root).map_err(OutputError::io(root))?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(root)
        .map_err(OutputError::io(root))?;
    let staged = staging.path().join("files");
    let parked = staging.path().join("replaced");

    for file in files {
        let path = staged.join(&file.path);
        create_parent(&path)?;
        fs::write(&path, &file.text).map_err(OutputError::io(&path))?;
    }

    let mut placed = Vec::with_capacity(files.len());
    for file in files {
        match place(root, &staged, &parked, &file.path) {
            Ok(entry) => placed.push(entry),
            Err(error) => {
                warn!(%error, placed = placed.len(), "output failed, rolling back");
                rollback(placed);
                return Err(error);
            }
        }
    }
    debug!(root = %root.display(), files = files.len(), "output committed");
    // dropping the staging directory discards replaced files
    Ok(())
}

fn place(root: &Path, staged: &Path, parked: &Path, relative: &Path) -> Result<Placed> {
    let destination = root.join(relative);
    create_parent(&destination)?;
    let replaced = if destination.exists() {
        let backup = parked.join(relative);
        create_parent(&backup)?;
        fs::rename(&destination, &backup).map_err(OutputError::io(&destination))?;
        Some(backup)
    } else {
        None
    };
    let source = staged.join(relative);
    if let Err(source_error) = fs::rename(&source, &destination) {
        if let Some(backup) = &replaced {
            let _ = fs::rename(backup, &destination);
        }
        return Err(OutputError::Io {
            path: destination,
            source: source_error,
        });
    }
    Ok(Placed {
        destination,
        parked: replaced,
    })
}

fn rollback(placed: Vec<Placed>) {
    for entry in placed.into_iter().rev() {
        if let Err(error) = fs::remove_file(&entry.destination) {
            warn!(path = %entry.destination.display(), %error, "rollback could not remove file");
        }
        if let Some(backup) = entry.parked {
            if let Err(error) = fs::rename(&backup, &entry.destination) {
                warn!(path = %entry.destination.display(), %error, "rollback could not restore file");
            }
        }
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(OutputError::io(parent)),
        None => Ok(()),
    }
}

fn check_relative(path: &Path) -> Result<()> {
    let valid = path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if valid {
        Ok(())
    } else {
        Err(OutputError::InvalidPath(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::ConversionKind;
    use tempfile::TempDir;

    fn file(path: &str, text: &str) -> ConversionUnit {
        ConversionUnit {
            name: path.into(),
            path: PathBuf::from(path),
            kind: ConversionKind::TestClass,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_writes_every_file() {
        let dir = TempDir::new().unwrap();
        write_atomic(dir.path(), &[file("tests/a.spec.ts", "a"), file("tests/pages/P.ts", "p")]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("tests/a.spec.ts")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dir.path().join("tests/pages/P.ts")).unwrap(), "p");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(STAGING_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_replaces_existing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), "old").unwrap();
        write_atomic(dir.path(), &[file("package.json", "new")]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("package.json")).unwrap(), "new");
    }

    #[test]
    fn test_rejects_escaping_paths_before_writing() {
        let dir = TempDir::new().unwrap();
        let result = write_atomic(dir.path(), &[file("ok.ts", "x"), file("../escape.ts", "y")]);
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
        assert!(!dir.path().join("ok.ts").exists());
    }

    #[test]
    fn test_failure_rolls_back_placed_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.ts"), "original").unwrap();
        // a plain file where the second file needs a directory
        fs::write(dir.path().join("pages"), "not a directory").unwrap();
        let result = write_atomic(dir.path(), &[file("a.ts", "new"), file("pages/P.ts", "p")]);
        assert!(matches!(result, Err(OutputError::Io { .. })));
        assert_eq!(fs::read_to_string(dir.path().join("a.ts")).unwrap(), "original");
        assert_eq!(fs::read_to_string(dir.path().join("pages")).unwrap(), "not a directory");
    }
}
