//! Collecting Java sources from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::SourceInput;
use super::build_file::BuildFile;
use crate::emit::TargetProfile;

/// Extension of convertible sources
pub const SOURCE_EXTENSION: &str = "java";

/// Every `*.java` file under `dir`, named by its path relative to `dir`.
///
/// Inputs are sorted by unit name so runs do not depend on directory order.
/// Hidden directories (`.git`, build caches) are skipped.
pub fn collect_sources(dir: impl AsRef<Path>) -> Result<Vec<SourceInput>, String> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(format!("Directory not found: {}", dir.display()));
    }

    let mut inputs = Vec::new();
    let mut errors = Vec::new();
    let walker = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errors.push(e.to_string());
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_source_extension(entry.path()) {
            continue;
        }
        match fs::read_to_string(entry.path()) {
            Ok(text) => inputs.push(SourceInput::new(unit_name(dir, entry.path()), text)),
            Err(e) => errors.push(format!("{}: {e}", entry.path().display())),
        }
    }

    if !errors.is_empty() {
        return Err(format!(
            "Failed to read {} file(s):\n  {}",
            errors.len(),
            errors.join("\n  ")
        ));
    }
    inputs.sort_by(|a, b| a.unit_name.cmp(&b.unit_name));
    debug!(dir = %dir.display(), sources = inputs.len(), "collected sources");
    Ok(inputs)
}

/// Inputs of a project directory and the build file that located them
#[derive(Clone, Debug, Default)]
pub struct ProjectSources {
    pub build: Option<BuildFile>,
    pub inputs: Vec<SourceInput>,
}

impl ProjectSources {
    /// `profile` adjusted by the build file, if there is one
    pub fn configure(&self, profile: TargetProfile) -> TargetProfile {
        match &self.build {
            Some(build) => build.configure(profile),
            None => profile,
        }
    }
}

/// Sources of a Gradle project.
///
/// With a build file, only its Java source and test directories are read and
/// unit names are relative to those directories. Without one, or when none of
/// its directories exist, the whole directory is collected.
pub fn collect_project(root: impl AsRef<Path>) -> Result<ProjectSources, String> {
    let root = root.as_ref();
    let build = BuildFile::load(root).map_err(|e| e.to_string())?;
    let dirs: Vec<PathBuf> = build
        .iter()
        .flat_map(|b| b.java_roots())
        .map(|dir| root.join(dir))
        .filter(|dir| dir.is_dir())
        .collect();
    if dirs.is_empty() {
        let inputs = collect_sources(root)?;
        return Ok(ProjectSources { build, inputs });
    }

    let mut inputs = Vec::new();
    for dir in &dirs {
        inputs.extend(collect_sources(dir)?);
    }
    inputs.sort_by(|a, b| a.unit_name.cmp(&b.unit_name));
    debug!(root = %root.display(), roots = dirs.len(), sources = inputs.len(), "collected project");
    Ok(ProjectSources { build, inputs })
}

fn has_source_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
}

/// `com/example/LoginTest.java`, with `/` separators on every platform
fn unit_name(root: &Path, path: &Path) -> String {
    let relative: PathBuf = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
