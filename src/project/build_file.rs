//! Reading Gradle build files.
//!
//! Only what feeds the converted project is read: the project name, the Java
//! source and test directories, declared dependencies, plugins and
//! repositories. Both the Groovy (`build.gradle`) and Kotlin
//! (`build.gradle.kts`) spellings are accepted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::emit::TargetProfile;

#[derive(Debug, Error)]
pub enum BuildFileError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("build file pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, BuildFileError>;

/// Build files looked for in a project root, in order
pub const BUILD_FILES: [&str; 2] = ["build.gradle", "build.gradle.kts"];
const SETTINGS_FILES: [&str; 2] = ["settings.gradle", "settings.gradle.kts"];

const DEFAULT_SOURCE_DIR: &str = "src/main/java";
const DEFAULT_TEST_DIR: &str = "src/test/java";

/// `testImplementation 'org.seleniumhq.selenium:selenium-java:4.18.1'`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildDependency {
    pub configuration: String,
    pub group: String,
    pub name: String,
    pub version: String,
}

/// What a Gradle build file says about the project
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildFile {
    pub project_name: Option<String>,
    pub source_dirs: Vec<String>,
    pub test_dirs: Vec<String>,
    pub dependencies: Vec<BuildDependency>,
    pub plugins: Vec<String>,
    pub repositories: Vec<String>,
}

impl Default for BuildFile {
    fn default() -> Self {
        Self {
            project_name: None,
            source_dirs: vec![DEFAULT_SOURCE_DIR.to_string()],
            test_dirs: vec![DEFAULT_TEST_DIR.to_string()],
            dependencies: Vec::new(),
            plugins: Vec::new(),
            repositories: Vec::new(),
        }
    }
}

struct Patterns {
    project_name: Regex,
    block_start: Regex,
    quoted: Regex,
    coordinate: Regex,
    map_coordinate: Regex,
    plugin_id: Regex,
    apply_plugin: Regex,
    maven_url: Regex,
}

impl Patterns {
    fn new() -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            project_name: Regex::new(
                r#"(?m)^\s*(?:archivesBaseName|rootProject\.name|project\.name)\s*=\s*["']([^"']+)["']"#,
            )?,
            block_start: Regex::new(r"\b(\w+)\s*\{")?,
            quoted: Regex::new(r#"["']([^"']+)["']"#)?,
            coordinate: Regex::new(r#"(\w+)\s*\(?\s*["']([^:"']+):([^:"']+):([^"']+)["']"#)?,
            map_coordinate: Regex::new(
                r#"(\w+)\s*\(?\s*group\s*[:=]\s*["']([^"']+)["']\s*,\s*name\s*[:=]\s*["']([^"']+)["']\s*,\s*version\s*[:=]\s*["']([^"']+)["']"#,
            )?,
            plugin_id: Regex::new(r#"\bid\s*\(?\s*["']([^"']+)["']"#)?,
            apply_plugin: Regex::new(r#"apply\s*\(?\s*plugin\s*[:=]\s*["']([^"']+)["']"#)?,
            maven_url: Regex::new(r#"url\s*=?\s*(?:uri\s*\()?\s*["']([^"']+)["']"#)?,
        })
    }
}

lazy_static! {
    static ref PATTERNS: std::result::Result<Patterns, regex::Error> = Patterns::new();
}

fn patterns() -> Result<&'static Patterns> {
    PATTERNS.as_ref().map_err(|e| BuildFileError::Pattern(e.clone()))
}

impl BuildFile {
    /// Read the build file text of one project
    pub fn parse(text: &str) -> Result<Self> {
        let p = patterns()?;
        let mut build = BuildFile {
            project_name: p.project_name.captures(text).map(|c| c[1].to_string()),
            ..BuildFile::default()
        };

        if let Some(source_sets) = block(p, text, "sourceSets") {
            if let Some(dirs) = java_dirs(p, source_sets, "main") {
                build.source_dirs = dirs;
            }
            if let Some(dirs) = java_dirs(p, source_sets, "test") {
                build.test_dirs = dirs;
            }
        }

        for deps in blocks(p, text, "dependencies") {
            for line in deps.lines() {
                let found = p
                    .map_coordinate
                    .captures(line)
                    .or_else(|| p.coordinate.captures(line));
                if let Some(c) = found {
                    build.dependencies.push(BuildDependency {
                        configuration: c[1].to_string(),
                        group: c[2].to_string(),
                        name: c[3].to_string(),
                        version: c[4].to_string(),
                    });
                }
            }
        }

        if let Some(plugins) = block(p, text, "plugins") {
            build
                .plugins
                .extend(p.plugin_id.captures_iter(plugins).map(|c| c[1].to_string()));
        }
        build
            .plugins
            .extend(p.apply_plugin.captures_iter(text).map(|c| c[1].to_string()));

        if let Some(repositories) = block(p, text, "repositories") {
            for known in ["mavenCentral", "mavenLocal", "jcenter", "google", "gradlePluginPortal"] {
                if repositories.contains(&format!("{known}()")) {
                    build.repositories.push(known.to_string());
                }
            }
            for maven in blocks(p, repositories, "maven") {
                if let Some(c) = p.maven_url.captures(maven) {
                    build.repositories.push(format!("maven:{}", &c[1]));
                }
            }
        }
        Ok(build)
    }

    /// The build file in `root`, if there is one.
    ///
    /// Without a name in the build file, `rootProject.name` from the settings
    /// file is used.
    pub fn load(root: impl AsRef<Path>) -> Result<Option<Self>> {
        let root = root.as_ref();
        let Some(path) = BUILD_FILES.iter().map(|name| root.join(name)).find(|p| p.is_file()) else {
            return Ok(None);
        };
        let mut build = Self::parse(&read(&path)?)?;
        if build.project_name.is_none() {
            let settings = SETTINGS_FILES.iter().map(|name| root.join(name)).find(|p| p.is_file());
            if let Some(settings) = settings {
                let text = read(&settings)?;
                build.project_name = patterns()?
                    .project_name
                    .captures(&text)
                    .map(|c| c[1].to_string());
            }
        }
        debug!(
            path = %path.display(),
            project = ?build.project_name,
            dependencies = build.dependencies.len(),
            "read build file"
        );
        Ok(Some(build))
    }

    /// Source directories first, then test directories, without repeats
    pub fn java_roots(&self) -> Vec<&str> {
        let mut roots: Vec<&str> = Vec::new();
        for dir in self.source_dirs.iter().chain(&self.test_dirs) {
            if !roots.contains(&dir.as_str()) {
                roots.push(dir);
            }
        }
        roots
    }

    pub fn dependency(&self, group: &str, name: &str) -> Option<&BuildDependency> {
        self.dependencies
            .iter()
            .find(|d| d.group == group && d.name == name)
    }

    /// Project name as an npm package name
    pub fn package_name(&self) -> Option<String> {
        let name = self.project_name.as_deref()?;
        let mut out = String::with_capacity(name.len());
        for c in name.trim().chars() {
            match c {
                'A'..='Z' => out.push(c.to_ascii_lowercase()),
                'a'..='z' | '0'..='9' | '-' | '.' | '_' => out.push(c),
                _ if !out.ends_with('-') => out.push('-'),
                _ => {}
            }
        }
        let out = out.trim_matches(|c| matches!(c, '-' | '.' | '_')).to_string();
        (!out.is_empty()).then_some(out)
    }

    /// `profile` with the project name carried into its scaffold files
    pub fn configure(&self, profile: TargetProfile) -> TargetProfile {
        match self.package_name() {
            Some(name) => profile.with_project_name(name),
            None => profile,
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| BuildFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Body of every `name { ... }` block, braces balanced
fn blocks<'t>(p: &Patterns, text: &'t str, name: &str) -> Vec<&'t str> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(c) = p.block_start.captures_at(text, from) {
        let Some(whole) = c.get(0) else { break };
        from = whole.end();
        if &c[1] != name {
            continue;
        }
        if let Some(end) = closing_brace(&text[whole.end()..]) {
            found.push(&text[whole.end()..whole.end() + end]);
            from = whole.end() + end;
        }
    }
    found
}

fn block<'t>(p: &Patterns, text: &'t str, name: &str) -> Option<&'t str> {
    blocks(p, text, name).into_iter().next()
}

/// Offset of the brace closing an already opened block
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (offset, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// `main { java { srcDirs = ['a', 'b'] } }` → `["a", "b"]`
fn java_dirs(p: &Patterns, source_sets: &str, set: &str) -> Option<Vec<String>> {
    let java = block(p, block(p, source_sets, set)?, "java")?;
    let dirs: Vec<String> = java
        .lines()
        .filter(|line| line.contains("srcDir"))
        .flat_map(|line| p.quoted.captures_iter(line).map(|c| c[1].to_string()))
        .collect();
    (!dirs.is_empty()).then_some(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GROOVY: &str = r#"
plugins {
    id 'java'
    id "io.qameta.allure" version "2.11.2"
}

archivesBaseName = 'Shop UI Tests'

repositories {
    mavenCentral()
    maven { url 'https://repo.example.com/releases' }
}

sourceSets {
    main {
        java {
            srcDirs = ['src/framework/java']
        }
    }
    test {
        java {
            srcDir 'src/ui-tests/java'
        }
    }
}

dependencies {
    implementation 'org.seleniumhq.selenium:selenium-java:4.18.1'
    testImplementation group: 'junit', name: 'junit', version: '4.13.2'
}
"#;

    #[test]
    fn test_groovy_build_file() {
        let build = BuildFile::parse(GROOVY).unwrap();
        assert_eq!(build.project_name.as_deref(), Some("Shop UI Tests"));
        assert_eq!(build.source_dirs, vec!["src/framework/java"]);
        assert_eq!(build.test_dirs, vec!["src/ui-tests/java"]);
        assert_eq!(build.plugins, vec!["java", "io.qameta.allure"]);
        assert_eq!(
            build.repositories,
            vec!["mavenCentral", "maven:https://repo.example.com/releases"]
        );
        let selenium = build
            .dependency("org.seleniumhq.selenium", "selenium-java")
            .unwrap();
        assert_eq!((selenium.configuration.as_str(), selenium.version.as_str()), ("implementation", "4.18.1"));
        let junit = build.dependency("junit", "junit").unwrap();
        assert_eq!(junit.configuration, "testImplementation");
        assert_eq!(build.package_name().as_deref(), Some("shop-ui-tests"));
    }

    #[test]
    fn test_kotlin_build_file() {
        let build = BuildFile::parse(
            r#"
plugins { java }
apply(plugin = "idea")
dependencies {
    testImplementation("org.seleniumhq.selenium:selenium-java:4.18.1")
}
"#,
        )
        .unwrap();
        assert_eq!(build.plugins, vec!["idea"]);
        assert_eq!(build.dependencies.len(), 1);
        assert_eq!(build.dependencies[0].configuration, "testImplementation");
    }

    #[test]
    fn test_defaults_without_source_sets() {
        let build = BuildFile::parse("apply plugin: 'java'\n").unwrap();
        assert_eq!(build.project_name, None);
        assert_eq!(build.java_roots(), vec!["src/main/java", "src/test/java"]);
        assert_eq!(build.plugins, vec!["java"]);
    }

    #[test]
    fn test_load_takes_name_from_settings() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle"), "apply plugin: 'java'\n").unwrap();
        fs::write(dir.path().join("settings.gradle"), "rootProject.name = 'checkout'\n").unwrap();
        let build = BuildFile::load(dir.path()).unwrap().unwrap();
        assert_eq!(build.project_name.as_deref(), Some("checkout"));
    }

    #[test]
    fn test_load_without_build_file() {
        let dir = TempDir::new().unwrap();
        assert!(BuildFile::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_configure_sets_package_name() {
        let build = BuildFile {
            project_name: Some("Checkout".to_string()),
            ..BuildFile::default()
        };
        assert_eq!(build.configure(TargetProfile::playwright()).project_name, "checkout");
        let unnamed = BuildFile::default().configure(TargetProfile::playwright());
        assert_eq!(unnamed.project_name, TargetProfile::playwright().project_name);
    }
}
