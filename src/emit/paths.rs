//! Output paths and relative import specifiers.

use std::path::PathBuf;

use crate::hir::{SourceUnit, UnitKind};

use super::profile::TargetProfile;

/// Where a converted unit is written, relative to the output directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPath {
    dirs: Vec<String>,
    /// File name without extension: `LoginTest.spec`
    stem: String,
    extension: String,
}

impl OutputPath {
    /// `{output_root}/{package dirs}/{Class}{suffix}.{extension}`
    pub fn for_unit(unit: &SourceUnit, profile: &TargetProfile) -> Self {
        let mut dirs: Vec<String> = profile
            .output_root
            .split('/')
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(package) = &unit.package {
            dirs.extend(package.split('.').map(str::to_string));
        }
        let suffix = match unit.kind {
            UnitKind::TestClass | UnitKind::Suite => &profile.suffixes.test,
            UnitKind::PageObject => &profile.suffixes.page_object,
            UnitKind::UtilityModule => &profile.suffixes.utility,
        };
        Self {
            dirs,
            stem: format!("{}{suffix}", unit.simple_name),
            extension: profile.suffixes.extension.clone(),
        }
    }

    pub fn to_path_buf(&self) -> PathBuf {
        let mut path: PathBuf = self.dirs.iter().collect();
        path.push(format!("{}.{}", self.stem, self.extension));
        path
    }

    /// Specifier for importing `self` from a module at `from`
    pub fn import_from(&self, from: &OutputPath, import_extension: &str) -> String {
        let common = self
            .dirs
            .iter()
            .zip(&from.dirs)
            .take_while(|(a, b)| a == b)
            .count();
        let ups = from.dirs.len() - common;
        let mut specifier = if ups == 0 {
            "./".to_string()
        } else {
            "../".repeat(ups)
        };
        for dir in &self.dirs[common..] {
            specifier.push_str(dir);
            specifier.push('/');
        }
        specifier.push_str(&self.stem);
        specifier.push_str(import_extension);
        specifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(dirs: &[&str], stem: &str) -> OutputPath {
        OutputPath {
            dirs: dirs.iter().map(|d| d.to_string()).collect(),
            stem: stem.to_string(),
            extension: "ts".to_string(),
        }
    }

    #[test]
    fn test_to_path_buf() {
        let p = path(&["tests", "com", "example"], "LoginTest.spec");
        assert_eq!(p.to_path_buf(), PathBuf::from("tests/com/example/LoginTest.spec.ts"));
    }

    #[test]
    fn test_import_sibling_package() {
        let test = path(&["tests", "suite"], "LoginSuiteTest.spec");
        let page = path(&["tests", "suite", "pages"], "DashboardPage");
        assert_eq!(page.import_from(&test, ""), "./pages/DashboardPage");
        assert_eq!(test.import_from(&page, ".js"), "../LoginSuiteTest.spec.js");
    }

    #[test]
    fn test_import_across_branches() {
        let test = path(&["tests", "a", "tests"], "T.spec");
        let page = path(&["tests", "a", "pages"], "P");
        assert_eq!(page.import_from(&test, ""), "../pages/P");
    }
}
