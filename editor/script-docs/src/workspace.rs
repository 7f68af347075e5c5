//! Workspace scanning for `package.json` manifests.

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories skipped while scanning; dependency and build output trees.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "dist", "out", "target"];

/// Find every `package.json` under `root`, sorted, skipping `excluded_dirs`.
pub fn find_package_manifests(root: &Path, excluded_dirs: &[String]) -> Vec<PathBuf> {
    let mut manifests: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded(e, excluded_dirs))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == "package.json")
        .map(|e| e.into_path())
        .collect();

    manifests.sort();
    manifests
}

/// The default exclusion list as owned strings.
pub fn default_excluded_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect()
}

fn is_excluded(entry: &DirEntry, excluded_dirs: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded_dirs.iter().any(|d| d == name))
}

/// Path of `path` relative to `root`, `/`-separated.
pub fn relative_manifest_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_finds_nested_manifests() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "package.json");
        touch(temp.path(), "packages/web/package.json");
        touch(temp.path(), "packages/api/package.json");

        let found = find_package_manifests(temp.path(), &default_excluded_dirs());
        let rel: Vec<_> = found
            .iter()
            .map(|p| relative_manifest_path(temp.path(), p).unwrap())
            .collect();

        assert_eq!(
            rel,
            vec![
                "package.json",
                "packages/api/package.json",
                "packages/web/package.json"
            ]
        );
    }

    #[test]
    fn test_skips_node_modules() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "package.json");
        touch(temp.path(), "node_modules/left-pad/package.json");
        touch(temp.path(), "packages/web/node_modules/react/package.json");

        let found = find_package_manifests(temp.path(), &default_excluded_dirs());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_custom_exclusions() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "package.json");
        touch(temp.path(), "fixtures/package.json");

        let found = find_package_manifests(temp.path(), &["fixtures".to_string()]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_ignores_similar_names() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "package.json.bak");
        touch(temp.path(), "package-lock.json");

        assert!(find_package_manifests(temp.path(), &default_excluded_dirs()).is_empty());
    }

    #[test]
    fn test_relative_path_outside_root() {
        assert_eq!(
            relative_manifest_path(Path::new("/a/b"), Path::new("/c/package.json")),
            None
        );
    }

    #[test]
    fn test_relative_path_of_root_itself() {
        assert_eq!(relative_manifest_path(Path::new("/a"), Path::new("/a")), None);
    }
}
