//! Target file discovery under the console build output.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Path from the console root to the bundle directory.
pub const JS_DIR: &[&str] = &["web-app", "build", "static", "js"];

pub const TARGET_EXTENSION: &str = "js";

/// Source-map files are never patched.
pub const MAP_SUFFIX: &str = ".map";

/// Files to patch, in the order they will be patched.
#[derive(Debug, Clone, Serialize)]
pub struct TargetFiles {
    pub root: PathBuf,
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

impl TargetFiles {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

pub fn target_dir(root: &Path) -> PathBuf {
    JS_DIR.iter().fold(root.to_path_buf(), |dir, part| dir.join(part))
}

/// Find every `*.js` bundle (minus `*.map`) below `root`'s build output,
/// sorted lexicographically.
pub fn discover(root: &Path) -> Result<TargetFiles> {
    let directory = target_dir(root);
    if !directory.is_dir() {
        return Err(Error::target_directory_not_found(
            directory.display().to_string(),
        ));
    }

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&directory.to_string_lossy()),
        TARGET_EXTENSION
    );

    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };

    let entries = glob::glob_with(&pattern, options)
        .map_err(|e| {
            Error::validation_invalid_argument(
                "root",
                format!("Invalid glob pattern '{}': {}", pattern, e),
            )
        })?
        .map(|entry| {
            entry.map_err(|e| {
                Error::internal_io(
                    e.error().to_string(),
                    Some(format!("read {}", e.path().display())),
                )
            })
        })
        .collect::<Result<Vec<PathBuf>>>()?;

    let mut files: Vec<PathBuf> = entries
        .into_iter()
        .filter(|p| p.is_file())
        .filter(|p| !p.to_string_lossy().ends_with(MAP_SUFFIX))
        .collect();

    files.sort();

    if files.is_empty() {
        return Err(Error::target_no_files(
            directory.display().to_string(),
            pattern,
        ));
    }

    Ok(TargetFiles {
        root: root.to_path_buf(),
        directory,
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn console_root() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let js = target_dir(dir.path());
        fs::create_dir_all(&js).unwrap();
        (dir, js)
    }

    #[test]
    fn missing_directory_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = discover(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "target.directory_not_found");
        assert!(err.message.contains("static"));
    }

    #[test]
    fn empty_directory_is_reported() {
        let (dir, js) = console_root();
        fs::write(js.join("main.js.map"), "{}").unwrap();
        fs::write(js.join("notes.txt"), "MinIO").unwrap();

        let err = discover(dir.path()).unwrap_err();
        assert_eq!(err.code.as_str(), "target.no_files");
    }

    #[test]
    fn files_are_sorted_and_filtered() {
        let (dir, js) = console_root();
        fs::write(js.join("main.9f1c.js"), "").unwrap();
        fs::write(js.join("453.a1b2.chunk.js"), "").unwrap();
        fs::write(js.join("main.9f1c.js.map"), "").unwrap();
        fs::write(js.join("main.9f1c.js.LICENSE.txt"), "").unwrap();
        fs::write(js.join(".hidden.js"), "").unwrap();
        fs::create_dir(js.join("nested.js")).unwrap();

        let targets = discover(dir.path()).unwrap();
        let names: Vec<String> = targets
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["453.a1b2.chunk.js", "main.9f1c.js"]);
        assert_eq!(targets.directory, js);
    }

    #[test]
    fn root_with_glob_metacharacters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("console[v1]");
        let js = target_dir(&root);
        fs::create_dir_all(&js).unwrap();
        fs::write(js.join("app.js"), "").unwrap();

        let targets = discover(&root).unwrap();
        assert_eq!(targets.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_an_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, js) = console_root();
        fs::write(js.join("app.js"), "").unwrap();
        fs::set_permissions(&js, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory
        let listable = fs::read_dir(&js).is_ok();
        let result = discover(dir.path());
        fs::set_permissions(&js, fs::Permissions::from_mode(0o755)).unwrap();

        if listable {
            return;
        }
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.message.contains("static"));
    }
}
