//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use genforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{GenforgeError, GenforgeResult},
};

/// In-memory filesystem.
///
/// Clones share state, so a test can hand one clone to a service and
/// inspect the other. Paths registered with [`fail_on`](Self::fail_on)
/// reject writes and directory creation.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    executables: HashSet<PathBuf>,
    failing: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `path` fail.
    pub fn fail_on(self, path: impl Into<PathBuf>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.into());
        }
        self
    }

    /// Pre-populate a file, creating its parents.
    pub fn seed(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path, content.into());
        }
        self
    }

    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.inner.read().ok()?.files.get(path).cloned()
    }

    pub fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.executables.contains(path))
    }

    /// All files, sorted by path.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn write(&self) -> GenforgeResult<std::sync::RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| GenforgeError::Internal {
            message: "memory filesystem lock poisoned".into(),
        })
    }
}

fn insert_ancestors(dirs: &mut HashSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        dirs.insert(current.clone());
    }
}

fn injected(path: &Path) -> GenforgeError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: "injected failure".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> GenforgeResult<()> {
        let mut inner = self.write()?;
        if inner.failing.contains(path) {
            return Err(injected(path));
        }
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GenforgeResult<()> {
        let mut inner = self.write()?;
        if inner.failing.contains(path) {
            return Err(injected(path));
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !inner.directories.contains(parent)
        {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn set_executable(&self, path: &Path) -> GenforgeResult<()> {
        let mut inner = self.write()?;
        if !inner.files.contains_key(path) {
            return Err(ApplicationError::Filesystem {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into());
        }
        inner.executables.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_contents() {
        let fs = MemoryFilesystem::new();
        let view = fs.clone();
        fs.create_dir_all(Path::new("/p/src")).unwrap();
        fs.write_file(Path::new("/p/src/main.ts"), "x").unwrap();

        assert_eq!(view.read_file(Path::new("/p/src/main.ts")).as_deref(), Some("x"));
        assert!(view.exists(Path::new("/p")));
    }

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/nowhere/a.txt"), "x").is_err());
    }

    #[test]
    fn injected_failures_apply_to_the_exact_path() {
        let fs = MemoryFilesystem::new().fail_on("/p/bad.txt");
        fs.create_dir_all(Path::new("/p")).unwrap();

        assert!(fs.write_file(Path::new("/p/bad.txt"), "x").is_err());
        assert!(fs.write_file(Path::new("/p/good.txt"), "x").is_ok());
    }

    #[test]
    fn seeded_files_exist() {
        let fs = MemoryFilesystem::new().seed("/p/README.md", "keep me");
        assert!(fs.exists(Path::new("/p/README.md")));
        assert!(fs.exists(Path::new("/p")));
    }
}
