//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use genrig_core::{
    application::{ApplicationError, ports::Filesystem},
    error::GenrigResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle after boxing one
/// into a harness.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    executables: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file (and its parent directories).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                inner.add_dirs(parent);
            }
            inner.files.insert(path.to_path_buf(), content.to_owned());
        }
        self
    }

    /// Seed a file with the executable bit set.
    pub fn with_executable(self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = path.as_ref().to_path_buf();
        let this = self.with_file(&path, content);
        if let Ok(mut inner) = this.inner.write() {
            inner.executables.insert(path);
        }
        this
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<_> = self
            .inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default();
        files.sort();
        files
    }

    /// Everything directly or indirectly below `dir`, sorted.
    pub fn entries_under(&self, dir: &Path) -> Vec<PathBuf> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let mut entries: Vec<_> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.starts_with(dir) && p.as_path() != dir)
            .cloned()
            .collect();
        entries.sort();
        entries
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(path: &Path, reason: &str) -> genrig_core::error::GenrigError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> GenrigResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        inner.add_dirs(path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> GenrigResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.executables.retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GenrigResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        let content = inner
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| missing(from, "No such file"))?;
        if let Some(parent) = to.parent() {
            inner.add_dirs(parent);
        }
        inner.files.insert(to.to_path_buf(), content);
        if inner.executables.contains(from) {
            inner.executables.insert(to.to_path_buf());
        }
        Ok(())
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> GenrigResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        if !inner.directories.contains(from) {
            return Err(missing(from, "No such directory"));
        }

        let rebase = |p: &Path| p.strip_prefix(from).ok().map(|rel| to.join(rel));

        let dirs: Vec<_> = inner
            .directories
            .iter()
            .filter_map(|p| rebase(p))
            .collect();
        let files: Vec<_> = inner
            .files
            .iter()
            .filter_map(|(p, content)| {
                rebase(p).map(|dest| (dest, content.clone(), inner.executables.contains(p)))
            })
            .collect();

        inner.add_dirs(to);
        for dir in dirs {
            inner.directories.insert(dir);
        }
        for (dest, content, executable) in files {
            if executable {
                inner.executables.insert(dest.clone());
            }
            inner.files.insert(dest, content);
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GenrigResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(missing(path, "Parent directory does not exist"));
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> GenrigResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| missing(path, "No such file"))
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_executable(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) && inner.executables.contains(path))
            .unwrap_or(false)
    }

    fn set_executable(&self, path: &Path, executable: bool) -> GenrigResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        if !inner.files.contains_key(path) {
            return Err(missing(path, "No such file"));
        }
        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/a/b.txt"), "x").is_err());
        fs.create_dir_all(Path::new("/a")).unwrap();
        fs.write_file(Path::new("/a/b.txt"), "x").unwrap();
        assert_eq!(fs.read_file(Path::new("/a/b.txt")).as_deref(), Some("x"));
    }

    #[test]
    fn remove_dir_all_is_idempotent() {
        let fs = MemoryFilesystem::new().with_file("/root/a.txt", "a");
        fs.remove_dir_all(Path::new("/root")).unwrap();
        fs.remove_dir_all(Path::new("/root")).unwrap();
        assert!(!fs.exists(Path::new("/root/a.txt")));
        assert!(!fs.exists(Path::new("/root")));
    }

    #[test]
    fn copy_dir_rebases_tree_and_exec_bits() {
        let fs = MemoryFilesystem::new()
            .with_file("/fx/releases/redis/jobs/redis/spec", "templates: {}")
            .with_executable("/fx/releases/redis/jobs/redis/templates/redis_ctl", "#!");
        fs.copy_dir(Path::new("/fx/releases/redis"), Path::new("/tmp/redis"))
            .unwrap();

        assert_eq!(
            fs.read_file(Path::new("/tmp/redis/jobs/redis/spec")).as_deref(),
            Some("templates: {}")
        );
        assert!(fs.is_executable(Path::new("/tmp/redis/jobs/redis/templates/redis_ctl")));
        assert!(fs.exists(Path::new("/tmp/redis/jobs")));
    }

    #[test]
    fn copy_dir_of_missing_source_fails() {
        let fs = MemoryFilesystem::new();
        assert!(fs.copy_dir(Path::new("/nope"), Path::new("/dest")).is_err());
    }

    #[test]
    fn entries_under_excludes_dir_itself() {
        let fs = MemoryFilesystem::new().with_file("/home/.bosh_config", "x");
        assert_eq!(
            fs.entries_under(Path::new("/home")),
            vec![PathBuf::from("/home/.bosh_config")]
        );
    }
}
