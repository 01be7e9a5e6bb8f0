//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

use genrig_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{GenrigError, GenrigResult},
};

/// Real-disk filesystem.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> GenrigResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn remove_dir_all(&self, path: &Path) -> GenrigResult<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io_error(path, e, "remove directory")),
        }
    }

    fn copy_file(&self, from: &Path, to: &Path) -> GenrigResult<()> {
        if let Some(parent) = to.parent() {
            self.create_dir_all(parent)?;
        }
        // fs::copy carries the permission bits over.
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> GenrigResult<()> {
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                GenrigError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk directory: {e}"),
                })
            })?;

            let relative = entry.path().strip_prefix(from).map_err(|_| GenrigError::Internal {
                message: format!("{} escaped {}", entry.path().display(), from.display()),
            })?;
            let dest = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                self.create_dir_all(&dest)?;
            } else if file_type.is_symlink() {
                copy_symlink(entry.path(), &dest)?;
            } else {
                fs::copy(entry.path(), &dest).map_err(|e| map_io_error(entry.path(), e, "copy file"))?;
            }
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> GenrigResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> GenrigResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_executable(&self, path: &Path) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::metadata(path)
                .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false)
        }
        #[cfg(not(unix))]
        {
            path.is_file()
        }
    }

    fn set_executable(&self, path: &Path, executable: bool) -> GenrigResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            let mode = perms.mode();
            perms.set_mode(if executable { mode | 0o111 } else { mode & !0o111 });
            fs::set_permissions(path, perms).map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, executable);
        }
        Ok(())
    }
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> GenrigResult<()> {
    let target = fs::read_link(from).map_err(|e| map_io_error(from, e, "read link"))?;
    std::os::unix::fs::symlink(&target, to).map_err(|e| map_io_error(to, e, "create link"))
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> GenrigResult<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| map_io_error(from, e, "copy file"))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> GenrigError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn remove_missing_dir_is_ok() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        assert!(fs.remove_dir_all(&temp.path().join("never-created")).is_ok());
    }

    #[test]
    fn copy_dir_copies_nested_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("jobs/redis/templates")).unwrap();
        std::fs::write(src.join("jobs/redis/spec"), "templates: {}\n").unwrap();
        std::fs::create_dir_all(src.join("packages")).unwrap();

        let dest = temp.path().join("dest");
        let fs = LocalFilesystem::new();
        fs.copy_dir(&src, &dest).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.join("jobs/redis/spec")).unwrap(),
            "templates: {}\n"
        );
        assert!(dest.join("jobs/redis/templates").is_dir());
        assert!(dest.join("packages").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_round_trip() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("ctl");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        let fs = LocalFilesystem::new();
        assert!(!fs.is_executable(&script));
        fs.set_executable(&script, true).unwrap();
        assert!(fs.is_executable(&script));
        fs.set_executable(&script, false).unwrap();
        assert!(!fs.is_executable(&script));
    }

    #[cfg(unix)]
    #[test]
    fn copy_dir_keeps_executable_bit() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("ctl"), "#!/bin/sh\n").unwrap();
        let fs = LocalFilesystem::new();
        fs.set_executable(&src.join("ctl"), true).unwrap();

        fs.copy_dir(&src, &temp.path().join("dest")).unwrap();
        assert!(fs.is_executable(&temp.path().join("dest/ctl")));
    }

    #[test]
    fn directories_are_not_executable_files() {
        let temp = TempDir::new().unwrap();
        assert!(!LocalFilesystem::new().is_executable(temp.path()));
    }

    #[test]
    fn read_missing_file_is_filesystem_error() {
        let temp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_to_string(&temp.path().join("nope"))
            .unwrap_err();
        assert!(matches!(
            err,
            GenrigError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
