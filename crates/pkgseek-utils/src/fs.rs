use std::{fs, os::unix, path::Path};

use crate::error::{FileSystemError, FileSystemResult};

pub trait FileSystemProvider {
    /// Creates a directory structure if it doesn't exist.
    ///
    /// If the directory already exists, this function does nothing. If the path exists but is
    /// not a directory, this function returns an error.
    ///
    /// # Errors
    ///
    /// * [`FileSystemError::Directory`] if the directory could not be created.
    /// * [`FileSystemError::NotADirectory`] if the path exists but is not a directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pkgseek_utils::error::FileSystemResult;
    /// use pkgseek_utils::fs::{FileSystemProvider, StandardFileSystemProvider};
    ///
    /// fn main() -> FileSystemResult<()> {
    ///     let fs = StandardFileSystemProvider;
    ///     fs.ensure_dir_exists("/tmp/checkup-db-1000")?;
    ///     Ok(())
    /// }
    /// ```
    fn ensure_dir_exists<P: AsRef<Path>>(&self, path: P) -> FileSystemResult<()>;

    /// Creates a symlink at `link` pointing to `target` unless something already occupies `link`.
    ///
    /// An existing entry is never replaced, even when it is a dangling symlink or points
    /// somewhere else. Returns `true` when a new link was created.
    ///
    /// # Errors
    ///
    /// * [`FileSystemError::Symlink`] if the link could not be created.
    fn ensure_symlink<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        target: P,
        link: Q,
    ) -> FileSystemResult<bool>;
}

#[derive(Default, Clone)]
pub struct StandardFileSystemProvider;

impl FileSystemProvider for StandardFileSystemProvider {
    fn ensure_dir_exists<P: AsRef<Path>>(&self, path: P) -> FileSystemResult<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).map_err(|err| {
                FileSystemError::Directory {
                    path: path.to_path_buf(),
                    action: "create",
                    source: err,
                }
            })?;
        } else if !path.is_dir() {
            return Err(FileSystemError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        Ok(())
    }

    fn ensure_symlink<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        target: P,
        link: Q,
    ) -> FileSystemResult<bool> {
        let (target, link) = (target.as_ref(), link.as_ref());

        // lstat: a dangling link still counts as present
        if fs::symlink_metadata(link).is_ok() {
            return Ok(false);
        }

        unix::fs::symlink(target, link).map_err(|err| {
            FileSystemError::Symlink {
                from: link.to_path_buf(),
                target: target.to_path_buf(),
                source: err,
            }
        })?;

        Ok(true)
    }
}

/// Creates a directory structure if it doesn't exist.
///
/// See [`FileSystemProvider::ensure_dir_exists`] for detailed documentation.
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    StandardFileSystemProvider.ensure_dir_exists(path)
}

/// Creates `link -> target` if `link` does not exist yet.
///
/// See [`FileSystemProvider::ensure_symlink`] for detailed documentation.
pub fn ensure_symlink<P: AsRef<Path>, Q: AsRef<Path>>(target: P, link: Q) -> FileSystemResult<bool> {
    StandardFileSystemProvider.ensure_symlink(target, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists() {
        let dir = tempdir().unwrap();
        let new_dir = dir.path().join("checkup-db-1000");
        ensure_dir_exists(&new_dir).unwrap();
        assert!(new_dir.is_dir());
    }

    #[test]
    fn test_ensure_dir_exists_already_exists() {
        let dir = tempdir().unwrap();
        ensure_dir_exists(dir.path()).unwrap();
        ensure_dir_exists(dir.path()).unwrap();
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_ensure_dir_exists_file_collision() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("file.txt");
        fs::write(&file_path, "hello").unwrap();
        assert!(matches!(
            ensure_dir_exists(&file_path),
            Err(FileSystemError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_ensure_symlink_creates_once() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("real-local");
        fs::create_dir(&target).unwrap();
        let link = dir.path().join("local");

        assert!(ensure_symlink(&target, &link).unwrap());
        assert_eq!(fs::read_link(&link).unwrap(), target);
        assert!(!ensure_symlink(&target, &link).unwrap());
    }

    #[test]
    fn test_ensure_symlink_keeps_existing_link() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        let link = dir.path().join("local");

        ensure_symlink(&first, &link).unwrap();
        assert!(!ensure_symlink(&second, &link).unwrap());
        assert_eq!(fs::read_link(&link).unwrap(), first);
    }

    #[test]
    fn test_ensure_symlink_keeps_dangling_link() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("moved-away");
        let link = dir.path().join("local");

        assert!(ensure_symlink(&missing, &link).unwrap());
        assert!(!link.exists());
        assert!(!ensure_symlink(dir.path(), &link).unwrap());
        assert_eq!(fs::read_link(&link).unwrap(), missing);
    }

    #[test]
    fn test_ensure_symlink_missing_parent() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("no-such-dir").join("local");
        assert!(matches!(
            ensure_symlink(dir.path(), &link),
            Err(FileSystemError::Symlink { .. })
        ));
    }
}
