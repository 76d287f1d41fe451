use std::{error::Error, fmt, path::PathBuf};

#[derive(Debug)]
pub enum PathError {
    Empty,

    MissingEnvVar { var: String, input: String },

    UnclosedVariable { input: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "Path is empty"),
            PathError::UnclosedVariable { input } => {
                write!(f, "Unclosed variable expression starting at `{input}`")
            }
            PathError::MissingEnvVar { var, input } => {
                write!(f, "Environment variable `{var}` not set in `{input}`")
            }
        }
    }
}

impl Error for PathError {}

#[derive(Debug)]
pub enum FileSystemError {
    Directory {
        path: PathBuf,
        action: &'static str,
        source: std::io::Error,
    },

    NotADirectory {
        path: PathBuf,
    },

    Symlink {
        from: PathBuf,
        target: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::Directory {
                path,
                action,
                source,
            } => {
                write!(
                    f,
                    "Failed to {action} directory `{}`: {source}",
                    path.display()
                )
            }
            FileSystemError::NotADirectory { path } => {
                write!(f, "`{}` is not a directory", path.display())
            }
            FileSystemError::Symlink {
                from,
                target,
                source,
            } => {
                write!(
                    f,
                    "Failed to link `{}` to `{}`: {source}",
                    from.display(),
                    target.display()
                )
            }
        }
    }
}

impl Error for FileSystemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FileSystemError::Directory { source, .. } => Some(source),
            FileSystemError::Symlink { source, .. } => Some(source),
            FileSystemError::NotADirectory { .. } => None,
        }
    }
}

pub type FileSystemResult<T> = std::result::Result<T, FileSystemError>;
pub type PathResult<T> = std::result::Result<T, PathError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_path_error_display() {
        assert_eq!(PathError::Empty.to_string(), "Path is empty");

        let error = PathError::MissingEnvVar {
            var: "PKGSEEK_X".to_string(),
            input: "$PKGSEEK_X/db".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Environment variable `PKGSEEK_X` not set in `$PKGSEEK_X/db`"
        );
    }

    #[test]
    fn test_symlink_error_display_and_source() {
        let error = FileSystemError::Symlink {
            from: PathBuf::from("/tmp/checkup-db-1000/local"),
            target: PathBuf::from("/var/lib/pacman/local"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to link `/tmp/checkup-db-1000/local` to `/var/lib/pacman/local`: denied"
        );
        assert!(error.source().is_some());
    }

    #[test]
    fn test_not_a_directory_has_no_source() {
        let error = FileSystemError::NotADirectory {
            path: PathBuf::from("/etc/pacman.conf"),
        };
        assert_eq!(error.to_string(), "`/etc/pacman.conf` is not a directory");
        assert!(error.source().is_none());
    }
}
