use std::path::PathBuf;

use miette::Diagnostic;
use pkgseek_utils::error::PathError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Failed to read `{}`: {source}", .path.display())]
    #[diagnostic(
        code(pkgseek_config::io),
        help("Check that the file exists and is readable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", .path.display())]
    #[diagnostic(
        code(pkgseek_config::syntax),
        help("pacman.conf expects `[section]` headers followed by `Key = Value` lines")
    )]
    Syntax {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Reserved repository name 'local' cannot be used")]
    #[diagnostic(
        code(pkgseek_config::reserved_repo_name),
        help("'local' always names the database of installed packages")
    )]
    ReservedRepositoryName,

    #[error("Include nesting too deep at `{}`", .path.display())]
    #[diagnostic(
        code(pkgseek_config::include_depth),
        help("Check for Include directives that include each other")
    )]
    IncludeDepth { path: PathBuf },

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(pkgseek_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error(transparent)]
    #[diagnostic(code(pkgseek_config::path))]
    Path(#[from] PathError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
