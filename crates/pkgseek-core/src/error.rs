//! Error types for pkgseek-core.

use std::path::PathBuf;

use miette::Diagnostic;
use pkgseek_config::error::ConfigError;
use pkgseek_db::DbError;
use pkgseek_utils::error::FileSystemError;
use thiserror::Error;

/// Errors returned by the package lookup operations.
#[derive(Error, Diagnostic, Debug)]
pub enum SeekError {
    #[error("Failed to initialize package database")]
    #[diagnostic(
        code(pkgseek::init),
        help("Check that the root and database paths exist and are readable")
    )]
    Init(#[source] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to register repository `{repo}`")]
    #[diagnostic(
        code(pkgseek::register),
        help("Check the repository sections of your pacman configuration")
    )]
    Register {
        repo: String,
        #[source]
        source: DbError,
    },

    #[error("No database handle available")]
    #[diagnostic(
        code(pkgseek::no_handle),
        help("Open a database handle before running lookups")
    )]
    NoHandle,

    #[error("Failed to read package database")]
    #[diagnostic(
        code(pkgseek::backend),
        help("The database may be corrupt. Try syncing it again")
    )]
    Backend(#[from] DbError),

    #[error("Required program `{name}` not found at `{}`", .path.display())]
    #[diagnostic(
        code(pkgseek::missing_dependency),
        help("Install fakeroot to refresh repository databases without root")
    )]
    MissingDependency { name: String, path: PathBuf },

    #[error("Failed to sync temporary database: {reason}")]
    #[diagnostic(
        code(pkgseek::sync),
        help("Check your network connection and mirror list")
    )]
    SyncExec { reason: String },

    #[error(transparent)]
    #[diagnostic(code(pkgseek::fs), help("Check permissions of the temporary directory"))]
    FileSystem(#[from] FileSystemError),
}

pub type SeekResult<T> = std::result::Result<T, SeekError>;
