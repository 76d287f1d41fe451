//! Error types for the package database backend.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database directory `{}` is not a directory", .path.display())]
    #[diagnostic(
        code(pkgseek_db::not_a_directory),
        help("Check DBPath in your pacman configuration")
    )]
    NotADirectory { path: PathBuf },

    #[error("Invalid database name `{0}`")]
    #[diagnostic(
        code(pkgseek_db::invalid_name),
        help("Repository names may not be empty or contain '/'")
    )]
    InvalidName(String),

    #[error("libalpm failed to initialize for root `{}` and database `{}`", .root.display(), .db_path.display())]
    #[diagnostic(
        code(pkgseek_db::init),
        help("Check RootDir and DBPath in your pacman configuration")
    )]
    Init {
        root: PathBuf,
        db_path: PathBuf,
        #[source]
        source: alpm::Error,
    },

    #[error("libalpm: {0}")]
    #[diagnostic(code(pkgseek_db::alpm))]
    Alpm(#[from] alpm::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;
