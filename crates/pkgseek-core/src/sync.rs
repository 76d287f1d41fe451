//! Refreshing sync databases into a private directory.
//!
//! `pacman -Sy` needs root to write below the system database path. Instead, the sync
//! databases are downloaded into a per-user directory under fakeroot, with `local` linked to
//! the real local database so installed packages stay visible.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use pkgseek_config::pacman::{PacmanConf, DEFAULT_CONFIG_PATH};
use pkgseek_db::{DbHandle, LOCAL_DB_NAME};
use pkgseek_utils::{
    fs::{ensure_dir_exists, ensure_symlink},
    system::{checkup_db_dir, current_uid},
};
use tracing::debug;

use crate::{
    error::{SeekError, SeekResult},
    handle::open_handle,
};

pub const DEFAULT_HELPER: &str = "/usr/bin/fakeroot";
pub const DEFAULT_PACMAN: &str = "pacman";

/// Builds a temporary copy of the sync databases.
#[derive(Debug, Clone)]
pub struct TempSync {
    dir: PathBuf,
    helper: PathBuf,
    pacman: PathBuf,
}

impl TempSync {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            helper: PathBuf::from(DEFAULT_HELPER),
            pacman: PathBuf::from(DEFAULT_PACMAN),
        }
    }

    /// Uses `$TMPDIR/checkup-db-<uid>`, the directory `checkupdates` uses.
    pub fn for_current_user() -> Self {
        Self::new(checkup_db_dir(current_uid()))
    }

    /// Replaces the privilege-faking helper.
    pub fn with_helper(mut self, helper: impl Into<PathBuf>) -> Self {
        self.helper = helper.into();
        self
    }

    /// Replaces the pacman binary run by the helper.
    pub fn with_pacman(mut self, pacman: impl Into<PathBuf>) -> Self {
        self.pacman = pacman.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Syncs the repositories of `config_path` into the temporary directory and opens a handle
    /// on the result.
    ///
    /// The `local` link is only created when missing; an existing entry is left untouched.
    pub fn sync<T: AsRef<str>>(&self, config_path: impl AsRef<Path>, repos: &[T]) -> SeekResult<DbHandle> {
        let config_path = config_path.as_ref();

        if !self.helper.exists() {
            return Err(SeekError::MissingDependency {
                name: self
                    .helper
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: self.helper.clone(),
            });
        }

        let conf = PacmanConf::from_file(config_path)?;

        ensure_dir_exists(&self.dir)?;
        let link = self.dir.join(LOCAL_DB_NAME);
        if ensure_symlink(conf.local_db_path(), &link)? {
            debug!(link = %link.display(), target = %conf.local_db_path().display(), "linked local database");
        }

        self.run_sync(config_path)?;

        open_handle(&conf.root_dir, &self.dir, config_path, repos)
    }

    /// `<helper> -- <pacman> -Sy --dbpath=<dir>`, plus `--config` for a non-default config.
    fn sync_command(&self, config_path: &Path) -> Command {
        let mut cmd = Command::new(&self.helper);
        cmd.arg("--")
            .arg(&self.pacman)
            .arg("-Sy")
            .arg(format!("--dbpath={}", self.dir.display()));
        if config_path != Path::new(DEFAULT_CONFIG_PATH) {
            cmd.arg(format!("--config={}", config_path.display()));
        }
        cmd
    }

    fn run_sync(&self, config_path: &Path) -> SeekResult<()> {
        let mut cmd = self.sync_command(config_path);
        debug!(dir = %self.dir.display(), command = ?cmd, "syncing temporary database");

        let output = cmd.output().map_err(|err| {
            SeekError::SyncExec {
                reason: format!("failed to run `{}`: {err}", self.helper.display()),
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SeekError::SyncExec {
                reason: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(())
    }
}
