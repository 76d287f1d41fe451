use std::path::Path;

use pkgseek_config::pacman::PacmanConf;
use pkgseek_db::DbHandle;
use tracing::{debug, trace};

use crate::error::{SeekError, SeekResult};

/// Opens the database at `db_path` and registers the repositories of the pacman configuration
/// at `config_path`.
///
/// Only repositories named in `repos` are registered; an empty filter registers all of them.
/// Nothing is returned if a single registration fails.
pub fn open_handle<T: AsRef<str>>(
    root: impl AsRef<Path>,
    db_path: impl AsRef<Path>,
    config_path: impl AsRef<Path>,
    repos: &[T],
) -> SeekResult<DbHandle> {
    let mut handle = DbHandle::new(root, db_path).map_err(SeekError::Init)?;
    let conf = PacmanConf::from_file(config_path)?;

    for repo in conf.repos.iter().filter(|repo| repo.is_selected(repos)) {
        trace!(repo = %repo.name, order = repo.order, "registering repository");
        handle.register_sync_db(&repo.name).map_err(|err| {
            SeekError::Register {
                repo: repo.name.clone(),
                source: err,
            }
        })?;
    }

    debug!(
        db_path = %handle.db_path().display(),
        repos = handle.sync_dbs().len(),
        "database handle ready"
    );
    Ok(handle)
}
