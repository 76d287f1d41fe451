use std::{
    fmt,
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
};

use alpm::{Alpm, AlpmList, Db, SigLevel};
use tracing::debug;

use crate::error::{DbError, Result};

/// Name libalpm gives the database of installed packages.
pub const LOCAL_DB_NAME: &str = "local";

/// An open view of a pacman database directory.
///
/// The handle owns the libalpm handle and with it the local database and every sync database
/// registered on it. Dropping it (or calling [`DbHandle::close`]) releases all loaded package
/// caches.
pub struct DbHandle {
    root: PathBuf,
    db_path: PathBuf,
    alpm: Alpm,
}

impl DbHandle {
    /// Opens the database at `db_path` for the system rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NotADirectory`] if `db_path` is not an existing directory and
    /// [`DbError::Init`] if libalpm rejects the paths (a missing root, for one).
    pub fn new(root: impl AsRef<Path>, db_path: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let db_path = db_path.as_ref();

        // libalpm would accept a missing database path and report no packages at all
        if !db_path.is_dir() {
            return Err(DbError::NotADirectory {
                path: db_path.to_path_buf(),
            });
        }

        let alpm = Alpm::new(
            root.as_os_str().as_bytes().to_vec(),
            db_path.as_os_str().as_bytes().to_vec(),
        )
        .map_err(|source| {
            DbError::Init {
                root: root.to_path_buf(),
                db_path: db_path.to_path_buf(),
                source,
            }
        })?;

        debug!(root = %root.display(), db_path = %db_path.display(), "opened database handle");

        Ok(Self {
            root: root.to_path_buf(),
            db_path: db_path.to_path_buf(),
            alpm,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Registers the sync database `name` without signature checks. Databases are consulted
    /// in registration order.
    ///
    /// libalpm refuses `local` and names that are already registered.
    pub fn register_sync_db(&mut self, name: &str) -> Result<&Db> {
        if name.is_empty() || name.contains('/') {
            return Err(DbError::InvalidName(name.to_string()));
        }

        debug!(repo = name, "registering sync database");
        Ok(self.alpm.register_syncdb(name, SigLevel::NONE)?)
    }

    pub fn local_db(&self) -> &Db {
        self.alpm.localdb()
    }

    pub fn sync_dbs(&self) -> AlpmList<'_, &Db> {
        self.alpm.syncdbs()
    }

    /// Releases the handle and every database registered on it.
    pub fn close(self) {
        debug!(
            db_path = %self.db_path.display(),
            sync_dbs = self.alpm.syncdbs().len(),
            "closing database handle"
        );
    }
}

impl fmt::Debug for DbHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbHandle")
            .field("root", &self.root)
            .field("db_path", &self.db_path)
            .field(
                "sync_dbs",
                &self.alpm.syncdbs().iter().map(|db| db.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;
    use crate::fixture::{write_local, write_sync, FixturePackage, SyncCompression};
    use tempfile::tempdir;

    #[test]
    fn test_new_checks_paths() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        assert!(matches!(
            DbHandle::new(dir.path(), &missing),
            Err(DbError::NotADirectory { .. })
        ));
        assert!(matches!(
            DbHandle::new(&missing, dir.path()),
            Err(DbError::Init { .. })
        ));
        assert!(DbHandle::new(dir.path(), dir.path()).is_ok());
    }

    #[test]
    fn test_register_sync_db_order_and_errors() {
        let dir = tempdir().unwrap();
        let mut handle = DbHandle::new(dir.path(), dir.path()).unwrap();

        assert_eq!(handle.register_sync_db("core").unwrap().name(), "core");
        handle.register_sync_db("extra").unwrap();

        assert!(matches!(
            handle.register_sync_db("core"),
            Err(DbError::Alpm(_))
        ));
        assert!(matches!(
            handle.register_sync_db("local"),
            Err(DbError::Alpm(_))
        ));
        assert!(matches!(
            handle.register_sync_db(""),
            Err(DbError::InvalidName(_))
        ));

        let names: Vec<_> = handle.sync_dbs().iter().map(|db| db.name()).collect();
        assert_eq!(names, vec!["core", "extra"]);
        handle.close();
    }

    #[test]
    fn test_missing_databases_are_empty() {
        let dir = tempdir().unwrap();
        let mut handle = DbHandle::new(dir.path(), dir.path()).unwrap();
        handle.register_sync_db("core").unwrap();

        assert!(handle.local_db().pkgs().is_empty());
        assert!(handle.sync_dbs().iter().all(|db| db.pkgs().is_empty()));
    }

    #[test]
    fn test_reads_fixture_databases() {
        let dir = tempdir().unwrap();
        write_local(
            dir.path(),
            &[
                FixturePackage::new("zsh", "5.9-5"),
                FixturePackage::new("bash", "5.2.026-2").desc("  The GNU Bourne Again shell"),
            ],
        );
        for (repo, compression) in [
            ("plain", SyncCompression::None),
            ("gz", SyncCompression::Gzip),
            ("zst", SyncCompression::Zstd),
        ] {
            write_sync(
                dir.path(),
                repo,
                &[FixturePackage::new(&format!("{repo}-pkg"), "1.0-1").split_depends()],
                compression,
            );
        }

        let mut handle = DbHandle::new(dir.path(), dir.path()).unwrap();
        for repo in ["plain", "gz", "zst"] {
            handle.register_sync_db(repo).unwrap();
        }

        let local: Vec<_> = handle.local_db().pkgs().iter().map(|p| p.name()).collect();
        assert_eq!(local, vec!["bash", "zsh"]);

        let bash = handle.local_db().pkg("bash").unwrap();
        assert_eq!(bash.version().as_str(), "5.2.026-2");
        assert_eq!(bash.desc(), Some("  The GNU Bourne Again shell"));

        for db in handle.sync_dbs().iter() {
            let pkg = db.pkg(format!("{}-pkg", db.name())).unwrap();
            assert_eq!(pkg.version().as_str(), "1.0-1");
        }
    }

    #[test]
    fn test_required_by_follows_db_origin() {
        let dir = tempdir().unwrap();
        write_local(
            dir.path(),
            &[
                FixturePackage::new("bash", "5.2-1").provides(&["sh"]),
                FixturePackage::new("pacman", "6.1-1").depends(&["bash"]),
                FixturePackage::new("zsh", "5.9-1"),
            ],
        );
        write_sync(
            dir.path(),
            "core",
            &[
                FixturePackage::new("glibc", "2.39-1"),
                FixturePackage::new("bash", "5.2-1").depends(&["glibc"]),
            ],
            SyncCompression::Gzip,
        );
        write_sync(
            dir.path(),
            "extra",
            &[FixturePackage::new("firefox", "125-1").depends(&["glibc>=2.38"])],
            SyncCompression::Zstd,
        );

        let mut handle = DbHandle::new(dir.path(), dir.path()).unwrap();
        handle.register_sync_db("core").unwrap();
        handle.register_sync_db("extra").unwrap();

        let local_bash = handle.local_db().pkg("bash").unwrap();
        let required: Vec<String> = local_bash.required_by().into_iter().collect();
        assert_eq!(required, vec!["pacman"]);

        let glibc = handle.sync_dbs().iter().next().unwrap().pkg("glibc").unwrap();
        let mut required: Vec<String> = glibc.required_by().into_iter().collect();
        required.sort();
        assert_eq!(required, vec!["bash", "firefox"]);

        let zsh = handle.local_db().pkg("zsh").unwrap();
        let required: Vec<String> = zsh.required_by().into_iter().collect();
        assert!(required.is_empty());
    }

    #[test]
    fn test_vercmp() {
        assert_eq!(alpm::vercmp("1.5.a", "1.5"), Ordering::Greater);
        assert_eq!(alpm::vercmp("2.0a", "2.0.a"), Ordering::Less);
        assert_eq!(alpm::vercmp("1:1.0-1", "2.0-1"), Ordering::Greater);
        assert_eq!(alpm::vercmp("1.0-2", "1.0-1"), Ordering::Greater);
        assert_eq!(alpm::vercmp("1.0", "1.0"), Ordering::Equal);
    }
}
