use pkgseek_db::{Db, DbHandle, Package as AlpmPackage};
use tracing::{debug, trace};

pub use pkgseek_config::config::{SearchBy, SearchMode};

use crate::{
    error::{SeekError, SeekResult},
    types::{Package, UNKNOWN_POPULARITY},
};

/// Parameters of a package search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub term: String,
    pub mode: SearchMode,
    pub by: SearchBy,
    /// Upper bound on the number of returned packages, across all databases.
    pub max_results: usize,
    /// Search installed packages instead of the sync databases.
    pub local_only: bool,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            mode: SearchMode::default(),
            by: SearchBy::default(),
            max_results: 100,
            local_only: false,
        }
    }

    fn matches(&self, pkg: &AlpmPackage) -> bool {
        if self.mode.matches(pkg.name(), &self.term) {
            return true;
        }
        self.by == SearchBy::NameAndDescription
            && self.mode.matches(pkg.desc().unwrap_or_default(), &self.term)
    }
}

/// Searches the registered sync databases (or only the local one) for matching packages.
///
/// Databases are scanned in registration order and packages in libalpm's cache order (sorted by
/// name). The scan stops as soon as `max_results` packages were collected.
pub fn search_repos(handle: Option<&DbHandle>, query: &SearchQuery) -> SeekResult<Vec<Package>> {
    let handle = handle.ok_or(SeekError::NoHandle)?;
    debug!(
        term = %query.term,
        mode = %query.mode,
        by = %query.by,
        local_only = query.local_only,
        "searching packages"
    );

    let local = handle.local_db();
    let dbs: Vec<&Db> = if query.local_only {
        vec![local]
    } else {
        handle.sync_dbs().iter().collect()
    };

    let mut results = Vec::new();
    if query.max_results == 0 {
        return Ok(results);
    }

    for db in dbs {
        for pkg in db.pkgs().iter() {
            if !query.matches(pkg) {
                continue;
            }

            trace!(db = db.name(), name = pkg.name(), "match");
            results.push(Package {
                name: pkg.name().to_string(),
                source: db.name().to_string(),
                is_installed: local.pkg(pkg.name()).is_ok(),
                last_modified: pkg.build_date(),
                popularity: UNKNOWN_POPULARITY,
            });

            if results.len() >= query.max_results {
                return Ok(results);
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use pkgseek_db::fixture::{write_local, write_sync, FixturePackage, SyncCompression};
    use tempfile::{tempdir, TempDir};

    use super::*;

    fn setup() -> (TempDir, DbHandle) {
        let dir = tempdir().unwrap();
        write_local(
            dir.path(),
            &[
                FixturePackage::new("firefox", "124.0-1"),
                FixturePackage::new("yay", "12.3.5-1").desc("Yet another yogurt"),
            ],
        );
        write_sync(
            dir.path(),
            "core",
            &[
                FixturePackage::new("filesystem", "2024.04.07-1").desc("Base filesystem"),
                FixturePackage::new("bash", "5.2-1").desc("The GNU Bourne Again shell"),
            ],
            SyncCompression::Gzip,
        );
        write_sync(
            dir.path(),
            "extra",
            &[
                FixturePackage::new("firefox", "125.0.1-1").desc("Standalone web browser"),
                FixturePackage::new("fish", "3.7.1-1").desc("Smart and user friendly shell"),
            ],
            SyncCompression::Zstd,
        );

        let mut handle = DbHandle::new(dir.path(), dir.path()).unwrap();
        handle.register_sync_db("core").unwrap();
        handle.register_sync_db("extra").unwrap();
        (dir, handle)
    }

    fn names(results: &[Package]) -> Vec<&str> {
        results.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_no_handle() {
        let err = search_repos(None, &SearchQuery::new("fi")).unwrap_err();
        assert!(matches!(err, SeekError::NoHandle));
    }

    #[test]
    fn test_starts_with_by_name() {
        let (_dir, handle) = setup();
        let results = search_repos(Some(&handle), &SearchQuery::new("fi")).unwrap();

        assert_eq!(names(&results), vec!["filesystem", "firefox", "fish"]);
        assert_eq!(results[0].source, "core");
        assert_eq!(results[1].source, "extra");
        assert!(results[1].is_installed);
        assert!(!results[2].is_installed);
        assert!(results.iter().all(|p| p.popularity == UNKNOWN_POPULARITY));
    }

    #[test]
    fn test_contains_with_description() {
        let (_dir, handle) = setup();
        let query = SearchQuery {
            mode: SearchMode::Contains,
            by: SearchBy::NameAndDescription,
            ..SearchQuery::new("shell")
        };
        let results = search_repos(Some(&handle), &query).unwrap();
        assert_eq!(names(&results), vec!["bash", "fish"]);

        let query = SearchQuery {
            mode: SearchMode::Contains,
            ..SearchQuery::new("shell")
        };
        assert!(search_repos(Some(&handle), &query).unwrap().is_empty());
    }

    #[test]
    fn test_cap_is_global() {
        let (_dir, handle) = setup();
        let query = SearchQuery {
            max_results: 2,
            ..SearchQuery::new("f")
        };
        let results = search_repos(Some(&handle), &query).unwrap();
        assert_eq!(names(&results), vec!["filesystem", "firefox"]);

        let query = SearchQuery {
            max_results: 0,
            ..SearchQuery::new("f")
        };
        assert!(search_repos(Some(&handle), &query).unwrap().is_empty());
    }

    #[test]
    fn test_local_only() {
        let (_dir, handle) = setup();
        let query = SearchQuery {
            mode: SearchMode::Contains,
            by: SearchBy::NameAndDescription,
            local_only: true,
            ..SearchQuery::new("y")
        };
        let results = search_repos(Some(&handle), &query).unwrap();

        assert_eq!(names(&results), vec!["yay"]);
        assert!(results.iter().all(|p| p.source == "local" && p.is_installed));
    }

    #[test]
    fn test_description_keeps_leading_spaces() {
        let dir = tempdir().unwrap();
        write_sync(
            dir.path(),
            "extra",
            &[FixturePackage::new("nano", "8.0-1").desc("  small editor")],
            SyncCompression::Gzip,
        );
        let mut handle = DbHandle::new(dir.path(), dir.path()).unwrap();
        handle.register_sync_db("extra").unwrap();

        let query = SearchQuery {
            by: SearchBy::NameAndDescription,
            ..SearchQuery::new("  small")
        };
        let results = search_repos(Some(&handle), &query).unwrap();
        assert_eq!(names(&results), vec!["nano"]);
    }

    #[test]
    fn test_unsynced_repo_has_no_packages() {
        let (_dir, mut handle) = setup();
        handle.register_sync_db("multilib").unwrap();

        let query = SearchQuery {
            mode: SearchMode::Contains,
            ..SearchQuery::new("")
        };
        let results = search_repos(Some(&handle), &query).unwrap();
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|p| p.source != "multilib"));
    }
}
