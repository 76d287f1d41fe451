use std::cmp::Ordering;

use pkgseek_db::{vercmp, Db, DbHandle, Package, LOCAL_DB_NAME};
use tracing::{debug, trace};

use crate::types::Upgrade;

/// Compares every installed package against the sync databases.
///
/// The first sync database that carries a package decides, and an [`Upgrade`] is reported when
/// its version is newer. Installed packages found in no sync database are reported with source
/// `local` and also returned in the second list.
///
/// Upgrade checks are advisory: without a handle both lists are empty.
pub fn compute_upgrades(handle: Option<&DbHandle>) -> (Vec<Upgrade>, Vec<String>) {
    let Some(handle) = handle else {
        debug!("no database handle, skipping upgrade check");
        return (Vec::new(), Vec::new());
    };

    let mut upgrades = Vec::new();
    let mut not_found = Vec::new();

    for installed in handle.local_db().pkgs().iter() {
        let local_version = installed.version().as_str();
        match find_candidate(handle, installed.name()) {
            Some((repo, candidate)) => {
                let version = candidate.version().as_str();
                if vercmp(version, local_version) == Ordering::Greater {
                    trace!(
                        name = installed.name(),
                        from = local_version,
                        to = version,
                        repo = repo.name(),
                        "upgrade available"
                    );
                    upgrades.push(Upgrade {
                        name: installed.name().to_string(),
                        version: version.to_string(),
                        local_version: local_version.to_string(),
                        source: repo.name().to_string(),
                    });
                }
            }
            None => {
                upgrades.push(Upgrade {
                    name: installed.name().to_string(),
                    version: String::new(),
                    local_version: local_version.to_string(),
                    source: LOCAL_DB_NAME.to_string(),
                });
                not_found.push(installed.name().to_string());
            }
        }
    }

    debug!(
        upgrades = upgrades.len() - not_found.len(),
        foreign = not_found.len(),
        "upgrade check finished"
    );
    (upgrades, not_found)
}

fn find_candidate<'a>(handle: &'a DbHandle, name: &str) -> Option<(&'a Db, &'a Package)> {
    handle
        .sync_dbs()
        .iter()
        .find_map(|db| db.pkg(name).ok().map(|pkg| (db, pkg)))
}
