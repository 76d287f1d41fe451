use pkgseek_db::{AlpmList, Db, DbHandle, Dep, Package, LOCAL_DB_NAME};
use tracing::{debug, warn};

use crate::{
    error::{SeekError, SeekResult},
    types::{InfoRecord, RpcResult},
};

/// Appended to the description of packages that only exist in the local database.
///
/// Uses the colour markup of the terminal UI.
pub const LOCAL_ONLY_MARKER: &str = "\n[red]* Package not found in repositories/AUR *";

/// Looks up `names` in the sync databases, then in the local database.
///
/// The first database carrying a name wins. Unknown names are left out of the result. Errors
/// are reported in [`RpcResult::error`] instead of being returned.
pub fn get_info<T: AsRef<str>>(handle: Option<&DbHandle>, names: &[T]) -> RpcResult {
    match try_get_info(handle, names) {
        Ok(results) => RpcResult::with_results(results),
        Err(err) => {
            warn!(error = %err, "package info lookup failed");
            RpcResult::with_error(err)
        }
    }
}

fn try_get_info<T: AsRef<str>>(handle: Option<&DbHandle>, names: &[T]) -> SeekResult<Vec<InfoRecord>> {
    let handle = handle.ok_or(SeekError::NoHandle)?;
    let dbs: Vec<&Db> = handle
        .sync_dbs()
        .iter()
        .chain(std::iter::once(handle.local_db()))
        .collect();

    let mut results = Vec::new();
    for name in names {
        let name = name.as_ref();
        match dbs
            .iter()
            .find_map(|db| db.pkg(name).ok().map(|pkg| (*db, pkg)))
        {
            Some((db, pkg)) => results.push(project(db, pkg)),
            None => debug!(name, "package not found in any database"),
        }
    }

    Ok(results)
}

fn dep_names(deps: AlpmList<'_, &Dep>) -> Vec<String> {
    deps.iter().map(|dep| dep.name().to_string()).collect()
}

fn project(db: &Db, pkg: &Package) -> InfoRecord {
    let mut description = pkg.desc().unwrap_or_default().to_string();
    if db.name() == LOCAL_DB_NAME {
        description.push_str(LOCAL_ONLY_MARKER);
    }

    InfoRecord {
        name: pkg.name().to_string(),
        package_base: pkg.base().unwrap_or(pkg.name()).to_string(),
        version: pkg.version().as_str().to_string(),
        description,
        url: pkg.url().unwrap_or_default().to_string(),
        maintainer: pkg.packager().unwrap_or_default().to_string(),
        last_modified: pkg.build_date(),
        architecture: pkg.arch().unwrap_or_default().to_string(),
        license: pkg.licenses().iter().map(|license| license.to_string()).collect(),
        depends: dep_names(pkg.depends()),
        make_depends: dep_names(pkg.makedepends()),
        opt_depends: dep_names(pkg.optdepends()),
        check_depends: dep_names(pkg.checkdepends()),
        // left empty for database packages, even when they declare some
        provides: Vec::new(),
        conflicts: Vec::new(),
        required_by: pkg.required_by().into_iter().collect(),
        source: db.name().to_string(),
        ..Default::default()
    }
}

/// Whether a package called `name` is installed. Any lookup failure counts as not installed.
pub fn is_package_installed(handle: Option<&DbHandle>, name: &str) -> bool {
    handle.is_some_and(|handle| handle.local_db().pkg(name).is_ok())
}
