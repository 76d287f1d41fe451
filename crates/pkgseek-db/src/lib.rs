//! Read-only access to pacman package databases through libalpm.
//!
//! A [`DbHandle`] owns an `alpm` handle: the local database of installed packages and an
//! ordered list of registered sync databases. libalpm loads each package cache on first use
//! and keeps it for the lifetime of the handle.

pub mod error;
pub mod handle;

#[cfg(any(test, feature = "test-utils"))]
pub mod fixture;

pub use alpm::{vercmp, AlpmList, Db, Dep, Package, PackageReason};
pub use error::{DbError, Result};
pub use handle::{DbHandle, LOCAL_DB_NAME};
