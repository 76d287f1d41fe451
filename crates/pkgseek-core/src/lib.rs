//! Package lookup operations over pacman databases.
//!
//! [`handle::open_handle`] opens the live database, [`sync::TempSync`] builds a fresh copy of
//! the sync databases without root, and the search, upgrade and info operations run against
//! either handle.

pub mod error;
pub mod handle;
pub mod info;
pub mod search;
pub mod sync;
pub mod types;
pub mod upgrade;

pub use error::{SeekError, SeekResult};
pub use handle::open_handle;
pub use info::{get_info, is_package_installed};
pub use search::{search_repos, SearchBy, SearchMode, SearchQuery};
pub use sync::TempSync;
pub use types::{InfoRecord, Package, RpcResult, Upgrade};
pub use upgrade::compute_upgrades;
