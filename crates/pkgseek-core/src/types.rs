//! Records handed to the presentation layer.
//!
//! Field names follow the AUR RPC so results from the local databases and from the AUR can be
//! merged without translation.

use serde::{Deserialize, Serialize};

/// Popularity of packages that have no AUR statistics. Sorts after every real value.
pub const UNKNOWN_POPULARITY: f64 = f64::MAX;

/// A search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    pub name: String,
    /// Database the package was found in.
    pub source: String,
    pub is_installed: bool,
    /// Build date as a unix timestamp.
    pub last_modified: i64,
    pub popularity: f64,
}

/// An installed package together with its candidate from the sync databases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Upgrade {
    pub name: String,
    /// Candidate version, empty when no sync database has the package.
    pub version: String,
    pub local_version: String,
    /// Sync database of the candidate, or `local`.
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InfoRecord {
    pub name: String,
    pub package_base: String,
    pub version: String,
    pub description: String,
    #[serde(rename = "URL")]
    pub url: String,
    pub num_votes: u64,
    pub popularity: f64,
    pub out_of_date: Option<i64>,
    pub maintainer: String,
    pub last_modified: i64,
    pub architecture: String,
    pub license: Vec<String>,
    pub depends: Vec<String>,
    pub make_depends: Vec<String>,
    pub opt_depends: Vec<String>,
    pub check_depends: Vec<String>,
    pub provides: Vec<String>,
    pub conflicts: Vec<String>,
    pub required_by: Vec<String>,
    pub source: String,
}

/// Answer of an info lookup, shaped like an AUR RPC response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcResult {
    pub results: Vec<InfoRecord>,
    /// Empty unless the lookup failed.
    pub error: String,
}

impl RpcResult {
    pub fn with_results(results: Vec<InfoRecord>) -> Self {
        Self {
            results,
            error: String::new(),
        }
    }

    pub fn with_error(error: impl ToString) -> Self {
        Self {
            results: Vec::new(),
            error: error.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}
