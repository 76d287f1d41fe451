use std::{fmt, fs, path::PathBuf, str::FromStr};

use pkgseek_utils::path::{resolve_path, xdg_config_home};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    pacman::DEFAULT_CONFIG_PATH,
};

/// Comparison applied to each candidate string during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// The term must be a prefix.
    #[default]
    StartsWith,
    /// The term may appear anywhere.
    Contains,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::StartsWith => "StartsWith",
            SearchMode::Contains => "Contains",
        }
    }

    pub fn matches(&self, haystack: &str, term: &str) -> bool {
        match self {
            SearchMode::StartsWith => haystack.starts_with(term),
            SearchMode::Contains => haystack.contains(term),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "StartsWith" => Ok(SearchMode::StartsWith),
            "Contains" => Ok(SearchMode::Contains),
            other => Err(format!("unknown search mode `{other}`")),
        }
    }
}

/// Which package fields a search looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchBy {
    #[default]
    Name,
    #[serde(rename = "Name & Description")]
    NameAndDescription,
}

impl SearchBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchBy::Name => "Name",
            SearchBy::NameAndDescription => "Name & Description",
        }
    }
}

impl fmt::Display for SearchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Name" => Ok(SearchBy::Name),
            "Name & Description" => Ok(SearchBy::NameAndDescription),
            other => Err(format!("unknown search field `{other}`")),
        }
    }
}

/// User settings for the `pkgseek` command line tool.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Path to the pacman configuration.
    /// Default: /etc/pacman.conf
    pub pacman_config: String,

    /// Default: StartsWith
    pub search_mode: SearchMode,

    /// Default: Name
    pub search_by: SearchBy,

    /// Upper bound on search results.
    /// Default: 100
    pub max_results: usize,

    /// Repositories to consult. Empty means all repositories in pacman.conf.
    pub repositories: Vec<String>,

    /// Search against a freshly synced copy of the sync databases.
    /// Default: false
    pub use_temp_db: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pacman_config: DEFAULT_CONFIG_PATH.to_string(),
            search_mode: SearchMode::default(),
            search_by: SearchBy::default(),
            max_results: 100,
            repositories: Vec::new(),
            use_temp_db: false,
        }
    }
}

impl Settings {
    /// Location of the settings file: `$PKGSEEK_CONFIG`, else
    /// `$XDG_CONFIG_HOME/pkgseek/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        match std::env::var("PKGSEEK_CONFIG") {
            Ok(path) => Ok(resolve_path(&path)?),
            Err(_) => Ok(xdg_config_home().join("pkgseek").join("config.toml")),
        }
    }

    /// Loads settings from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        if !path.exists() {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|err| {
            ConfigError::Io {
                path: path.clone(),
                source: err,
            }
        })?;
        let mut settings: Settings = toml::from_str(&content)?;
        settings.pacman_config = resolve_path(&settings.pacman_config)?
            .to_string_lossy()
            .into_owned();
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgseek_utils::test_utils::with_env;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_search_mode_round_trips_ui_strings() {
        assert_eq!("Contains".parse::<SearchMode>().unwrap(), SearchMode::Contains);
        assert_eq!(SearchMode::StartsWith.to_string(), "StartsWith");
        assert!("contains".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_search_by_parses_combined_field() {
        assert_eq!(
            "Name & Description".parse::<SearchBy>().unwrap(),
            SearchBy::NameAndDescription
        );
        assert_eq!(SearchBy::NameAndDescription.to_string(), "Name & Description");
    }

    #[test]
    fn test_search_mode_matches() {
        assert!(SearchMode::StartsWith.matches("firefox", "fire"));
        assert!(!SearchMode::StartsWith.matches("firefox", "fox"));
        assert!(SearchMode::Contains.matches("firefox", "fox"));
        assert!(SearchMode::Contains.matches("anything", ""));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(Some(dir.path().join("config.toml"))).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.max_results, 100);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "search_mode = \"Contains\"\nsearch_by = \"Name & Description\"\nrepositories = [\"core\"]\n",
        )
        .unwrap();

        let settings = Settings::load(Some(path)).unwrap();
        assert_eq!(settings.search_mode, SearchMode::Contains);
        assert_eq!(settings.search_by, SearchBy::NameAndDescription);
        assert_eq!(settings.repositories, vec!["core"]);
        assert_eq!(settings.pacman_config, DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_results = \"many\"\n").unwrap();
        assert!(matches!(
            Settings::load(Some(path)),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    #[serial]
    fn test_default_path_from_env() {
        with_env(vec![("PKGSEEK_CONFIG", "/srv/pkgseek.toml")], || {
            assert_eq!(
                Settings::default_path().unwrap(),
                PathBuf::from("/srv/pkgseek.toml")
            );
        });
    }
}
