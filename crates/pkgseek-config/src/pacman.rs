//! Reader for pacman's INI-like configuration file.
//!
//! Only the parts needed to locate package databases are interpreted: `RootDir` and `DBPath`
//! from `[options]`, and every other section as a repository in file order. `Include`
//! directives are expanded in place, with glob patterns resolved against the directory
//! listing of their parent.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, trace, warn};

use crate::{
    error::{ConfigError, Result},
    repository::Repository,
};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/pacman.conf";
pub const DEFAULT_ROOT_DIR: &str = "/";
pub const DEFAULT_DB_PATH: &str = "/var/lib/pacman/";

const MAX_INCLUDE_DEPTH: usize = 10;

/// Parsed pacman configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacmanConf {
    pub root_dir: PathBuf,
    pub db_path: PathBuf,
    pub repos: Vec<Repository>,
}

impl Default for PacmanConf {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ROOT_DIR),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            repos: Vec::new(),
        }
    }
}

impl PacmanConf {
    /// Reads and parses the configuration at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading pacman configuration");
        let content = read(path)?;
        Self::parse(&content, path)
    }

    /// Parses configuration text. `origin` is used for error messages and to resolve
    /// relative `Include` paths.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let mut parser = Parser::default();
        parser.feed(content, origin, 0)?;
        Ok(parser.finish())
    }

    /// Names of all repositories, in configuration order.
    pub fn repo_names(&self) -> impl Iterator<Item = &str> {
        self.repos.iter().map(|repo| repo.name.as_str())
    }

    /// Directory holding the database of installed packages.
    pub fn local_db_path(&self) -> PathBuf {
        self.db_path.join("local")
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        }
    })
}

#[derive(Clone, Copy)]
enum Section {
    Options,
    Repo(usize),
}

#[derive(Default)]
struct Parser {
    section: Option<Section>,
    root_dir: Option<PathBuf>,
    db_path: Option<PathBuf>,
    repos: Vec<Repository>,
}

impl Parser {
    fn feed(&mut self, content: &str, origin: &Path, depth: usize) -> Result<()> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(ConfigError::IncludeDepth {
                path: origin.to_path_buf(),
            });
        }

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').map(str::trim).unwrap_or_default();
                if name.is_empty() {
                    return Err(syntax(origin, line_no, format!("invalid section header `{line}`")));
                }
                self.open_section(name)?;
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (line, None),
            };

            let Some(section) = self.section else {
                return Err(syntax(
                    origin,
                    line_no,
                    format!("directive `{key}` outside of a section"),
                ));
            };

            if key == "Include" {
                let value = value
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| syntax(origin, line_no, "Include without a path".into()))?;
                self.include(value, origin, depth)?;
                continue;
            }

            match (section, value) {
                (Section::Options, Some(value)) => self.set_option(key, value),
                (Section::Repo(repo), Some(value)) => {
                    let repo = &mut self.repos[repo];
                    match key {
                        "Server" => repo.servers.push(value.to_string()),
                        "SigLevel" => {
                            repo.sig_level
                                .extend(value.split_whitespace().map(String::from))
                        }
                        "Usage" => repo.usage.extend(value.split_whitespace().map(String::from)),
                        _ => trace!(key = key, repo = %repo.name, "ignoring repository directive"),
                    }
                }
                (_, None) => trace!(key = key, "ignoring flag directive"),
            }
        }

        Ok(())
    }

    fn open_section(&mut self, name: &str) -> Result<()> {
        if name == "options" {
            self.section = Some(Section::Options);
            return Ok(());
        }
        if name == "local" {
            return Err(ConfigError::ReservedRepositoryName);
        }

        let order = self.repos.len();
        self.repos.push(Repository::new(name, order));
        self.section = Some(Section::Repo(order));
        Ok(())
    }

    fn set_option(&mut self, key: &str, value: &str) {
        match key {
            "RootDir" => self.root_dir = Some(PathBuf::from(value)),
            "DBPath" => self.db_path = Some(PathBuf::from(value)),
            _ => trace!(key = key, "ignoring option"),
        }
    }

    fn include(&mut self, value: &str, origin: &Path, depth: usize) -> Result<()> {
        let pattern = match origin.parent() {
            Some(parent) if Path::new(value).is_relative() => parent.join(value),
            _ => PathBuf::from(value),
        };

        for path in expand_include(&pattern)? {
            trace!(path = %path.display(), "including file");
            let content = read(&path)?;
            self.feed(&content, &path, depth + 1)?;
        }
        Ok(())
    }

    fn finish(self) -> PacmanConf {
        let root_dir = self
            .root_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR));
        // pacman places the database under a custom root unless told otherwise
        let db_path = self.db_path.unwrap_or_else(|| {
            if root_dir == Path::new(DEFAULT_ROOT_DIR) {
                PathBuf::from(DEFAULT_DB_PATH)
            } else {
                root_dir.join("var/lib/pacman/")
            }
        });

        PacmanConf {
            root_dir,
            db_path,
            repos: self.repos,
        }
    }
}

fn expand_include(pattern: &Path) -> Result<Vec<PathBuf>> {
    let text = pattern.to_string_lossy();
    if !text.contains(['*', '?', '[']) {
        return Ok(vec![pattern.to_path_buf()]);
    }

    let Some(dir) = pattern.parent() else {
        return Ok(Vec::new());
    };
    let entries = fs::read_dir(dir).map_err(|err| {
        ConfigError::Io {
            path: dir.to_path_buf(),
            source: err,
        }
    })?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| fast_glob::glob_match(&*text, &*path.to_string_lossy()))
        .collect();
    matches.sort();

    if matches.is_empty() {
        warn!(pattern = %text, "Include pattern matched no files");
    }
    Ok(matches)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn syntax(path: &Path, line: usize, message: String) -> ConfigError {
    ConfigError::Syntax {
        path: path.to_path_buf(),
        line,
        message,
    }
}
