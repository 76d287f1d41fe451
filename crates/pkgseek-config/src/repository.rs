use serde::Serialize;

/// A repository section read from pacman.conf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Section name, e.g. `core` or `extra`.
    pub name: String,

    /// Position of the section in the configuration, starting at 0.
    pub order: usize,

    /// Mirror URLs, unexpanded.
    pub servers: Vec<String>,

    /// Raw `SigLevel` tokens.
    pub sig_level: Vec<String>,

    /// Raw `Usage` tokens. Empty means `All`.
    pub usage: Vec<String>,
}

impl Repository {
    pub fn new(name: impl Into<String>, order: usize) -> Self {
        Self {
            name: name.into(),
            order,
            servers: Vec::new(),
            sig_level: Vec::new(),
            usage: Vec::new(),
        }
    }

    /// Whether this repository passes a user-supplied repository filter.
    ///
    /// An empty filter selects every repository.
    pub fn is_selected<T: AsRef<str>>(&self, filter: &[T]) -> bool {
        filter.is_empty() || filter.iter().any(|name| name.as_ref() == self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_selects_all() {
        let repo = Repository::new("core", 0);
        assert!(repo.is_selected::<&str>(&[]));
    }

    #[test]
    fn test_filter_matches_exact_name() {
        let repo = Repository::new("core", 0);
        assert!(repo.is_selected(&["extra", "core"]));
        assert!(!repo.is_selected(&["cor", "extra"]));
    }
}
