//! Path prefix matching.
//!
//! # Design Decisions
//! - Matching is segment aware: `/api/users` matches `/api/users` and
//!   `/api/users/42`, never `/api/users-archive`
//! - Path matching is case-sensitive
//! - No regex; a linear scan over a handful of mounts

/// Matches a request path against one mount prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, path: &str) -> bool {
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Resolves a path to the name of the mount that owns it.
///
/// Used for labelling logs and metrics; axum performs the actual dispatch.
#[derive(Debug, Clone, Default)]
pub struct MountIndex {
    entries: Vec<(PathPrefixMatcher, &'static str)>,
}

impl MountIndex {
    pub fn new(entries: impl IntoIterator<Item = (String, &'static str)>) -> Self {
        let mut entries: Vec<_> = entries
            .into_iter()
            .map(|(prefix, name)| (PathPrefixMatcher::new(prefix), name))
            .collect();
        // Longest prefix first so nested mounts win.
        entries.sort_by(|a, b| b.0.prefix().len().cmp(&a.0.prefix().len()));
        Self { entries }
    }

    pub fn lookup(&self, path: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher.matches(path))
            .map(|(_, name)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api/users");

        assert!(matcher.matches("/api/users"));
        assert!(matcher.matches("/api/users/"));
        assert!(matcher.matches("/api/users/42/avatar"));
        assert!(!matcher.matches("/api/users-archive"));
        assert!(!matcher.matches("/API/users"));
        assert!(!matcher.matches("/api"));
    }

    #[test]
    fn longest_prefix_wins() {
        let index = MountIndex::new([
            ("/api".to_string(), "api"),
            ("/api/auth".to_string(), "auth"),
        ]);

        assert_eq!(index.lookup("/api/auth/login"), Some("auth"));
        assert_eq!(index.lookup("/api/other"), Some("api"));
        assert_eq!(index.lookup("/metrics"), None);
    }
}
