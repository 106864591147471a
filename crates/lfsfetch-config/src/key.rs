// SPDX-License-Identifier: AGPL-3.0
// Copyright (C) 2025 MediaGit Contributors

//! Git-style configuration keys (`section[.subsection].name`).

use std::fmt;

/// A fully qualified configuration key.
///
/// Section and name are case-insensitive and stored lower-cased; the
/// subsection (e.g. a remote name) keeps its case, as in git.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    section: String,
    subsection: Option<String>,
    name: String,
}

impl ConfigKey {
    /// Key without a subsection, e.g. `lfs.url`
    pub fn new(section: &str, name: &str) -> Self {
        Self {
            section: section.to_ascii_lowercase(),
            subsection: None,
            name: name.to_ascii_lowercase(),
        }
    }

    /// Key with a subsection, e.g. `remote.origin.lfsurl`
    pub fn with_subsection(section: &str, subsection: &str, name: &str) -> Self {
        Self {
            section: section.to_ascii_lowercase(),
            subsection: Some(subsection.to_string()),
            name: name.to_ascii_lowercase(),
        }
    }

    /// Parse `section.name` or `section.sub.section.name`.
    ///
    /// Everything between the first and the last dot is the subsection, so
    /// remote names containing dots survive.
    pub fn parse(key: &str) -> Option<Self> {
        let (section, rest) = key.split_once('.')?;
        let (subsection, name) = match rest.rsplit_once('.') {
            Some((sub, name)) => (Some(sub), name),
            None => (None, rest),
        };
        if section.is_empty() || name.is_empty() {
            return None;
        }
        Some(match subsection {
            Some(sub) => Self::with_subsection(section, sub, name),
            None => Self::new(section, name),
        })
    }

    /// Section name
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Subsection, if any
    pub fn subsection(&self) -> Option<&str> {
        self.subsection.as_deref()
    }

    /// Variable name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subsection {
            Some(sub) => write!(f, "{}.{}.{}", self.section, sub, self.name),
            None => write!(f, "{}.{}", self.section, self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ConfigKey::new("lfs", "url").to_string(), "lfs.url");
        assert_eq!(
            ConfigKey::with_subsection("remote", "Origin", "lfsUrl").to_string(),
            "remote.Origin.lfsurl"
        );
    }

    #[test]
    fn test_parse_simple_and_subsection() {
        assert_eq!(ConfigKey::parse("LFS.URL"), Some(ConfigKey::new("lfs", "url")));
        assert_eq!(
            ConfigKey::parse("remote.my.fork.lfsurl"),
            Some(ConfigKey::with_subsection("remote", "my.fork", "lfsurl"))
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(ConfigKey::parse("nodot"), None);
        assert_eq!(ConfigKey::parse(".url"), None);
        assert_eq!(ConfigKey::parse("lfs."), None);
    }
}
