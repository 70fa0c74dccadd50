//! Static configuration handed to the inspector at construction time.

use std::{
    collections::HashMap,
    fmt::{Debug, Formatter},
    path::PathBuf,
};

use regex::Regex;

use crate::ConfigError;

/// File names matched when no pattern is configured
pub const DEFAULT_NAME_PATTERN: &str = r".+\.vdb";

/// A case-sensitive predicate over file names. Always matches the whole name.
#[derive(Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// A pattern from a regular expression
    pub fn regex(expression: &str) -> Result<Self, ConfigError> {
        Regex::new(&format!("^(?s:{expression})$"))
            .map(|regex| Self {
                source: expression.to_owned(),
                regex,
            })
            .map_err(|error| ConfigError::InvalidPattern {
                pattern: expression.to_owned(),
                reason: format!("{error}"),
            })
    }

    /// A pattern from a shell-style glob: `*` matches any run of
    /// characters, `?` matches one, everything else is literal
    pub fn glob(glob: &str) -> Result<Self, ConfigError> {
        let mut expression = String::with_capacity(glob.len() * 2);
        for character in glob.chars() {
            match character {
                '*' => expression.push_str(".*"),
                '?' => expression.push('.'),
                other => expression.push_str(&regex::escape(&other.to_string())),
            }
        }
        let mut pattern = Self::regex(&expression)?;
        pattern.source = glob.to_owned();
        Ok(pattern)
    }

    /// Whether `name` matches in full
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as it was written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Debug for NamePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NamePattern").field(&self.source).finish()
    }
}

/// Where to look for databases and how to unlock them.
#[derive(Clone)]
pub struct InspectorConfig {
    domain: String,
    dirs: Vec<PathBuf>,
    name_pattern: NamePattern,
    encryption_keys: HashMap<String, Vec<u8>>,
}

impl InspectorConfig {
    /// Start configuring an inspector for the application `domain`
    pub fn builder(domain: impl Into<String>) -> InspectorConfigBuilder {
        InspectorConfigBuilder {
            domain: domain.into(),
            dirs: Vec::new(),
            name_pattern: None,
            encryption_keys: HashMap::new(),
        }
    }

    /// Identifier of the application owning the databases
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Directories scanned (non-recursively) for database files
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Predicate a file name must satisfy to be reported
    pub fn name_pattern(&self) -> &NamePattern {
        &self.name_pattern
    }

    /// The key configured for `file_name`, unless absent or empty
    pub fn encryption_key_for(&self, file_name: &str) -> Option<&[u8]> {
        self.encryption_keys
            .get(file_name)
            .map(Vec::as_slice)
            .filter(|key| !key.is_empty())
    }
}

impl Debug for InspectorConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut keyed: Vec<&String> = self.encryption_keys.keys().collect();
        keyed.sort();
        f.debug_struct("InspectorConfig")
            .field("domain", &self.domain)
            .field("dirs", &self.dirs)
            .field("name_pattern", &self.name_pattern)
            .field("encrypted_files", &keyed)
            .finish()
    }
}

/// Builds an [`InspectorConfig`]
pub struct InspectorConfigBuilder {
    domain: String,
    dirs: Vec<PathBuf>,
    name_pattern: Option<NamePattern>,
    encryption_keys: HashMap<String, Vec<u8>>,
}

impl InspectorConfigBuilder {
    /// Add a directory to scan
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.push(dir.into());
        self
    }

    /// Add several directories to scan
    pub fn dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Only report files whose name matches `pattern`
    pub fn name_pattern(mut self, pattern: NamePattern) -> Self {
        self.name_pattern = Some(pattern);
        self
    }

    /// Unlock the database file named `file_name` with a copy of `key`
    pub fn encryption_key(mut self, file_name: impl Into<String>, key: &[u8]) -> Self {
        self.encryption_keys.insert(file_name.into(), key.to_vec());
        self
    }

    /// Finish, falling back to the working directory and
    /// [`DEFAULT_NAME_PATTERN`] for anything left unset
    pub fn build(self) -> Result<InspectorConfig, ConfigError> {
        let dirs = if self.dirs.is_empty() {
            vec![std::env::current_dir()?]
        } else {
            self.dirs
        };
        let name_pattern = match self.name_pattern {
            Some(pattern) => pattern,
            None => NamePattern::regex(DEFAULT_NAME_PATTERN)?,
        };

        Ok(InspectorConfig {
            domain: self.domain,
            dirs,
            name_pattern,
            encryption_keys: self.encryption_keys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_matches_whole_names_only() -> anyhow::Result<()> {
        let pattern = NamePattern::regex(DEFAULT_NAME_PATTERN)?;

        assert!(pattern.matches("default.vdb"));
        assert!(!pattern.matches(".vdb"));
        assert!(!pattern.matches("default.vdb.lock"));
        assert!(!pattern.matches("DEFAULT.VDB"));
        Ok(())
    }

    #[test]
    fn it_translates_globs_literally() -> anyhow::Result<()> {
        let pattern = NamePattern::glob("*.db")?;

        assert!(pattern.matches("a.db"));
        assert!(!pattern.matches("adb"));
        assert!(!pattern.matches("c.txt"));
        assert_eq!(pattern.as_str(), "*.db");

        let single = NamePattern::glob("log-?.db")?;
        assert!(single.matches("log-1.db"));
        assert!(!single.matches("log-12.db"));
        Ok(())
    }

    #[test]
    fn it_rejects_broken_expressions() {
        assert!(matches!(
            NamePattern::regex("(unclosed"),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn it_ignores_empty_keys() -> anyhow::Result<()> {
        let config = InspectorConfig::builder("com.example")
            .dir("/data")
            .encryption_key("secret.vdb", b"key")
            .encryption_key("plain.vdb", b"")
            .build()?;

        assert_eq!(config.encryption_key_for("secret.vdb"), Some(&b"key"[..]));
        assert_eq!(config.encryption_key_for("plain.vdb"), None);
        assert_eq!(config.encryption_key_for("other.vdb"), None);
        let debug = format!("{config:?}");
        assert!(debug.contains("secret.vdb"));
        assert!(!debug.contains("107"));
        Ok(())
    }

    #[test]
    fn it_defaults_to_the_working_directory() -> anyhow::Result<()> {
        let config = InspectorConfig::builder("com.example").build()?;

        assert_eq!(config.dirs(), &[std::env::current_dir()?]);
        assert_eq!(config.name_pattern().as_str(), DEFAULT_NAME_PATTERN);
        Ok(())
    }
}
