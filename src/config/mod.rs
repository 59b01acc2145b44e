//! Configuration (ambient): load/save/validate the on-disk JSON fleet
//! configuration and expose the read-only repository/group view the core
//! consumes.

mod error;

pub use error::ConfigError;

use crate::git::Repository;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One entry under `"repositories"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    pub path: PathBuf,
}

/// The on-disk JSON configuration described in spec.md §6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetConfig {
    pub repositories: IndexMap<String, RepoEntry>,
    pub groups: IndexMap<String, Vec<String>>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

fn default_theme() -> String {
    "fleet".to_string()
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self { repositories: IndexMap::new(), groups: IndexMap::new(), theme: default_theme(), version: None }
    }
}

impl FleetConfig {
    /// `$HOME/.config/git-fleet/.gfconfig.json`, resolved via `dirs::home_dir`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(home.join(".config").join("git-fleet").join(".gfconfig.json"))
    }

    /// Load from `path`. A missing file is seeded with [`Self::example`] and
    /// written back before returning.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}; writing default example", path.display());
            let config = Self::example();
            config.save(path)?;
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write `self` as pretty JSON to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// A single sample repository and group, used to seed a fresh config.
    pub fn example() -> Self {
        let mut repositories = IndexMap::new();
        repositories.insert("example".to_string(), RepoEntry { path: PathBuf::from("/path/to/example") });

        let mut groups = IndexMap::new();
        groups.insert("all".to_string(), vec!["example".to_string()]);

        Self { repositories, groups, theme: default_theme(), version: Some(env!("CARGO_PKG_VERSION").to_string()) }
    }

    /// Every group's members must exist in `repositories`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (group, members) in &self.groups {
            for repo in members {
                if !self.repositories.contains_key(repo) {
                    return Err(ConfigError::UnknownRepository { group: group.clone(), repo: repo.clone() });
                }
            }
        }
        Ok(())
    }

    /// Resolve `groups` to a de-duplicated, insertion-ordered list of
    /// [`Repository`] values: first group first, group order preserved
    /// within each group. Empty `groups` resolves every configured group, in
    /// configuration order.
    pub fn repositories_for(&self, groups: &[String]) -> Result<Vec<Repository>, ConfigError> {
        let group_names: Vec<&String> =
            if groups.is_empty() { self.groups.keys().collect() } else { groups.iter().collect() };

        let mut seen = std::collections::HashSet::new();
        let mut ordered_names = Vec::new();

        for group in &group_names {
            let members = self.groups.get(*group).ok_or_else(|| ConfigError::UnknownGroup((*group).clone()))?;
            for repo in members {
                if seen.insert(repo.clone()) {
                    ordered_names.push(repo.clone());
                }
            }
        }

        Ok(ordered_names
            .into_iter()
            .filter_map(|name| {
                self.repositories.get(&name).map(|entry| Repository::new(name.clone(), entry.path.clone()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_is_valid() {
        let config = FleetConfig::example();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_repository() {
        let mut config = FleetConfig::default();
        config.groups.insert("g".to_string(), vec!["missing".to_string()]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRepository { .. }));
    }

    #[test]
    fn test_repositories_for_deduplicates_and_preserves_order() {
        let mut config = FleetConfig::default();
        config.repositories.insert("a".to_string(), RepoEntry { path: PathBuf::from("/a") });
        config.repositories.insert("b".to_string(), RepoEntry { path: PathBuf::from("/b") });
        config.groups.insert("g1".to_string(), vec!["a".to_string(), "b".to_string()]);
        config.groups.insert("g2".to_string(), vec!["b".to_string(), "a".to_string()]);

        let repos = config.repositories_for(&["g1".to_string(), "g2".to_string()]).expect("resolve");
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_repositories_for_unknown_group_errors() {
        let config = FleetConfig::default();
        let err = config.repositories_for(&["nope".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownGroup(_)));
    }

    #[test]
    fn test_load_seeds_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("subdir").join(".gfconfig.json");
        let config = FleetConfig::load(&path).expect("load");
        assert!(path.exists());
        assert!(config.repositories.contains_key("example"));
    }

    #[test]
    fn test_load_parses_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".gfconfig.json");
        let original = FleetConfig::example();
        original.save(&path).expect("save");

        let loaded = FleetConfig::load(&path).expect("load");
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".gfconfig.json");
        std::fs::write(&path, "not json").expect("write");
        let err = FleetConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_round_trip_preserves_theme_and_version() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".gfconfig.json");
        let mut config = FleetConfig::default();
        config.theme = "midnight".to_string();
        config.version = Some("1.2.3".to_string());
        config.save(&path).expect("save");

        let loaded = FleetConfig::load(&path).expect("load");
        assert_eq!(loaded.theme, "midnight");
        assert_eq!(loaded.version.as_deref(), Some("1.2.3"));
    }
}
