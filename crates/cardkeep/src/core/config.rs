//! Runtime configuration
//!
//! Settings come from explicit values (usually CLI flags), then environment
//! variables, then defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use super::card::MergePolicy;

/// Environment variable naming the directory that holds collection files
pub const DATA_DIR_ENV: &str = "CARDKEEP_DATA_DIR";

/// Environment variable selecting the update merge policy
pub const MERGE_POLICY_ENV: &str = "CARDKEEP_MERGE_POLICY";

/// Directory used when nothing else is configured
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub merge_policy: MergePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            merge_policy: MergePolicy::default(),
        }
    }
}

impl Config {
    pub fn new(data_dir: impl Into<PathBuf>, merge_policy: MergePolicy) -> Self {
        Self {
            data_dir: data_dir.into(),
            merge_policy,
        }
    }

    /// Resolve settings, preferring the given overrides over the environment
    pub fn resolve(data_dir: Option<&Path>, merge_policy: Option<MergePolicy>) -> Self {
        Self::resolve_with(data_dir, merge_policy, |key| std::env::var(key).ok())
    }

    /// Like [`Config::resolve`], reading variables through `lookup`
    pub fn resolve_with<F>(
        data_dir: Option<&Path>,
        merge_policy: Option<MergePolicy>,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = data_dir
            .map(Path::to_path_buf)
            .or_else(|| lookup(DATA_DIR_ENV).filter(|s| !s.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let merge_policy = merge_policy
            .or_else(|| {
                let raw = lookup(MERGE_POLICY_ENV)?;
                MergePolicy::from_str(&raw)
                    .map_err(|e| warn!(error = %e, "Ignoring {}", MERGE_POLICY_ENV))
                    .ok()
            })
            .unwrap_or_default();

        Self {
            data_dir,
            merge_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve_with(None, None, env(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }

    #[test]
    fn test_environment_is_used() {
        let config = Config::resolve_with(
            None,
            None,
            env(&[(DATA_DIR_ENV, "/srv/cards"), (MERGE_POLICY_ENV, "truthy")]),
        );
        assert_eq!(config.data_dir, PathBuf::from("/srv/cards"));
        assert_eq!(config.merge_policy, MergePolicy::Truthy);
    }

    #[test]
    fn test_overrides_beat_environment() {
        let config = Config::resolve_with(
            Some(Path::new("mine")),
            Some(MergePolicy::Explicit),
            env(&[(DATA_DIR_ENV, "/srv/cards"), (MERGE_POLICY_ENV, "truthy")]),
        );
        assert_eq!(config, Config::new("mine", MergePolicy::Explicit));
    }

    #[test]
    fn test_bad_environment_values_fall_back() {
        let config = Config::resolve_with(
            None,
            None,
            env(&[(DATA_DIR_ENV, ""), (MERGE_POLICY_ENV, "sometimes")]),
        );
        assert_eq!(config, Config::default());
    }
}
