use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub const CONFIG_PATH_VAR: &str = "GRAINPLAN_CONFIG";

pub struct EnvConfig {
    /// Bucketing config file to load, from `GRAINPLAN_CONFIG`
    pub config_path: Option<PathBuf>,
}

impl EnvConfig {
    pub fn load(manifest_dir: &Path) -> Result<Self> {
        if cfg!(debug_assertions) {
            load_dotenv(&manifest_dir.join(".env"))?;
        }

        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            config_path: lookup(CONFIG_PATH_VAR)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn load_dotenv(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Can't load {}", path.display())),
    }
}

/// Load env config using the calling crate's manifest directory.
#[macro_export]
macro_rules! load_env_config {
    () => {
        $crate::config::EnvConfig::load(std::path::Path::new(env!("CARGO_MANIFEST_DIR")))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_from_env() {
        let config = EnvConfig::from_lookup(|key| {
            (key == CONFIG_PATH_VAR).then(|| "/etc/grainplan.toml".to_owned())
        });
        assert_eq!(config.config_path, Some(PathBuf::from("/etc/grainplan.toml")));
    }

    #[test]
    fn test_blank_config_path_is_ignored() {
        let config = EnvConfig::from_lookup(|_| Some("  ".to_owned()));
        assert_eq!(config.config_path, None);

        let config = EnvConfig::from_lookup(|_| None);
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn test_missing_dotenv_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_dotenv(&dir.path().join(".env")).is_ok());
    }
}
