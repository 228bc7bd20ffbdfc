//! Defaults file support
//!
//! `~/.config/foreach-repos/config.toml` (or the file given with `--config`)
//! can provide defaults for the execution flags:
//!
//! ```toml
//! shell = "/bin/bash"
//! tmp_dir = "/var/tmp/foreach"
//! parallel = 8
//! api_url = "https://ghe.example.com/api/v3"
//! json = false
//! ```
//!
//! Flags given on the command line always win over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub shell: Option<PathBuf>,
    pub tmp_dir: Option<PathBuf>,
    pub parallel: Option<i64>,
    pub api_url: Option<String>,
    pub json: Option<bool>,
}

impl Settings {
    /// Loads the explicitly named file, or the default file when it exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Location of the per-user defaults file
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_partial_file() {
        let settings = Settings::parse("parallel = -1\nshell = \"/bin/bash\"\n").unwrap();
        assert_eq!(settings.parallel, Some(-1));
        assert_eq!(settings.shell, Some(PathBuf::from("/bin/bash")));
        assert_eq!(settings.tmp_dir, None);
        assert_eq!(settings.json, None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Settings::parse("paralel = 3\n").is_err());
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = Settings::load(Some(temp.path().join("nope.toml").as_path())).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));

        let path = temp.path().join("config.toml");
        std::fs::write(&path, "json = true\n").unwrap();
        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.json, Some(true));
    }
}
