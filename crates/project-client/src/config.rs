//! Client configuration
//!
//! Loaded from TOML, for example:
//!
//! ```toml
//! descriptor_name = "project.json"
//! pretty_json = true
//! serialize_writes = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Settings for a [`crate::ProjectClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// File name of the descriptor inside a project folder
    pub descriptor_name: String,
    /// Write descriptors indented instead of compact
    pub pretty_json: bool,
    /// Serialize read-modify-write edits per project within this process.
    ///
    /// Off by default: concurrent edits of one descriptor race and the last
    /// write wins.
    pub serialize_writes: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            descriptor_name: "project.json".to_string(),
            pretty_json: false,
            serialize_writes: false,
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        project_fs::location::validate_name(&config.descriptor_name).map_err(|message| {
            Error::Config {
                path: path.to_path_buf(),
                message: format!("descriptor_name: {}", message),
            }
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.descriptor_name, "project.json");
        assert!(!config.pretty_json);
        assert!(!config.serialize_writes);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ClientConfig::from_toml_str("").unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = ClientConfig::from_toml_str("serialize_writes = true").unwrap();
        assert!(config.serialize_writes);
        assert_eq!(config.descriptor_name, "project.json");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ClientConfig::from_toml_str("retries = 3").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_invalid_descriptor_name_rejected() {
        let err = ClientConfig::from_toml_str(r#"descriptor_name = "a/b.json""#).unwrap_err();
        assert!(err.to_string().contains("descriptor_name"));
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("client.toml");
        std::fs::write(&path, "descriptor_name = \"module.json\"\npretty_json = true\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.descriptor_name, "module.json");
        assert!(config.pretty_json);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ClientConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
