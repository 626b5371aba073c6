//! Configuration file support
//!
//! An optional JSON file supplies defaults for the command line. Every field
//! is optional; command-line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignerError};

/// Environment variable naming a config file when `--config` is absent
pub const CONFIG_ENV_VAR: &str = "LSBSIGN_CONFIG";

/// Default suffix appended to the input name when `sign` has no output path
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_signed";

/// User configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Signing key used when `sign` is given no `--sk`
    pub signing_key: Option<PathBuf>,
    /// Verifying key used when `verify` is given no `--vk`
    pub verifying_key: Option<PathBuf>,
    /// env_logger filter, e.g. "info" or "lsbsign=debug"
    pub log_filter: Option<String>,
    /// Appended to the input file stem to name signed output
    pub output_suffix: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        SignerConfig {
            signing_key: None,
            verifying_key: None,
            log_filter: None,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

impl SignerConfig {
    /// Load a config file
    ///
    /// # Errors
    /// * `FileNotFound` - If the file does not exist
    /// * `Serialization` - If the file is not valid JSON for this schema
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SignerError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Resolve the config from an explicit path, then the environment,
    /// falling back to defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match std::env::var_os(CONFIG_ENV_VAR) {
                Some(path) => Self::load(Path::new(&path)),
                None => Ok(Self::default()),
            },
        }
    }

    /// Output path derived from the input: `clip.wav` -> `clip_signed.wav`
    pub fn default_output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match input.extension() {
            Some(ext) => format!("{}{}.{}", stem, self.output_suffix, ext.to_string_lossy()),
            None => format!("{}{}", stem, self.output_suffix),
        };
        input.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lsbsign.json");
        fs::write(&path, r#"{ "verifying_key": "keys/vk.pub" }"#).unwrap();

        let config = SignerConfig::load(&path).unwrap();
        assert_eq!(config.verifying_key, Some(PathBuf::from("keys/vk.pub")));
        assert_eq!(config.signing_key, None);
        assert_eq!(config.output_suffix, DEFAULT_OUTPUT_SUFFIX);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            SignerConfig::load(&path),
            Err(SignerError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(matches!(
            SignerConfig::resolve(Some(Path::new("/nonexistent/lsbsign.json"))),
            Err(SignerError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_default_output_path() {
        let config = SignerConfig::default();
        assert_eq!(
            config.default_output_path(Path::new("/tmp/take1.wav")),
            PathBuf::from("/tmp/take1_signed.wav")
        );
        assert_eq!(
            config.default_output_path(Path::new("take2")),
            PathBuf::from("take2_signed")
        );
    }
}
