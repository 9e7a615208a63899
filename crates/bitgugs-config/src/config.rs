//! Configuration types and loading.
//!
//! The main entry point is [`BitgugsConfig`]. Configuration is loaded with
//! [`load_config`], which merges the defaults with the repository's config
//! files and the environment.

use bitgugs_core::idgen::DEFAULT_FIRST_ID;
use bitgugs_core::store::DEFAULT_ISSUE_DIR;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// YAML config file name, looked up at the repository root.
pub const YAML_CONFIG_FILE: &str = ".bitgugs.yaml";

/// TOML config file name, looked up at the repository root.
pub const TOML_CONFIG_FILE: &str = ".bitgugs.toml";

/// Prefix of environment variables overriding configuration keys.
pub const ENV_PREFIX: &str = "BITGUGS_";

/// Editor used when neither the config nor `$EDITOR` names one.
pub const FALLBACK_EDITOR: &str = "sensible-editor";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider could not be read or a value had the wrong type.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// The configuration could not be rendered.
    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_yaml::Error),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full bitgugs configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BitgugsConfig {
    /// Directory below the repository root holding issue files.
    pub issue_dir: String,

    /// Id given to the first automatically numbered issue.
    pub first_id: u64,

    /// Status written by `new` unless `-s` is given.
    pub default_status: String,

    /// Status written by `take` unless `-s` is given.
    pub take_status: String,

    /// Status query applied by `list` unless `-s` is given.
    pub list_status: String,

    /// Editor command; falls back to `$EDITOR`, then `sensible-editor`.
    pub editor: Option<String>,

    /// Message attached to the stash taken by `--commit`.
    pub stash_message: String,
}

impl Default for BitgugsConfig {
    fn default() -> Self {
        Self {
            issue_dir: DEFAULT_ISSUE_DIR.to_string(),
            first_id: DEFAULT_FIRST_ID,
            default_status: "created".to_string(),
            take_status: "assigned".to_string(),
            list_status: "not closed".to_string(),
            editor: None,
            stash_message: "bitgugs stash for --commit".to_string(),
        }
    }
}

impl BitgugsConfig {
    /// The editor command to launch, honouring `$EDITOR`.
    pub fn editor_command(&self) -> String {
        resolve_editor(self.editor.as_deref(), std::env::var("EDITOR").ok())
    }

    /// Renders the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        let dir = self.issue_dir.trim();
        if dir.is_empty() || dir.contains("..") || Path::new(dir).is_absolute() {
            return Err(ConfigError::InvalidValue {
                key: "issue-dir".to_string(),
                reason: format!("{:?} must be a relative directory inside the repository", self.issue_dir),
            });
        }
        for (key, value) in [
            ("default-status", &self.default_status),
            ("take-status", &self.take_status),
        ] {
            if value.trim().is_empty() || value.contains('\n') {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    reason: "must be a non-empty single line".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Picks the editor: configured value, then `$EDITOR`, then the fallback.
/// Empty values are ignored.
pub fn resolve_editor(configured: Option<&str>, env_editor: Option<String>) -> String {
    configured
        .map(str::to_string)
        .filter(|e| !e.trim().is_empty())
        .or_else(|| env_editor.filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The layered provider stack for a repository rooted at `root`.
pub fn figment(root: &Path) -> Figment {
    Figment::from(Serialized::defaults(BitgugsConfig::default()))
        .merge(Yaml::file(root.join(YAML_CONFIG_FILE)))
        .merge(Toml::file(root.join(TOML_CONFIG_FILE)))
        .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().replace('_', "-").into()))
}

/// Load configuration for the repository rooted at `root`.
///
/// Missing config files are not an error; defaults apply.
///
/// # Errors
///
/// Returns [`ConfigError::Figment`] if a file cannot be parsed or a value
/// has the wrong type, and [`ConfigError::InvalidValue`] for values that
/// parse but make no sense.
pub fn load_config(root: &Path) -> Result<BitgugsConfig> {
    let config: BitgugsConfig = figment(root).extract()?;
    config.validate()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let cfg = BitgugsConfig::default();
        assert_eq!(cfg.issue_dir, "issues");
        assert_eq!(cfg.first_id, 1001);
        assert_eq!(cfg.default_status, "created");
        assert_eq!(cfg.take_status, "assigned");
        assert_eq!(cfg.list_status, "not closed");
        assert!(cfg.editor.is_none());
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        Jail::expect_with(|jail| {
            let cfg = load_config(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(cfg, BitgugsConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(YAML_CONFIG_FILE, "issue-dir: tickets\nfirst-id: 1\n")?;
            let cfg = load_config(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(cfg.issue_dir, "tickets");
            assert_eq!(cfg.first_id, 1);
            assert_eq!(cfg.default_status, "created");
            Ok(())
        });
    }

    #[test]
    fn test_toml_over_yaml_and_env_over_both() {
        Jail::expect_with(|jail| {
            jail.create_file(YAML_CONFIG_FILE, "take-status: yaml\nlist-status: yaml\n")?;
            jail.create_file(TOML_CONFIG_FILE, "take-status = \"toml\"\nlist-status = \"toml\"\n")?;
            jail.set_env("BITGUGS_LIST_STATUS", "not done");
            let cfg = load_config(jail.directory()).map_err(|e| e.to_string())?;
            assert_eq!(cfg.take_status, "toml");
            assert_eq!(cfg.list_status, "not done");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file(YAML_CONFIG_FILE, "first-id: [not a number\n")?;
            assert!(matches!(
                load_config(jail.directory()),
                Err(ConfigError::Figment(_))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_issue_dir_must_stay_inside_repo() {
        Jail::expect_with(|jail| {
            jail.create_file(YAML_CONFIG_FILE, "issue-dir: ../elsewhere\n")?;
            assert!(matches!(
                load_config(jail.directory()),
                Err(ConfigError::InvalidValue { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn test_resolve_editor_priority() {
        assert_eq!(resolve_editor(Some("nano"), Some("vim".into())), "nano");
        assert_eq!(resolve_editor(None, Some("vim".into())), "vim");
        assert_eq!(resolve_editor(Some(""), Some(" ".into())), FALLBACK_EDITOR);
        assert_eq!(resolve_editor(None, None), FALLBACK_EDITOR);
    }

    #[test]
    fn test_yaml_rendering_round_trips() {
        let cfg = BitgugsConfig {
            editor: Some("vi".to_string()),
            ..BitgugsConfig::default()
        };
        let yaml = cfg.to_yaml().unwrap();
        assert!(yaml.contains("issue-dir: issues"));
        let back: BitgugsConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, cfg);
    }
}
