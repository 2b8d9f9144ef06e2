//! User configuration settings
//!
//! Layered configuration: defaults → YAML file → environment variables → CLI args

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, Error, GitHubError, Result};

/// Environment variable prefix (`GITHELPER_GITHUB_TOKEN`, ...)
pub const ENV_PREFIX: &str = "GITHELPER_";

/// Prefixed variables that belong to other layers (`GITHELPER_LOG` is the log filter)
const ENV_IGNORED: [&str; 1] = ["log"];

/// Config file name, looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".githelper.yaml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Token for the GitHub REST API
    pub github_token: Option<String>,

    /// API key for AI-generated commit messages
    pub openai_api_key: Option<String>,

    /// Chat model used for commit messages
    pub openai_model: String,

    /// Organization used when none is given
    pub default_org: Option<String>,

    /// Name of the integration branch (prune, worktree cleanup, sync-fork)
    pub main_branch: String,

    /// Never launch fzf, always use the numbered list
    #[serde(deserialize_with = "flexible_bool")]
    pub no_fzf: bool,

    /// Push copied repositories over SSH instead of HTTPS
    #[serde(deserialize_with = "flexible_bool")]
    pub use_ssh: bool,

    /// Editor for commit messages (falls back to $VISUAL, $EDITOR, vim)
    pub editor: Option<String>,

    /// Enable debug logging
    #[serde(deserialize_with = "flexible_bool")]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            openai_api_key: None,
            openai_model: "gpt-4".to_string(),
            default_org: None,
            main_branch: "main".to_string(),
            no_fzf: false,
            use_ssh: true,
            editor: None,
            debug: false,
        }
    }
}

/// Values supplied on the command line; unset fields leave lower layers alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_fzf: Option<bool>,
}

impl Config {
    /// Load configuration from all sources
    ///
    /// `path` is an explicit config file (`--config`); it must exist. Without
    /// it the default file is used when present.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let config_path = match path {
            Some(p) => {
                if !p.is_file() {
                    return Err(ConfigError::LoadFailed(format!(
                        "config file not found: {}",
                        p.display()
                    ))
                    .into());
                }
                p.to_path_buf()
            }
            None => Self::config_file_path()?,
        };

        Self::load_from(&config_path, overrides)
    }

    /// Load with a specific file path (missing file is fine)
    pub fn load_from(config_path: &Path, overrides: Overrides) -> Result<Self> {
        let config: Config = Self::figment(config_path, overrides)
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    fn figment(config_path: &Path, overrides: Overrides) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Yaml::file(config_path))
            // Layer environment variables (GITHELPER_GITHUB_TOKEN, etc.)
            .merge(Env::prefixed(ENV_PREFIX).ignore(&ENV_IGNORED))
            // Command-line flags win
            .merge(Serialized::defaults(overrides))
    }

    /// Get the default configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = BaseDirs::new().ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })?;
        Ok(dirs.home_dir().join(CONFIG_FILE_NAME))
    }

    /// The GitHub token, or an error explaining where to set it
    pub fn github_token(&self) -> Result<&str> {
        self.github_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| GitHubError::TokenMissing.into())
    }

    /// The AI API key when configured
    pub fn openai_api_key(&self) -> Option<&str> {
        self.openai_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    /// Resolve the editor command: config → $VISUAL → $EDITOR → vim
    pub fn resolve_editor(&self) -> String {
        self.editor
            .clone()
            .or_else(|| std::env::var("VISUAL").ok())
            .or_else(|| std::env::var("EDITOR").ok())
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "vim".to_string())
    }

    /// Human-readable settings with secrets masked
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("github_token", redact(self.github_token.as_deref())),
            ("openai_api_key", redact(self.openai_api_key.as_deref())),
            ("openai_model", self.openai_model.clone()),
            (
                "default_org",
                self.default_org.clone().unwrap_or_else(|| "(unset)".to_string()),
            ),
            ("main_branch", self.main_branch.clone()),
            ("no_fzf", self.no_fzf.to_string()),
            ("use_ssh", self.use_ssh.to_string()),
            ("editor", self.resolve_editor()),
            ("debug", self.debug.to_string()),
        ]
    }

    /// Write a commented template, refusing to clobber an existing file
    pub fn write_template(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(ConfigError::SaveFailed(format!(
                "{} already exists",
                path.display()
            ))
            .into());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }
        std::fs::write(path, TEMPLATE).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        Ok(())
    }
}

/// Booleans from YAML or the environment: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`
fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(0) => Ok(false),
        Raw::Int(1) => Ok(true),
        Raw::Int(n) => Err(de::Error::custom(format!("expected a boolean, found {}", n))),
        Raw::Text(text) => match text.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(de::Error::custom(format!("expected a boolean, found '{}'", text))),
        },
    }
}

fn redact(secret: Option<&str>) -> String {
    match secret {
        Some(s) if !s.is_empty() => format!("set ({} chars)", s.chars().count()),
        _ => "(unset)".to_string(),
    }
}

const TEMPLATE: &str = "\
# githelper configuration
# Every key can also be set through a GITHELPER_<KEY> environment variable.
# Booleans accept true/false, 1/0, yes/no or on/off.

# github_token: ghp_xxx        # used by `copy`
# openai_api_key: sk-xxx       # used by `commit --ai` and `squash --ai`
openai_model: gpt-4
main_branch: main
no_fzf: false
use_ssh: true
# editor: nvim
";
