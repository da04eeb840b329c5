//! Configuration management for Tanuki CLI
//!
//! Stores the server URL, GitLab token and rendering policy in
//! ~/.config/tanuki/config.toml

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tanuki::HookConfig;

const CONFIG_DIR: &str = "tanuki";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_token: Option<String>,
    /// Rendering policy used by `tanuki format`
    #[serde(default)]
    pub hook: HookConfig,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            gitlab_token: None,
            hook: HookConfig::default(),
        }
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid value for {key}: {value}"))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file")?;

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory {:?}", dir))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Set one value by dotted key, e.g. `hook.ignore_unknown_events`
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let hook = &mut self.hook;
        match key {
            "server_url" => self.server_url = value.trim_end_matches('/').to_string(),
            "gitlab_token" => {
                self.gitlab_token = Some(value.to_string()).filter(|v| !v.is_empty())
            }
            "hook.mention_all_allowed" => hook.mention_all_allowed = parse_value(key, value)?,
            "hook.ignore_confidential_issues" => {
                hook.ignore_confidential_issues = parse_value(key, value)?
            }
            "hook.ignore_unknown_events" => hook.ignore_unknown_events = parse_value(key, value)?,
            "hook.ignore_error_messages" => hook.ignore_error_messages = parse_value(key, value)?,
            "hook.use_platform_default_avatar" => {
                hook.use_platform_default_avatar = parse_value(key, value)?
            }
            "hook.default_avatar_url" => {
                hook.default_avatar_url = Some(value.to_string()).filter(|v| !v.is_empty())
            }
            "hook.attachment_title_length" => {
                hook.attachment_title_length = parse_value(key, value)?
            }
            "hook.notification_color" => hook.notification_color = value.to_string(),
            "hook.error_color" => hook.error_color = value.to_string(),
            _ => {
                if let Some(status) = key.strip_prefix("hook.status_colors.") {
                    hook.status_colors
                        .insert(status.to_string(), value.to_string());
                } else if let Some(action) = key.strip_prefix("hook.action_verbs.") {
                    hook.action_verbs
                        .insert(action.to_string(), value.to_string());
                } else {
                    bail!("Unknown config key '{}'", key);
                }
            }
        }

        self.hook.validate().context("Invalid hook configuration")?;
        Ok(())
    }
}
