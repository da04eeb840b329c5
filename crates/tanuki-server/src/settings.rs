//! Server Settings
//!
//! Read once at startup from `TANUKI_*` environment variables (after `.env`),
//! optionally layered over a TOML file named by `TANUKI_CONFIG`.

use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tanuki::HookConfig;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_FORWARD_TIMEOUT_SECS: u64 = 10;

/// Process-wide server settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    /// Expected `X-Gitlab-Token`; `None` disables the check
    pub gitlab_token: Option<String>,
    /// Chat platform incoming-webhook URL; `None` disables forwarding
    pub forward_url: Option<String>,
    pub forward_timeout: Duration,
    pub hook: HookConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (environment, map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut hook = match var("TANUKI_CONFIG") {
            Some(path) => load_hook_file(Path::new(&path))?,
            None => HookConfig::default(),
        };

        if let Some(v) = parse_flag(&var, "TANUKI_MENTION_ALL")? {
            hook.mention_all_allowed = v;
        }
        if let Some(v) = parse_flag(&var, "TANUKI_IGNORE_CONFIDENTIAL")? {
            hook.ignore_confidential_issues = v;
        }
        if let Some(v) = parse_flag(&var, "TANUKI_IGNORE_UNKNOWN")? {
            hook.ignore_unknown_events = v;
        }
        if let Some(v) = parse_flag(&var, "TANUKI_IGNORE_ERRORS")? {
            hook.ignore_error_messages = v;
        }
        if let Some(v) = parse_flag(&var, "TANUKI_PLATFORM_AVATAR")? {
            hook.use_platform_default_avatar = v;
        }
        if let Some(url) = var("TANUKI_DEFAULT_AVATAR") {
            hook.default_avatar_url = Some(url);
        }
        if let Some(length) = parse_var::<usize>(&var, "TANUKI_TITLE_LENGTH")? {
            hook.attachment_title_length = length;
        }
        hook.validate().context("Invalid hook configuration")?;

        let bind_addr = var("TANUKI_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse()
            .context("TANUKI_BIND must be a socket address like 0.0.0.0:8080")?;
        let forward_timeout = parse_var::<u64>(&var, "TANUKI_FORWARD_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_FORWARD_TIMEOUT_SECS);

        Ok(Self {
            bind_addr,
            gitlab_token: var("TANUKI_GITLAB_TOKEN"),
            forward_url: var("TANUKI_FORWARD_URL"),
            forward_timeout: Duration::from_secs(forward_timeout),
            hook,
        })
    }
}

fn load_hook_file(path: &Path) -> Result<HookConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_hook_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_hook_toml(content: &str) -> Result<HookConfig> {
    Ok(toml::from_str(content)?)
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(key)
        .map(|raw| raw.parse::<T>().with_context(|| format!("{key} has an invalid value: {raw}")))
        .transpose()
}

fn parse_flag(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<bool>> {
    let Some(raw) = var(key) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => bail!("{key} must be a boolean, got {raw}"),
    }
}
