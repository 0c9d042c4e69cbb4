// Configuration layer: merges command-line flags, the persisted user config
// and built-in defaults into the `EffectiveConfig` a command runs with.
//
// `resolve` is pure so precedence can be tested without touching disk. The
// `UserConfig` load/write helpers are the only functions here doing I/O.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

/// API base URL used when neither a flag nor the user config sets one.
pub const DEFAULT_API_BASE_URL: &str = "https://api.exercism.com/v1";

/// Environment variable that overrides the config directory.
pub const CONFIG_HOME_ENV: &str = "EXERCISM_CONFIG_HOME";

const USER_CONFIG_FILE: &str = "user.json";
const FALLBACK_SETTINGS_URL: &str = "https://exercism.com/my/settings";

/// Values given on the command line. `None` and `Some("")` both mean
/// "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFlags {
    pub token: Option<String>,
    pub workspace: Option<String>,
    pub api: Option<String>,
}

/// Settings persisted in `user.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apibaseurl: Option<String>,
}

/// Lowest-precedence layer. Only the API base URL has a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub apibaseurl: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            apibaseurl: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// The merged configuration for one invocation.
///
/// `token` and `workspace` may be empty; commands that need them check with
/// [`EffectiveConfig::require_token`] and [`EffectiveConfig::require_workspace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub token: String,
    pub workspace: PathBuf,
    pub api_base_url: String,
}

impl EffectiveConfig {
    /// Return the token or the welcome message pointing at the settings page.
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        if self.token.is_empty() {
            return Err(ConfigError::MissingToken {
                settings_url: settings_url(&self.api_base_url),
            });
        }
        Ok(&self.token)
    }

    pub fn require_workspace(&self) -> Result<&Path, ConfigError> {
        if self.workspace.as_os_str().is_empty() {
            return Err(ConfigError::MissingWorkspace);
        }
        Ok(&self.workspace)
    }
}

fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Merge the three layers: flag, then persisted value, then default.
pub fn resolve(flags: &ConfigFlags, persisted: &UserConfig, defaults: &Defaults) -> EffectiveConfig {
    let pick = |key: &str, flag: Option<&str>, stored: Option<&str>| -> Option<String> {
        if let Some(v) = supplied(flag) {
            debug!(key, source = "flag", "resolved config value");
            return Some(v.to_string());
        }
        if let Some(v) = supplied(stored) {
            debug!(key, source = "user config", "resolved config value");
            return Some(v.to_string());
        }
        None
    };

    let token = pick("token", flags.token.as_deref(), persisted.token.as_deref());
    let workspace = pick(
        "workspace",
        flags.workspace.as_deref(),
        persisted.workspace.as_deref(),
    );
    let api_base_url = pick(
        "apibaseurl",
        flags.api.as_deref(),
        persisted.apibaseurl.as_deref(),
    )
    .unwrap_or_else(|| {
        debug!(key = "apibaseurl", source = "default", "resolved config value");
        defaults.apibaseurl.clone()
    });

    EffectiveConfig {
        token: token.unwrap_or_default(),
        workspace: workspace.map(PathBuf::from).unwrap_or_default(),
        api_base_url,
    }
}

/// Directory holding `user.json`: `$EXERCISM_CONFIG_HOME`, else the
/// platform config dir plus `exercism`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("exercism"))
        .ok_or(ConfigError::NoConfigDir)
}

impl UserConfig {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(USER_CONFIG_FILE)
    }

    /// Load `user.json` from `dir`. A missing file is an empty config.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(dir);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no user config found");
                return Ok(UserConfig::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Persist to `user.json` in `dir`, creating the directory if needed.
    pub fn write(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = Self::path_in(dir);
        fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: path.clone(),
            source,
        })?;
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, text.as_bytes()).map_err(|source| ConfigError::Write { path, source })
    }

    /// Overlay every supplied flag onto this config, keeping the rest.
    pub fn apply_flags(&mut self, flags: &ConfigFlags) {
        if let Some(token) = supplied(flags.token.as_deref()) {
            self.token = Some(token.to_string());
        }
        if let Some(workspace) = supplied(flags.workspace.as_deref()) {
            self.workspace = Some(workspace.to_string());
        }
        if let Some(api) = supplied(flags.api.as_deref()) {
            self.apibaseurl = Some(api.to_string());
        }
    }
}

/// Page where users find their API token, derived from the API base URL.
///
/// `https://api.exercism.com/v1` becomes `https://exercism.com/my/settings`.
pub fn settings_url(api_base_url: &str) -> String {
    let Ok(url) = Url::parse(api_base_url) else {
        return FALLBACK_SETTINGS_URL.to_string();
    };
    let Some(host) = url.host_str() else {
        return FALLBACK_SETTINGS_URL.to_string();
    };
    let host = host.strip_prefix("api.").unwrap_or(host);
    match url.port() {
        Some(port) => format!("{}://{}:{}/my/settings", url.scheme(), host, port),
        None => format!("{}://{}/my/settings", url.scheme(), host),
    }
}
