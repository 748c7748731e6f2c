use crate::error::{FmsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const USER_ENV: &str = "FMS_USER";
pub const PASS_ENV: &str = "FMS_PASS";
pub const DEFAULT_CONFIG_FILE: &str = "fms.yaml";

/// Upstream tokens expire after an hour; the cache must give up before that.
const MAX_TOKEN_TTL_SECS: u64 = 3600;

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// FMS login secrets. Only ever read from the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub user: String,
    pub password: String,
}

impl Account {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(FmsError::MissingEnv(key))
        };
        Ok(Self {
            user: read(USER_ENV)?,
            password: read(PASS_ENV)?,
        })
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Sent as the `fms-client` header.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Sent as the `company-id` header.
    #[serde(default = "default_company_id")]
    pub company_id: String,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_upload_directory")]
    pub upload_directory: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(skip)]
    pub account: Account,
}

fn default_base_url() -> String {
    "https://fms.item.com".to_string()
}

fn default_client_name() -> String {
    "FMS_WEB".to_string()
}

fn default_company_id() -> String {
    "SBFH".to_string()
}

fn default_token_ttl_secs() -> u64 {
    55 * 60
}

fn default_upload_directory() -> String {
    "fms_trip_pod".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_name: default_client_name(),
            company_id: default_company_id(),
            token_ttl_secs: default_token_ttl_secs(),
            upload_directory: default_upload_directory(),
            request_timeout_secs: default_request_timeout_secs(),
            account: Account::default(),
        }
    }
}

impl Config {
    /// Config for the given account with every other setting at its default.
    pub fn new(account: Account) -> Self {
        Self {
            account,
            ..Self::default()
        }
    }

    /// Load settings from `path` (or `fms.yaml` in the working directory when
    /// present), apply environment overrides, read the account secrets and
    /// validate. Missing secrets are an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.account = Account::from_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Apply `FMS_BASE_URL`, `FMS_COMPANY_ID`, `FMS_CLIENT` and
    /// `FMS_TOKEN_TTL_SECS` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("FMS_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("FMS_COMPANY_ID") {
            self.company_id = v;
        }
        if let Some(v) = lookup("FMS_CLIENT") {
            self.client_name = v;
        }
        if let Some(v) = lookup("FMS_TOKEN_TTL_SECS") {
            self.token_ttl_secs = v.trim().parse().map_err(|_| {
                FmsError::InvalidConfig(format!("FMS_TOKEN_TTL_SECS is not a number: {v}"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_secs == 0 || self.token_ttl_secs >= MAX_TOKEN_TTL_SECS {
            return Err(FmsError::InvalidConfig(format!(
                "token_ttl_secs must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_SECS - 1,
                self.token_ttl_secs
            )));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(FmsError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(FmsError::InvalidConfig(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(&self.base_url)
    }
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// Absolute upstream URLs, all derived from the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub task_list: String,
    pub file_list: String,
    pub file_upload: String,
    pub task_complete: String,
    pub task_cancel: String,
    pub linehaul_revert: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let dispatch = format!("{base}/fms-platform-dispatch-management");
        Self {
            login: format!("{base}/fms-platform-user/Auth/Login"),
            task_list: format!("{dispatch}/TripDetail/GetTaskList"),
            file_list: format!("{dispatch}/Trips/GetFileInfoByTripId"),
            file_upload: format!("{base}/fms-platform-file/Storage/Upload"),
            task_complete: format!("{dispatch}/TripDetail/TaskComplete"),
            task_cancel: format!("{dispatch}/TripDetail/TaskCompleteCancel"),
            linehaul_revert: format!("{dispatch}/lh/revert-arrived"),
        }
    }
}
