use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use bilete_core::pricing::PriceTable;
use bilete_core::scan::DEFAULT_SCAN_DEBOUNCE_MS;
use bilete_core::view::DEFAULT_ITEMS_PER_PAGE;
use bilete_core::TicketType;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const APP_DIR: &str = "bilete";
const CONFIG_FILENAME: &str = "config.toml";
const TOKEN_ENV: &str = "BILETE_TOKEN";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://www.site-bilete.shop/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_ITEMS_PER_PAGE: usize = 500;
pub const MAX_SCAN_DEBOUNCE_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub items_per_page: usize,
    pub scan_debounce_ms: u64,
    pub api: ApiConfig,
    pub prices: PriceTable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub public_base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            scan_debounce_ms: DEFAULT_SCAN_DEBOUNCE_MS,
            api: ApiConfig {
                base_url: DEFAULT_API_BASE_URL.to_string(),
                public_base_url: DEFAULT_PUBLIC_BASE_URL.to_string(),
                token: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            prices: PriceTable::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid items_per_page value: {0}")]
    InvalidItemsPerPage(usize),
    #[error("invalid scan_debounce_ms value: {0}")]
    InvalidScanDebounce(u64),
    #[error("invalid api.{field} value: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("invalid api.timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid price label: {0:?}")]
    InvalidPriceLabel(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    items_per_page: Option<usize>,
    scan_debounce_ms: Option<u64>,
    api: Option<ApiFile>,
    prices: Option<BTreeMap<String, u64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApiFile {
    base_url: Option<String>,
    public_base_url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = load_file(config_path)?;
    Ok(apply_token_override(config, env::var(TOKEN_ENV).ok()))
}

fn load_file(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(items_per_page) = parsed.items_per_page {
        if items_per_page == 0 || items_per_page > MAX_ITEMS_PER_PAGE {
            return Err(ConfigError::InvalidItemsPerPage(items_per_page));
        }
        config.items_per_page = items_per_page;
    }

    if let Some(debounce) = parsed.scan_debounce_ms {
        if debounce > MAX_SCAN_DEBOUNCE_MS {
            return Err(ConfigError::InvalidScanDebounce(debounce));
        }
        config.scan_debounce_ms = debounce;
    }

    if let Some(api) = parsed.api {
        if let Some(base_url) = api.base_url {
            config.api.base_url = validate_url("base_url", &base_url)?;
        }
        if let Some(public_base_url) = api.public_base_url {
            config.api.public_base_url = validate_url("public_base_url", &public_base_url)?;
        }
        if let Some(token) = api.token {
            config.api.token = normalize_token(token);
        }
        if let Some(timeout) = api.timeout_secs {
            if timeout == 0 {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
            config.api.timeout_secs = timeout;
        }
    }

    if let Some(prices) = parsed.prices {
        for (label, price) in prices {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidPriceLabel(label));
            }
            config.prices.set_price(&TicketType::from_label(&label), price);
        }
    }

    Ok(config)
}

fn apply_token_override(mut config: AppConfig, token: Option<String>) -> AppConfig {
    if let Some(token) = token.and_then(normalize_token) {
        config.api.token = Some(token);
    }
    config
}

fn normalize_token(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn validate_url(field: &'static str, raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = || ConfigError::InvalidUrl {
        field,
        value: raw.to_string(),
    };
    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
