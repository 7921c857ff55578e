//! 服务配置
//! Service configuration
//!
//! 从 [`ConfigManager`] 读取各配置段并校验取值
//! Reads every section from a [`ConfigManager`] and validates the values

use std::time::Duration;

use crate::comm::config::{ConfigError, ConfigManager};

/// HTTP 服务配置 / HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: None,
        }
    }
}

/// 存储后端类型 / Storage backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!("unsupported store backend: {}", other)),
        }
    }
}

/// 存储配置 / Storage configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// 显式连接串，优先于 host/port/user/pass/name
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub name: String,
    pub max_connections: u32,
    pub operation_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            host: "127.0.0.1".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            pass: String::new(),
            name: "v_chat".to_string(),
            max_connections: 10,
            operation_timeout: Duration::from_millis(5000),
        }
    }
}

/// 离线清理配置 / Reaper configuration
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    pub interval: Duration,
    pub stale_threshold: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(15_000),
            stale_threshold: Duration::from_millis(10_000),
        }
    }
}

/// 消息可见性配置 / Message visibility configuration
#[derive(Debug, Clone, Default)]
pub struct VisibilityConfig {
    /// 为 true 时所有 `message` 类型消息对任何人可见
    /// When true every `message`-typed record is visible to everyone
    pub public_type_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

/// 日志配置 / Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// 完整服务配置 / Full service configuration
#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub reaper: ReaperConfig,
    pub visibility: VisibilityConfig,
    pub logging: LoggingConfig,
}

fn millis(cm: &ConfigManager, key: &str, default: Duration) -> Result<Duration, ConfigError> {
    let ms: Option<u64> = cm.get_optional(key)?;
    let value = ms.map(Duration::from_millis).unwrap_or(default);
    if value.is_zero() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

impl ChatConfig {
    /// 从配置管理器加载并校验 / Load from the manager and validate
    pub fn load(cm: &ConfigManager) -> Result<Self, ConfigError> {
        let defaults = ChatConfig::default();

        let server = ServerConfig {
            host: cm
                .get_optional("server.host")?
                .unwrap_or(defaults.server.host),
            port: cm
                .get_optional("server.port")?
                .unwrap_or(defaults.server.port),
            workers: cm.get_optional("server.workers")?,
        };

        let backend = match cm.get_optional::<String>("store.backend")? {
            Some(raw) => raw
                .parse::<StoreBackend>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: "store.backend".to_string(),
                    message,
                })?,
            None => defaults.store.backend,
        };
        let store = StoreConfig {
            backend,
            url: cm.get_optional("store.url")?,
            host: cm.get_optional("store.host")?.unwrap_or(defaults.store.host),
            port: cm.get_optional("store.port")?.unwrap_or(defaults.store.port),
            user: cm.get_optional("store.user")?.unwrap_or(defaults.store.user),
            pass: cm.get_optional("store.pass")?.unwrap_or(defaults.store.pass),
            name: cm.get_optional("store.name")?.unwrap_or(defaults.store.name),
            max_connections: cm
                .get_optional("store.max_connections")?
                .unwrap_or(defaults.store.max_connections),
            operation_timeout: millis(
                cm,
                "store.operation_timeout_ms",
                defaults.store.operation_timeout,
            )?,
        };
        if store.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "store.max_connections".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let reaper = ReaperConfig {
            interval: millis(cm, "reaper.interval_ms", defaults.reaper.interval)?,
            stale_threshold: millis(
                cm,
                "reaper.stale_threshold_ms",
                defaults.reaper.stale_threshold,
            )?,
        };

        let visibility = VisibilityConfig {
            public_type_visible: cm
                .get_optional("visibility.public_type_visible")?
                .unwrap_or(defaults.visibility.public_type_visible),
        };

        let format = match cm.get_optional::<String>("logging.format")?.as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "logging.format".to_string(),
                    message: format!("expected compact or json, got {}", other),
                })
            }
        };
        let logging = LoggingConfig {
            level: cm
                .get_optional("logging.level")?
                .unwrap_or(defaults.logging.level),
            format,
        };

        Ok(Self {
            server,
            store,
            reaper,
            visibility,
            logging,
        })
    }

    /// 配置摘要（不含密码）/ One-line summary without secrets
    pub fn summary(&self) -> String {
        format!(
            "listen={}:{} store={:?} op_timeout={}ms reaper(interval={}ms, stale={}ms) public_type_visible={}",
            self.server.host,
            self.server.port,
            self.store.backend,
            self.store.operation_timeout.as_millis(),
            self.reaper.interval.as_millis(),
            self.reaper.stale_threshold.as_millis(),
            self.visibility.public_type_visible
        )
    }
}
