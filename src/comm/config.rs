use anyhow::{anyhow, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::de::DeserializeOwned;

/// 环境变量前缀 / Environment variable prefix
pub const ENV_PREFIX: &str = "VCHAT";

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置项 '{key}' 不存在")]
    KeyNotFound { key: String },
    #[error("配置项 '{key}' 类型转换失败: {message}")]
    TypeConversionError { key: String, message: String },
    #[error("配置项 '{key}' 取值无效: {message}")]
    InvalidValue { key: String, message: String },
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },
}

/// 配置数据源信息
#[derive(Debug, Clone)]
pub struct ConfigSourceInfo {
    pub source_type: String,
    pub description: String,
    pub priority: u8,
    pub loaded: bool,
}

/// 配置管理器
///
/// 配置源按优先级从低到高叠加，后添加者优先生效：
/// `config/default.toml` -> `config/local.toml` -> 额外配置源 -> 环境变量 `VCHAT_*`
pub struct ConfigManager {
    config: Config,
    sources_info: Vec<ConfigSourceInfo>,
}

impl ConfigManager {
    /// 默认配置源之上叠加指定配置源（环境变量始终最高优先级）
    pub fn with_sources(sources: Vec<ConfigSource>) -> Result<Self> {
        let mut all = vec![
            ConfigSource::File {
                path: "config/default.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::File {
                path: "config/local.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
        ];
        all.extend(sources);
        all.push(ConfigSource::Env {
            prefix: ENV_PREFIX.to_string(),
            separator: "__",
        });
        Self::isolated(all)
    }

    /// 仅使用给定配置源（不含默认文件与环境变量），便于测试
    pub fn isolated(sources: Vec<ConfigSource>) -> Result<Self> {
        let mut builder = Config::builder();
        let mut sources_info = Vec::new();

        for (index, source) in sources.into_iter().enumerate() {
            let info = source.get_source_info(index as u8 + 1);

            // 可选文件不存在时跳过并记录
            if let ConfigSource::File { path, required, .. } = &source {
                let file_exists = std::path::Path::new(path).exists();
                if !file_exists && *required {
                    return Err(anyhow!("必需的配置文件不存在: {}", path));
                }
                if !file_exists {
                    sources_info.push(info);
                    continue;
                }
            }

            builder = source
                .add_to_builder(builder)
                .map_err(|e| anyhow!("添加配置源失败: {}", e))?;
            sources_info.push(ConfigSourceInfo {
                loaded: true,
                ..info
            });
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("构建配置失败: {}", e))?;
        Ok(Self {
            config,
            sources_info,
        })
    }

    /// 安全获取配置值，区分缺失与类型错误
    pub fn get_safe<T: DeserializeOwned>(&self, key: &str) -> std::result::Result<T, ConfigError> {
        self.config.get(key).map_err(|e| match e {
            config::ConfigError::NotFound(_) => ConfigError::KeyNotFound {
                key: key.to_string(),
            },
            other => ConfigError::TypeConversionError {
                key: key.to_string(),
                message: other.to_string(),
            },
        })
    }

    /// 可选配置项：缺失返回 None，类型错误返回错误
    pub fn get_optional<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> std::result::Result<Option<T>, ConfigError> {
        match self.get_safe(key) {
            Ok(v) => Ok(Some(v)),
            Err(ConfigError::KeyNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 输出配置源加载情况
    pub fn log_sources_info(&self) {
        for info in &self.sources_info {
            tracing::info!(
                "配置源 / config source #{} {} [{}]: {}",
                info.priority,
                info.source_type,
                if info.loaded { "loaded" } else { "skipped" },
                info.description
            );
        }
    }
}

/// 配置源类型
pub enum ConfigSource {
    /// 文件配置源
    File {
        path: String,
        format: Option<FileFormat>,
        required: bool,
    },
    /// 环境变量配置源
    Env {
        prefix: String,
        separator: &'static str,
    },
    /// 字符串配置源
    String { content: String, format: FileFormat },
}

impl ConfigSource {
    /// 命令行指定的配置文件，格式按扩展名自动识别
    pub fn required_file<P: Into<String>>(path: P) -> Self {
        ConfigSource::File {
            path: path.into(),
            format: None,
            required: true,
        }
    }

    /// 获取配置源信息
    pub fn get_source_info(&self, priority: u8) -> ConfigSourceInfo {
        let (source_type, description) = match self {
            ConfigSource::File { path, required, .. } => (
                "File",
                format!("文件配置源: {} (必需: {})", path, required),
            ),
            ConfigSource::Env { prefix, separator } => (
                "Environment",
                format!("环境变量配置源: 前缀={}, 分隔符={}", prefix, separator),
            ),
            ConfigSource::String { .. } => ("String", "字符串配置源".to_string()),
        };
        ConfigSourceInfo {
            source_type: source_type.to_string(),
            description,
            priority,
            loaded: false,
        }
    }

    pub fn add_to_builder(
        self,
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        match self {
            ConfigSource::File {
                path,
                format,
                required,
            } => {
                let file_source = match format {
                    Some(format) => File::with_name(&path).format(format),
                    None => File::with_name(&path),
                };
                Ok(builder.add_source(file_source.required(required)))
            }
            ConfigSource::Env { prefix, separator } => Ok(builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator(separator)
                    .prefix_separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )),
            ConfigSource::String { content, format } => {
                Ok(builder.add_source(File::from_str(&content, format)))
            }
        }
    }
}
