//! 容器配置加载
//!
//! 使用 `config` crate 从可选的 TOML 文件和带前缀的环境变量加载容器配置。
//! 环境变量使用双下划线分隔层级，例如
//! `LORN_IOC__CONTAINER__MAX_RESOLUTION_DEPTH=50`。

use crate::builder::LoggingConfig;
use di_abstractions::ContainerConfig;
use infrastructure_common::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, error};

/// 默认环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "LORN_IOC";

/// 默认配置文件（不含扩展名，可以不存在）
pub const DEFAULT_CONFIG_FILE: &str = "config/ioc";

/// 日志配置节
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 是否初始化日志系统
    pub enabled: bool,
    /// 日志级别
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingSettings {
    /// 转换为日志配置
    pub fn to_logging_config(&self) -> ConfigResult<LoggingConfig> {
        let level =
            tracing::Level::from_str(&self.level).map_err(|_| ConfigError::ValidationError {
                message: format!("无效的日志级别: {}", self.level),
            })?;

        let preset = if self.json {
            LoggingConfig::production()
        } else {
            LoggingConfig::default()
        };
        Ok(LoggingConfig { level, ..preset })
    }
}

/// 容器启动配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 容器配置节
    pub container: ContainerConfig,
    /// 日志配置节
    pub logging: LoggingSettings,
}

impl ContainerSettings {
    /// 从默认配置文件和默认前缀的环境变量加载
    pub fn load() -> ConfigResult<Self> {
        Self::from_sources(Some(Path::new(DEFAULT_CONFIG_FILE)), false, DEFAULT_ENV_PREFIX)
    }

    /// 从指定的 TOML 文件和默认前缀的环境变量加载，文件必须存在
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::from_sources(Some(path), true, DEFAULT_ENV_PREFIX)
    }

    /// 从任意来源组合加载
    ///
    /// 环境变量优先于文件中的值。
    pub fn from_sources(
        file: Option<&Path>,
        file_required: bool,
        env_prefix: &str,
    ) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            debug!("加载容器配置文件: {}", path.display());
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(file_required),
            );
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("容器配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let settings: Self = settings.try_deserialize().map_err(|e| {
            error!("容器配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        settings.validate()?;
        debug!("容器配置加载完成: {:?}", settings);
        Ok(settings)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.container.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "container.max_resolution_depth 必须大于 0".to_string(),
            });
        }
        self.logging.to_logging_config().map(|_| ())
    }
}
