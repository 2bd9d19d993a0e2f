//! 容器启动构建器

use crate::bootstrapper::{ApplicationContext, ComponentBootstrapper};
use crate::component_scanner::{InventoryComponentScanner, StaticComponentScanner};
use crate::config_sources::ContainerSettings;
use di_abstractions::{ComponentScanner, ContainerConfig};
use infrastructure_common::{DescriptorFactory, InfrastructureError, InfrastructureResult};
use std::path::Path;
use tracing::{debug, info};

/// 容器启动构建器
///
/// 使用建造者模式组装配置、日志和组件扫描器
pub struct ContainerBootstrapBuilder {
    /// 组件扫描器列表
    component_scanners: Vec<Box<dyn ComponentScanner>>,
    /// 容器配置
    container_config: ContainerConfig,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ContainerBootstrapBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            component_scanners: Vec::new(),
            container_config: ContainerConfig::default(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 应用已加载的配置
    pub fn with_settings(mut self, settings: &ContainerSettings) -> InfrastructureResult<Self> {
        self.container_config = settings.container.clone();
        if settings.logging.enabled {
            let logging = settings.logging.to_logging_config()?;
            self = self.with_logging(logging);
        }
        Ok(self)
    }

    /// 从 TOML 配置文件加载配置
    pub fn add_config_toml<P: AsRef<Path>>(self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        info!("添加 TOML 配置文件: {}", path.display());
        let settings = ContainerSettings::from_file(path)?;
        self.with_settings(&settings)
    }

    /// 设置容器配置
    pub fn with_container_config(mut self, config: ContainerConfig) -> Self {
        self.container_config = config;
        self
    }

    /// 添加组件扫描器
    pub fn add_component_scanner<T: ComponentScanner + 'static>(mut self, scanner: T) -> Self {
        debug!("添加组件扫描器: {}", scanner.name());
        self.component_scanners.push(Box::new(scanner));
        self
    }

    /// 扫描全局组件清单
    pub fn scan_inventory(self) -> Self {
        self.add_component_scanner(InventoryComponentScanner::new())
    }

    /// 扫描显式给出的组件表
    pub fn with_components(self, factories: impl IntoIterator<Item = DescriptorFactory>) -> Self {
        self.add_component_scanner(StaticComponentScanner::from_factories(factories))
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建启动器
    pub fn build(self) -> InfrastructureResult<ComponentBootstrapper> {
        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        if self.component_scanners.is_empty() {
            return Err(InfrastructureError::BootstrapFailed {
                message: "未配置组件扫描器".to_string(),
            });
        }

        info!(
            "构建组件启动器: {} 个扫描器",
            self.component_scanners.len()
        );
        Ok(ComponentBootstrapper::new(
            self.component_scanners,
            self.container_config,
        ))
    }

    /// 构建启动器并以 `Root` 所在模块为根命名空间启动
    pub async fn bootstrap<Root: ?Sized + 'static>(self) -> InfrastructureResult<ApplicationContext> {
        self.build()?.bootstrap::<Root>().await
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> InfrastructureResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for ContainerBootstrapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
