//! # 基础设施组合层
//!
//! 这个 crate 是 Lorn IoC 容器的组合层，负责把配置、日志、组件扫描器和
//! 依赖注入容器组合成一个可以直接启动的应用上下文。
//!
//! ## 主要功能
//!
//! - **启动构建器**: 使用构建者模式组装配置、日志与扫描器
//! - **配置加载**: 从 TOML 文件与环境变量加载容器配置
//! - **组件扫描发现**: 基于组件清单或显式组件表按命名空间发现组件
//! - **启动编排**: 注册、验证并实例化所有组件
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::ContainerBootstrapBuilder;
//!
//! struct App;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ContainerBootstrapBuilder::new()
//!         .scan_inventory()
//!         .bootstrap::<App>()
//!         .await?;
//!
//!     println!("已启动 {} 个组件", context.report().materialized);
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod component_scanner;
pub mod config_sources;

// 重新导出主要类型
pub use bootstrapper::{ApplicationContext, BootstrapReport, ComponentBootstrapper};
pub use builder::{ContainerBootstrapBuilder, LoggingConfig};
pub use component_scanner::{InventoryComponentScanner, StaticComponentScanner};
pub use config_sources::{ContainerSettings, LoggingSettings};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;

use infrastructure_common::InfrastructureResult;

/// 使用默认配置源和全局组件清单启动应用
///
/// 配置从 `config/ioc.toml`（可选）与 `LORN_IOC__*` 环境变量加载，
/// 根命名空间为 `Root` 所在的模块。
pub async fn bootstrap<Root: ?Sized + 'static>() -> InfrastructureResult<ApplicationContext> {
    let settings = ContainerSettings::load()?;
    ContainerBootstrapBuilder::new()
        .with_settings(&settings)?
        .scan_inventory()
        .bootstrap::<Root>()
        .await
}
