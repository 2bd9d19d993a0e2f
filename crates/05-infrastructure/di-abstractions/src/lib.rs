//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`BindingRegistry`] - 契约到实现的绑定注册表
//! - [`ComponentResolver`] - 组件解析器接口
//! - [`LifecycleInvoker`] - 初始化回调执行器
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`DiContainer`] - 依赖注入容器接口

pub mod container;
pub mod lifecycle;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use container::*;
pub use lifecycle::*;
pub use registry::*;
pub use resolver::*;
pub use scanner::*;
