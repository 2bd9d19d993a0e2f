//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn IoC 容器的公共类型。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] - 组件与契约的类型标识
//! - [`TypeDescriptor`] - 容器使用的组件描述符
//! - [`Autowired`] - 字段注入槽
//! - [`ComponentDefinition`] - 可被扫描发现的组件
//! - [`DependencyError`] - 依赖注入错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 组件以显式描述符代替运行时反射
//! - 所有失败都以类型化错误返回

pub mod component;
pub mod discovery;
pub mod errors;
pub mod metadata;

pub use component::*;
pub use discovery::*;
pub use errors::*;
pub use metadata::*;
