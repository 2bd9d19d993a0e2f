//! # 依赖注入具体实现
//!
//! 提供具体的绑定注册表、单例缓存、递归注入器和依赖注入容器实现

mod injector;

pub mod builder;
pub mod cache;
pub mod container;
pub mod lifecycle;
pub mod registry;

pub use builder::DiContainerBuilder;
pub use cache::{CacheGuard, InstanceCache};
pub use container::DiContainerImpl;
pub use lifecycle::PostConstructInvoker;
pub use registry::BindingRegistryImpl;
