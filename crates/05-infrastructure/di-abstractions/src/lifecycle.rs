//! 生命周期回调抽象接口

use infrastructure_common::{DependencyResult, Instance, TypeDescriptor};

/// 生命周期回调执行器 trait
pub trait LifecycleInvoker: Send + Sync {
    /// 按声明顺序执行实例的所有初始化回调
    ///
    /// 调用方保证实例的所有依赖（包括字段注入的依赖）都已完成各自的回调。
    fn run_post_construct(
        &self,
        descriptor: &TypeDescriptor,
        instance: &Instance,
    ) -> DependencyResult<()>;
}
