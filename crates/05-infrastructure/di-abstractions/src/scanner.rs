//! 组件扫描器抽象接口
//!
//! 提供按命名空间发现组件的能力

use async_trait::async_trait;
use infrastructure_common::{ComponentResult, TypeDescriptor};

/// 组件扫描器 trait
///
/// 返回位于根命名空间（或其子命名空间）之下的组件描述符集合，顺序没有意义。
#[async_trait]
pub trait ComponentScanner: Send + Sync {
    /// 扫描指定命名空间中的组件
    async fn discover_components(
        &self,
        root_namespace: &str,
    ) -> ComponentResult<Vec<TypeDescriptor>>;

    /// 获取扫描器名称
    fn name(&self) -> &str;

    /// 检查是否支持指定的根命名空间
    fn supports(&self, root_namespace: &str) -> bool {
        !root_namespace.trim().is_empty()
    }
}
