//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::resolver::{ComponentResolver, ResolveOptions};
use infrastructure_common::{DependencyError, DependencyResult, TypeInfo};
use serde::Deserialize;

/// 依赖注入容器 trait
///
/// 在组件解析之上提供批量实例化、依赖验证和统计能力
pub trait DiContainer: ComponentResolver {
    /// 实例化所有已注册组件，返回组件数量
    ///
    /// 组件之间的实例化顺序只受依赖关系约束，其余顺序不作保证。
    fn materialize_all(&self) -> DependencyResult<usize>;

    /// 验证所有声明的依赖都能解析到唯一实现
    ///
    /// 不创建任何实例，收集全部问题后一起返回。
    fn validate(&self) -> Result<(), Vec<DependencyError>>;

    /// 获取已注册的组件类型
    fn registered_components(&self) -> Vec<TypeInfo>;

    /// 获取容器配置
    fn config(&self) -> &ContainerConfig;

    /// 获取容器统计信息
    fn stats(&self) -> ContainerStats;
}

/// 循环依赖处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// 检测到循环依赖即失败
    #[default]
    Fail,
    /// 允许通过字段注入闭合的循环，注入尚未完成初始化的实例；
    /// 经过构造函数的循环仍然失败
    AllowFieldCycles,
}

/// 容器配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 循环依赖处理策略
    pub cycle_policy: CyclePolicy,
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 启动时是否先验证依赖关系
    pub eager_validation: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            cycle_policy: CyclePolicy::Fail,
            max_resolution_depth: 100,
            eager_validation: true,
        }
    }
}

impl ContainerConfig {
    /// 转换为解析选项
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.max_resolution_depth,
            cycle_policy: self.cycle_policy,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已注册组件数量
    pub registered_components: usize,
    /// 活跃单例数量
    pub active_singletons: usize,
    /// 已处理的顶层解析请求数量
    pub resolutions: usize,
    /// 解析错误数量
    pub resolution_errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ContainerConfig::default();
        assert_eq!(config.cycle_policy, CyclePolicy::Fail);
        assert_eq!(config.max_resolution_depth, 100);
        assert!(config.eager_validation);

        let options = config.resolve_options();
        assert_eq!(options.max_depth, 100);
        assert_eq!(options.cycle_policy, CyclePolicy::Fail);
    }
}
