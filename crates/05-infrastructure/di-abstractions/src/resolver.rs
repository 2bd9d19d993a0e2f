//! 组件解析器抽象接口
//!
//! 提供依赖解析和组件实例化的能力

use crate::container::CyclePolicy;
use infrastructure_common::{
    DependencyError, DependencyResult, Instance, Resolved, ResolutionHint, TypeInfo,
};
use std::sync::Arc;

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例。每个具体类型最多创建一个实例。
pub trait ComponentResolver: Send + Sync {
    /// 实例化请求的类型（具体类型或契约），返回具体实例
    fn materialize(&self, requested: &TypeInfo, hint: &ResolutionHint)
        -> DependencyResult<Instance>;

    /// 实例化并投影为请求的类型视图（内部为 `Arc<T>`）
    fn resolve_view(&self, requested: &TypeInfo, hint: &ResolutionHint)
        -> DependencyResult<Resolved>;

    /// 检查具体类型是否已有实例
    fn is_materialized(&self, concrete: &TypeInfo) -> bool;
}

/// 类型化的解析接口
pub trait TypedComponentResolver: ComponentResolver {
    /// 解析组件，`T` 可以是具体类型或 `dyn Contract`
    fn resolve<T>(&self) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        downcast_view::<T>(self.resolve_view(&TypeInfo::of::<T>(), &ResolutionHint::none())?)
    }

    /// 使用限定符解析组件
    fn resolve_qualified<T>(&self, qualifier: &str) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        downcast_view::<T>(
            self.resolve_view(&TypeInfo::of::<T>(), &ResolutionHint::qualified(qualifier))?,
        )
    }
}

impl<R: ComponentResolver + ?Sized> TypedComponentResolver for R {}

fn downcast_view<T>(view: Resolved) -> DependencyResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    view.downcast::<Arc<T>>()
        .map(|value| *value)
        .map_err(|_| DependencyError::TypeMismatch {
            expected: std::any::type_name::<Arc<T>>().to_string(),
            actual: "Resolved".to_string(),
        })
}

/// 解析上下文
///
/// 每次顶层解析创建一个，记录当前解析链（用于循环依赖检测）以及本次创建的实例
/// （用于失败时回滚）。
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<TypeInfo>,
    /// 本次解析中新创建的实例类型
    pub created: Vec<TypeInfo>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            created: Vec::new(),
            options,
        }
    }

    /// 类型是否已在解析链中
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.resolution_chain.contains(type_info)
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, type_info: TypeInfo) -> DependencyResult<()> {
        if self.contains(&type_info) {
            return Err(DependencyError::CyclicDependency {
                dependency_chain: self.describe_chain(&type_info),
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: type_info.type_name.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(type_info);
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 记录新创建的实例
    pub fn record_created(&mut self, type_info: TypeInfo) {
        self.created.push(type_info);
    }

    /// 以 `A -> B -> A` 的形式描述解析链
    pub fn describe_chain(&self, next: &TypeInfo) -> String {
        self.resolution_chain
            .iter()
            .chain(std::iter::once(next))
            .map(TypeInfo::short_name)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// 解析选项
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
    /// 循环依赖处理策略
    pub cycle_policy: CyclePolicy,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            max_depth: 100,
            cycle_policy: CyclePolicy::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn test_push_type_detects_cycle() {
        let mut context = ResolveContext::new(ResolveOptions::default());
        context.push_type(TypeInfo::of::<A>()).unwrap();
        context.push_type(TypeInfo::of::<B>()).unwrap();

        match context.push_type(TypeInfo::of::<A>()) {
            Err(DependencyError::CyclicDependency { dependency_chain }) => {
                assert_eq!(dependency_chain, "A -> B -> A");
            }
            other => panic!("期望循环依赖错误, 实际: {:?}", other),
        }

        context.pop_type();
        assert_eq!(context.depth(), 1);
    }

    #[test]
    fn test_push_type_enforces_max_depth() {
        let mut context = ResolveContext::new(ResolveOptions {
            max_depth: 1,
            ..ResolveOptions::default()
        });
        context.push_type(TypeInfo::of::<A>()).unwrap();

        assert!(matches!(
            context.push_type(TypeInfo::of::<B>()),
            Err(DependencyError::ResolutionDepthExceeded { max_depth: 1, .. })
        ));
    }
}
