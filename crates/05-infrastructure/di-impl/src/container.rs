//! 依赖注入容器实现

use crate::cache::InstanceCache;
use crate::injector::Injector;
use crate::lifecycle::PostConstructInvoker;
use di_abstractions::{
    BindingRegistry, ComponentResolver, ContainerConfig, ContainerStats, DiContainer,
    LifecycleInvoker, ResolveContext,
};
use infrastructure_common::{
    DependencyError, DependencyResult, Instance, Resolved, ResolutionHint, TypeInfo,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 具体的依赖注入容器实现
///
/// 注册表在构建时确定，之后只读；实例缓存是唯一在运行期变化的状态。
pub struct DiContainerImpl {
    /// 绑定注册表
    registry: Arc<dyn BindingRegistry>,
    /// 单例缓存
    cache: InstanceCache,
    /// 初始化回调执行器
    invoker: Arc<dyn LifecycleInvoker>,
    /// 容器配置
    config: ContainerConfig,
    resolutions: AtomicUsize,
    resolution_errors: AtomicUsize,
}

impl DiContainerImpl {
    /// 使用已构建的注册表创建容器
    pub fn new(registry: impl BindingRegistry + 'static, config: ContainerConfig) -> Self {
        Self::with_invoker(Arc::new(registry), Arc::new(PostConstructInvoker), config)
    }

    /// 使用自定义的回调执行器创建容器
    pub fn with_invoker(
        registry: Arc<dyn BindingRegistry>,
        invoker: Arc<dyn LifecycleInvoker>,
        config: ContainerConfig,
    ) -> Self {
        info!(
            "创建依赖注入容器: {} 个组件, 循环策略 {:?}",
            registry.len(),
            config.cycle_policy
        );
        Self {
            registry,
            cache: InstanceCache::new(),
            invoker,
            config,
            resolutions: AtomicUsize::new(0),
            resolution_errors: AtomicUsize::new(0),
        }
    }

    /// 绑定注册表
    pub fn registry(&self) -> &dyn BindingRegistry {
        self.registry.as_ref()
    }

    /// 顶层解析
    ///
    /// 整个过程持有缓存锁；失败时移除本次解析创建的全部实例。
    fn materialize_typed(
        &self,
        requested: &TypeInfo,
        hint: &ResolutionHint,
    ) -> DependencyResult<(TypeInfo, Instance)> {
        let guard = self.cache.lock();
        let mut context = ResolveContext::new(self.config.resolve_options());
        let injector = Injector::new(self.registry.as_ref(), &guard, self.invoker.as_ref());

        self.resolutions.fetch_add(1, Ordering::Relaxed);
        let result = injector.materialize(&mut context, requested, hint);

        if let Err(error) = &result {
            for created in context.created.iter().rev() {
                guard.evict(created);
            }
            self.resolution_errors.fetch_add(1, Ordering::Relaxed);
            warn!(
                "组件解析失败: {}, 原因: {}, 已回滚 {} 个实例",
                requested,
                error,
                context.created.len()
            );
        } else if !context.created.is_empty() {
            debug!(
                "组件解析完成: {}, 新建 {} 个实例",
                requested,
                context.created.len()
            );
        }

        result
    }
}

impl ComponentResolver for DiContainerImpl {
    fn materialize(
        &self,
        requested: &TypeInfo,
        hint: &ResolutionHint,
    ) -> DependencyResult<Instance> {
        self.materialize_typed(requested, hint)
            .map(|(_, instance)| instance)
    }

    fn resolve_view(
        &self,
        requested: &TypeInfo,
        hint: &ResolutionHint,
    ) -> DependencyResult<Resolved> {
        let (concrete, instance) = self.materialize_typed(requested, hint)?;
        self.registry.project(requested, &concrete, instance)
    }

    fn is_materialized(&self, concrete: &TypeInfo) -> bool {
        self.cache.contains(concrete)
    }
}

impl DiContainer for DiContainerImpl {
    fn materialize_all(&self) -> DependencyResult<usize> {
        let components = self.registered_components();
        for type_info in &components {
            self.materialize(type_info, &ResolutionHint::none())?;
        }
        info!("所有组件实例化完成: {} 个", components.len());
        Ok(components.len())
    }

    fn validate(&self) -> Result<(), Vec<DependencyError>> {
        let mut errors = Vec::new();

        for descriptor in self.registry.descriptors() {
            let type_name = descriptor.type_info().type_name;

            if descriptor.injectable_constructors().is_empty()
                && !descriptor.has_default_constructor()
            {
                errors.push(DependencyError::InstantiationFailure {
                    type_name: type_name.to_string(),
                    source: "既没有可注入构造函数，也没有默认构造函数".into(),
                });
            }

            for point in descriptor.injection_points() {
                if let Err(error) = self
                    .registry
                    .resolve_implementation(&point.type_info, &point.hint())
                {
                    debug!("依赖验证失败: {}.{}: {}", type_name, point.name, error);
                    errors.push(error);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            warn!("依赖关系验证发现 {} 个问题", errors.len());
            Err(errors)
        }
    }

    fn registered_components(&self) -> Vec<TypeInfo> {
        self.registry
            .descriptors()
            .into_iter()
            .map(|descriptor| *descriptor.type_info())
            .collect()
    }

    fn config(&self) -> &ContainerConfig {
        &self.config
    }

    fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_components: self.registry.len(),
            active_singletons: self.cache.len(),
            resolutions: self.resolutions.load(Ordering::Relaxed),
            resolution_errors: self.resolution_errors.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
