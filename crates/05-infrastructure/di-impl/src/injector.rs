//! 递归依赖注入
//!
//! 在持有缓存锁的前提下，按深度优先顺序构造依赖图：先构造实例并写入缓存，
//! 再注入字段，最后执行初始化回调。

use crate::cache::CacheGuard;
use di_abstractions::{BindingRegistry, CyclePolicy, LifecycleInvoker, ResolveContext};
use infrastructure_common::{
    BoxError, Dependencies, DependencyError, DependencyResult, Instance, InjectionPoint, Resolved,
    ResolutionHint, TypeDescriptor, TypeInfo,
};
use tracing::debug;

/// 依赖的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Site {
    Root,
    Parameter,
    Field,
}

pub(crate) struct Injector<'a, 'g> {
    registry: &'a dyn BindingRegistry,
    cache: &'a CacheGuard<'g>,
    invoker: &'a dyn LifecycleInvoker,
}

impl<'a, 'g> Injector<'a, 'g> {
    pub(crate) fn new(
        registry: &'a dyn BindingRegistry,
        cache: &'a CacheGuard<'g>,
        invoker: &'a dyn LifecycleInvoker,
    ) -> Self {
        Self {
            registry,
            cache,
            invoker,
        }
    }

    /// 顶层解析，返回具体类型与实例
    pub(crate) fn materialize(
        &self,
        context: &mut ResolveContext,
        requested: &TypeInfo,
        hint: &ResolutionHint,
    ) -> DependencyResult<(TypeInfo, Instance)> {
        self.materialize_at(context, requested, hint, Site::Root)
    }

    fn materialize_at(
        &self,
        context: &mut ResolveContext,
        requested: &TypeInfo,
        hint: &ResolutionHint,
        site: Site,
    ) -> DependencyResult<(TypeInfo, Instance)> {
        let concrete = self.registry.resolve_implementation(requested, hint)?;

        if context.contains(&concrete) {
            // 只有已构造完成、正在注入字段的实例才能通过字段注入交出去
            if context.options.cycle_policy == CyclePolicy::AllowFieldCycles
                && site == Site::Field
            {
                if let Some(partial) = self.cache.get(&concrete) {
                    debug!("循环依赖经字段注入闭合: {}", context.describe_chain(&concrete));
                    return Ok((concrete, partial));
                }
            }
            return Err(DependencyError::CyclicDependency {
                dependency_chain: context.describe_chain(&concrete),
            });
        }

        if let Some(instance) = self.cache.get(&concrete) {
            return Ok((concrete, instance));
        }

        let descriptor =
            self.registry
                .descriptor(&concrete)
                .ok_or_else(|| DependencyError::NoImplementationFound {
                    contract: concrete.type_name.to_string(),
                })?;

        context.push_type(concrete)?;
        let created = self.create(context, descriptor);
        context.pop_type();

        created.map(|instance| (concrete, instance))
    }

    fn resolve_point(
        &self,
        context: &mut ResolveContext,
        point: &InjectionPoint,
        site: Site,
    ) -> DependencyResult<Resolved> {
        let (concrete, instance) =
            self.materialize_at(context, &point.type_info, &point.hint(), site)?;
        self.registry.project(&point.type_info, &concrete, instance)
    }

    fn create(
        &self,
        context: &mut ResolveContext,
        descriptor: &TypeDescriptor,
    ) -> DependencyResult<Instance> {
        let type_info = *descriptor.type_info();

        let instance = self.construct(context, descriptor)?;
        self.cache.insert(type_info, instance.clone());
        context.record_created(type_info);
        debug!("组件已构造: {}", type_info);

        for field in descriptor.injectable_fields() {
            let value = self.resolve_point(context, &field.point, Site::Field)?;
            field.inject(&*instance, value).map_err(|source| {
                DependencyError::FieldInjectionFailure {
                    type_name: type_info.type_name.to_string(),
                    field: field.point.name.clone(),
                    source,
                }
            })?;
            debug!("字段注入完成: {}.{}", descriptor.short_name(), field.point.name);
        }

        self.invoker.run_post_construct(descriptor, &instance)?;
        Ok(instance)
    }

    fn construct(
        &self,
        context: &mut ResolveContext,
        descriptor: &TypeDescriptor,
    ) -> DependencyResult<Instance> {
        let type_info = *descriptor.type_info();
        let instantiation_failure = |source: BoxError| DependencyError::InstantiationFailure {
            type_name: type_info.type_name.to_string(),
            source,
        };

        let constructors = descriptor.injectable_constructors();
        match constructors {
            [] => match descriptor.construct_default() {
                Some(result) => result.map_err(instantiation_failure),
                None => Err(instantiation_failure(
                    "既没有可注入构造函数，也没有默认构造函数".into(),
                )),
            },
            [constructor] => {
                let mut values = Vec::with_capacity(constructor.parameters.len());
                for parameter in &constructor.parameters {
                    let value = self.resolve_point(context, parameter, Site::Parameter)?;
                    values.push((parameter.type_info, value));
                }
                debug!(
                    "调用可注入构造函数: {}::{} ({} 个参数)",
                    descriptor.short_name(),
                    constructor.name,
                    values.len()
                );
                let mut dependencies = Dependencies::new(type_info, values);
                constructor
                    .invoke(&mut dependencies)
                    .map_err(instantiation_failure)
            }
            _ => Err(DependencyError::MultipleInjectableConstructors {
                type_name: type_info.type_name.to_string(),
                count: constructors.len(),
            }),
        }
    }
}
