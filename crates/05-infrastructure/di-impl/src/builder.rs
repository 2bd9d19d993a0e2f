//! 容器构建器

use crate::container::DiContainerImpl;
use crate::lifecycle::PostConstructInvoker;
use crate::registry::BindingRegistryImpl;
use di_abstractions::{BindingRegistry, ContainerConfig, LifecycleInvoker};
use infrastructure_common::{ComponentDefinition, DependencyResult, TypeDescriptor};
use std::sync::Arc;
use tracing::info;

/// 容器构建器
///
/// 收集组件描述符，构建时一次性生成绑定注册表。
pub struct DiContainerBuilder {
    descriptors: Vec<TypeDescriptor>,
    config: ContainerConfig,
    invoker: Arc<dyn LifecycleInvoker>,
}

impl DiContainerBuilder {
    /// 创建构建器
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            config: ContainerConfig::default(),
            invoker: Arc::new(PostConstructInvoker),
        }
    }

    /// 设置容器配置
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置初始化回调执行器
    pub fn with_lifecycle_invoker(mut self, invoker: Arc<dyn LifecycleInvoker>) -> Self {
        self.invoker = invoker;
        self
    }

    /// 添加组件描述符
    pub fn register(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// 添加实现了 [`ComponentDefinition`] 的组件
    pub fn register_component<C: ComponentDefinition>(self) -> Self {
        self.register(C::descriptor())
    }

    /// 添加多个组件描述符
    pub fn register_all(mut self, descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// 构建容器
    pub fn build(self) -> DependencyResult<DiContainerImpl> {
        let registry = BindingRegistryImpl::from_descriptors(self.descriptors)?;
        info!("构建容器完成，注册了 {} 个组件", registry.len());
        Ok(DiContainerImpl::with_invoker(
            Arc::new(registry),
            self.invoker,
            self.config,
        ))
    }
}

impl Default for DiContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
