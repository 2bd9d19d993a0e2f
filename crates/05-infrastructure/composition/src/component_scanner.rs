//! 组件扫描和发现功能
//!
//! 提供按命名空间发现组件描述符的扫描器实现

use async_trait::async_trait;
use di_abstractions::ComponentScanner;
use infrastructure_common::{
    components_within, ComponentDefinition, ComponentError, ComponentResult, DescriptorFactory,
    TypeDescriptor, TypeInfo,
};
use std::collections::HashSet;
use tracing::debug;

fn ensure_root(root_namespace: &str) -> ComponentResult<()> {
    if root_namespace.trim().is_empty() {
        return Err(ComponentError::discovery_failure(
            root_namespace,
            "根命名空间不能为空",
        ));
    }
    Ok(())
}

/// 按类型去重，保留第一次出现的描述符
fn deduplicate(descriptors: impl IntoIterator<Item = TypeDescriptor>) -> Vec<TypeDescriptor> {
    let mut seen = HashSet::new();
    descriptors
        .into_iter()
        .filter(|descriptor| seen.insert(*descriptor.type_info()))
        .collect()
}

/// 基于全局组件清单的扫描器
///
/// 清单由 `#[derive(Component)]` 在进程启动时填充。
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryComponentScanner;

impl InventoryComponentScanner {
    /// 创建扫描器
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ComponentScanner for InventoryComponentScanner {
    async fn discover_components(
        &self,
        root_namespace: &str,
    ) -> ComponentResult<Vec<TypeDescriptor>> {
        ensure_root(root_namespace)?;
        let descriptors = deduplicate(components_within(root_namespace));
        debug!(
            "组件清单扫描完成: {} -> {} 个组件",
            root_namespace,
            descriptors.len()
        );
        Ok(descriptors)
    }

    fn name(&self) -> &str {
        "InventoryComponentScanner"
    }
}

/// 基于显式组件表的扫描器
///
/// 适用于不希望依赖进程启动期注册的场景。
#[derive(Debug, Default, Clone)]
pub struct StaticComponentScanner {
    factories: Vec<(TypeInfo, DescriptorFactory)>,
}

impl StaticComponentScanner {
    /// 创建空扫描器
    pub fn new() -> Self {
        Self::default()
    }

    /// 从描述符工厂表创建扫描器
    pub fn from_factories(factories: impl IntoIterator<Item = DescriptorFactory>) -> Self {
        let factories = factories
            .into_iter()
            .map(|factory| (*factory().type_info(), factory))
            .collect();
        Self { factories }
    }

    /// 添加组件
    pub fn with_component<C: ComponentDefinition>(mut self) -> Self {
        self.factories.push((TypeInfo::of::<C>(), C::descriptor));
        self
    }

    /// 组件表中的组件数量
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// 组件表是否为空
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[async_trait]
impl ComponentScanner for StaticComponentScanner {
    async fn discover_components(
        &self,
        root_namespace: &str,
    ) -> ComponentResult<Vec<TypeDescriptor>> {
        ensure_root(root_namespace)?;
        let descriptors = deduplicate(
            self.factories
                .iter()
                .filter(|(type_info, _)| type_info.is_within(root_namespace))
                .map(|(_, factory)| factory()),
        );
        debug!(
            "组件表扫描完成: {} -> {} 个组件",
            root_namespace,
            descriptors.len()
        );
        Ok(descriptors)
    }

    fn name(&self) -> &str {
        "StaticComponentScanner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod app {
        use super::super::*;

        #[derive(Debug, Default)]
        pub struct Service;

        impl ComponentDefinition for Service {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::builder::<Self>()
                    .default_constructor(Self::default)
                    .build()
            }
        }

        pub mod nested {
            use super::*;

            #[derive(Debug, Default)]
            pub struct Repository;

            impl ComponentDefinition for Repository {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::builder::<Self>()
                        .default_constructor(Self::default)
                        .build()
                }
            }
        }
    }

    fn scanner() -> StaticComponentScanner {
        StaticComponentScanner::new()
            .with_component::<app::Service>()
            .with_component::<app::nested::Repository>()
            .with_component::<app::Service>()
    }

    #[tokio::test]
    async fn test_static_scanner_filters_by_namespace() {
        let scanner = scanner();
        let root = TypeInfo::of::<app::Service>().module_path();

        let all = scanner.discover_components(root).await.unwrap();
        assert_eq!(all.len(), 2);

        let nested = TypeInfo::of::<app::nested::Repository>().module_path();
        let only_nested = scanner.discover_components(nested).await.unwrap();
        assert_eq!(only_nested.len(), 1);
        assert_eq!(only_nested[0].short_name(), "Repository");

        assert!(scanner
            .discover_components("unrelated")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_blank_root_is_discovery_failure() {
        assert!(matches!(
            scanner().discover_components("  ").await,
            Err(ComponentError::DiscoveryFailure { .. })
        ));
        assert!(matches!(
            InventoryComponentScanner.discover_components("").await,
            Err(ComponentError::DiscoveryFailure { .. })
        ));
        assert!(!scanner().supports(""));
    }

    #[tokio::test]
    async fn test_from_factories() {
        let scanner = StaticComponentScanner::from_factories([
            app::Service::descriptor as DescriptorFactory,
            app::nested::Repository::descriptor,
        ]);
        assert_eq!(scanner.len(), 2);

        let root = TypeInfo::of::<app::Service>().module_path();
        assert_eq!(scanner.discover_components(root).await.unwrap().len(), 2);
    }
}
