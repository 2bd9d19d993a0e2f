//! 绑定注册表实现

use di_abstractions::BindingRegistry;
use infrastructure_common::{
    DependencyError, DependencyResult, Instance, Resolved, ResolutionHint, TypeDescriptor,
    TypeInfo,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 基于哈希表的绑定注册表
#[derive(Debug, Default)]
pub struct BindingRegistryImpl {
    /// 具体类型 -> 描述符
    descriptors: HashMap<TypeInfo, TypeDescriptor>,
    /// 注册顺序
    order: Vec<TypeInfo>,
    /// 契约 -> 具体实现
    bindings: HashMap<TypeInfo, Vec<TypeInfo>>,
    /// 小写简短类型名 -> 具体类型
    name_index: HashMap<String, Vec<TypeInfo>>,
}

impl BindingRegistryImpl {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从描述符集合构建注册表
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = TypeDescriptor>,
    ) -> DependencyResult<Self> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    fn select_by_hint(
        &self,
        contract: &TypeInfo,
        candidates: &[TypeInfo],
        hint: &ResolutionHint,
    ) -> DependencyResult<TypeInfo> {
        let ambiguous = || DependencyError::AmbiguousImplementation {
            contract: contract.type_name.to_string(),
            candidates: candidates.len(),
        };

        let Some(name) = hint.effective() else {
            return Err(ambiguous());
        };

        let mut matches: Vec<TypeInfo> = self
            .name_index
            .get(&name.to_lowercase())
            .map(|named| {
                named
                    .iter()
                    .filter(|type_info| candidates.contains(type_info))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        // 限定符只做大小写不敏感的精确匹配；声明名称在精确匹配落空后再按 snake_case 折叠匹配
        let by_qualifier = hint.qualifier.as_deref().is_some_and(|q| !q.is_empty());
        if matches.is_empty() && !by_qualifier {
            let folded = fold_snake_case(name);
            matches = candidates
                .iter()
                .filter(|type_info| fold_snake_case(type_info.short_name()) == folded)
                .copied()
                .collect();
        }

        match matches.as_slice() {
            [selected] => {
                debug!("按名称 '{}' 选择 {} 的实现: {}", name, contract, selected);
                Ok(*selected)
            }
            _ => Err(ambiguous()),
        }
    }
}

/// 去掉下划线并转为小写，`horn_air` 与 `HornAir` 折叠后相同
fn fold_snake_case(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl BindingRegistry for BindingRegistryImpl {
    fn register(&mut self, descriptor: TypeDescriptor) -> DependencyResult<()> {
        let type_info = *descriptor.type_info();

        if self.descriptors.contains_key(&type_info) {
            return Err(DependencyError::registration(
                type_info.type_name,
                "同一组件类型不能重复注册",
            ));
        }

        let constructors = descriptor.injectable_constructors().len();
        if constructors > 1 {
            return Err(DependencyError::MultipleInjectableConstructors {
                type_name: type_info.type_name.to_string(),
                count: constructors,
            });
        }

        if constructors == 0 && !descriptor.has_default_constructor() {
            warn!("组件 {} 既没有可注入构造函数，也没有默认构造函数", type_info);
        }

        let contracts = std::iter::once(type_info)
            .chain(descriptor.declared_contracts().iter().map(|b| b.contract));
        for contract in contracts {
            let implementations = self.bindings.entry(contract).or_default();
            if !implementations.contains(&type_info) {
                implementations.push(type_info);
            }
        }

        self.name_index
            .entry(type_info.short_name().to_lowercase())
            .or_default()
            .push(type_info);

        debug!(
            "注册组件: {} (契约: {})",
            type_info,
            descriptor.declared_contracts().len()
        );

        self.order.push(type_info);
        self.descriptors.insert(type_info, descriptor);
        Ok(())
    }

    fn resolve_implementation(
        &self,
        requested: &TypeInfo,
        hint: &ResolutionHint,
    ) -> DependencyResult<TypeInfo> {
        if self.descriptors.contains_key(requested) {
            return Ok(*requested);
        }

        match self.bindings.get(requested).map(Vec::as_slice) {
            None | Some([]) => Err(DependencyError::NoImplementationFound {
                contract: requested.type_name.to_string(),
            }),
            Some([single]) => Ok(*single),
            Some(candidates) => self.select_by_hint(requested, candidates, hint),
        }
    }

    fn candidates(&self, contract: &TypeInfo) -> Vec<TypeInfo> {
        self.bindings.get(contract).cloned().unwrap_or_default()
    }

    fn descriptor(&self, concrete: &TypeInfo) -> Option<&TypeDescriptor> {
        self.descriptors.get(concrete)
    }

    fn descriptors(&self) -> Vec<&TypeDescriptor> {
        self.order
            .iter()
            .filter_map(|type_info| self.descriptors.get(type_info))
            .collect()
    }

    fn is_registered(&self, concrete: &TypeInfo) -> bool {
        self.descriptors.contains_key(concrete)
    }

    fn project(
        &self,
        requested: &TypeInfo,
        concrete: &TypeInfo,
        instance: Instance,
    ) -> DependencyResult<Resolved> {
        let descriptor =
            self.descriptor(concrete)
                .ok_or_else(|| DependencyError::NoImplementationFound {
                    contract: concrete.type_name.to_string(),
                })?;

        descriptor
            .project(requested, instance)
            .ok_or_else(|| DependencyError::TypeMismatch {
                expected: requested.type_name.to_string(),
                actual: concrete.type_name.to_string(),
            })
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}
