//! 组件发现机制
//!
//! 组件在进程启动时（通过 `ctor`）把描述符工厂提交到全局组件清单，
//! 扫描器再按命名空间从清单中筛选候选组件。

use crate::component::TypeDescriptor;
use crate::metadata::TypeInfo;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// 描述符工厂
pub type DescriptorFactory = fn() -> TypeDescriptor;

/// 可被容器发现的组件
///
/// 通常由 `#[derive(Component)]` 实现。
pub trait ComponentDefinition: Send + Sync + 'static {
    /// 组件描述符
    fn descriptor() -> TypeDescriptor
    where
        Self: Sized;
}

struct InventoryEntry {
    type_info: TypeInfo,
    factory: DescriptorFactory,
}

/// 全局组件清单
static COMPONENT_INVENTORY: Lazy<RwLock<Vec<InventoryEntry>>> =
    Lazy::new(|| RwLock::new(Vec::new()));

/// 把组件提交到全局清单
///
/// 同一类型重复提交时只保留第一次。
pub fn submit_component<C: ComponentDefinition>() {
    let type_info = TypeInfo::of::<C>();
    let mut inventory = COMPONENT_INVENTORY.write();
    if inventory.iter().any(|entry| entry.type_info == type_info) {
        return;
    }
    inventory.push(InventoryEntry {
        type_info,
        factory: C::descriptor,
    });
}

/// 清单中的所有组件（按提交顺序）
pub fn registered_components() -> Vec<(TypeInfo, DescriptorFactory)> {
    COMPONENT_INVENTORY
        .read()
        .iter()
        .map(|entry| (entry.type_info, entry.factory))
        .collect()
}

/// 清单中位于指定命名空间之下的组件描述符
pub fn components_within(namespace: &str) -> Vec<TypeDescriptor> {
    registered_components()
        .into_iter()
        .filter(|(type_info, _)| type_info.is_within(namespace))
        .map(|(_, factory)| factory())
        .collect()
}
