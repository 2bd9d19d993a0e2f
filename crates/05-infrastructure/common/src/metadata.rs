//! 元数据定义
//!
//! 提供组件和契约类型的标识信息

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 既可以描述具体组件类型，也可以描述 `dyn Trait` 形式的契约类型。
/// 相等性与哈希只取决于 [`TypeId`]。
#[derive(Clone, Copy)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称（`std::any::type_name` 的结果）
    pub type_name: &'static str,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径与泛型参数）
    ///
    /// `horn_demo::horn::HornAir` 得到 `HornAir`，
    /// `app::Wrapper<app::Inner>` 得到 `Wrapper`。
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// 模块路径，即类型所在的命名空间
    pub fn module_path(&self) -> &'static str {
        let path = strip_generics(strip_dyn(self.type_name));
        path.rsplit_once("::").map_or("", |(module, _)| module)
    }

    /// 判断类型是否位于指定命名空间或其子命名空间之下
    pub fn is_within(&self, namespace: &str) -> bool {
        let module = self.module_path();
        namespace.is_empty()
            || module == namespace
            || module
                .strip_prefix(namespace)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

/// 从完整类型名称中提取简短名称
pub fn short_type_name(type_name: &str) -> &str {
    let path = strip_generics(strip_dyn(type_name));
    path.rsplit("::").next().unwrap_or(path)
}

fn strip_dyn(type_name: &str) -> &str {
    let name = type_name.strip_prefix("dyn ").unwrap_or(type_name);
    // `dyn a::Horn + core::marker::Send` 只保留第一个 trait
    name.split(" + ").next().unwrap_or(name)
}

fn strip_generics(type_name: &str) -> &str {
    type_name.split('<').next().unwrap_or(type_name)
}
