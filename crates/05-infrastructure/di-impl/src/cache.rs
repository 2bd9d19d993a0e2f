//! 单例实例缓存

use infrastructure_common::{Instance, TypeInfo};
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::cell::RefCell;
use std::collections::HashMap;

type InstanceMap = HashMap<TypeInfo, Instance>;

/// 单例实例缓存
///
/// 整个缓存由一把可重入锁保护。顶层解析在整个过程中持有这把锁，
/// 因此“检查-创建-写入”是串行的；同一线程上的嵌套解析（例如构造函数
/// 内部再次调用容器）可以重复加锁。
pub struct InstanceCache {
    instances: ReentrantMutex<RefCell<InstanceMap>>,
}

impl InstanceCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self {
            instances: ReentrantMutex::new(RefCell::new(HashMap::new())),
        }
    }

    /// 获取缓存锁
    pub fn lock(&self) -> CacheGuard<'_> {
        CacheGuard {
            guard: self.instances.lock(),
        }
    }

    /// 获取缓存中的实例
    pub fn get(&self, type_info: &TypeInfo) -> Option<Instance> {
        self.lock().get(type_info)
    }

    /// 缓存中是否存在实例
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.lock().contains(type_info)
    }

    /// 缓存的实例数量
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InstanceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InstanceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceCache")
            .field("instances", &self.len())
            .finish()
    }
}

/// 持有缓存锁期间的访问句柄
///
/// 每次访问只短暂借用内部表，不会跨越递归调用持有借用。
pub struct CacheGuard<'a> {
    guard: ReentrantMutexGuard<'a, RefCell<InstanceMap>>,
}

impl CacheGuard<'_> {
    /// 获取实例
    pub fn get(&self, type_info: &TypeInfo) -> Option<Instance> {
        self.guard.borrow().get(type_info).cloned()
    }

    /// 是否存在实例
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        self.guard.borrow().contains_key(type_info)
    }

    /// 写入实例
    pub fn insert(&self, type_info: TypeInfo, instance: Instance) {
        self.guard.borrow_mut().insert(type_info, instance);
    }

    /// 移除实例
    pub fn evict(&self, type_info: &TypeInfo) -> bool {
        self.guard.borrow_mut().remove(type_info).is_some()
    }

    /// 实例数量
    pub fn len(&self) -> usize {
        self.guard.borrow().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
