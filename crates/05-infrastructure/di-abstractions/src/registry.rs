//! 绑定注册表抽象接口

use infrastructure_common::{
    DependencyResult, Instance, Resolved, ResolutionHint, TypeDescriptor, TypeInfo,
};

/// 绑定注册表 trait
///
/// 维护契约到具体实现的索引。注册表在任何实例创建之前构建完成，
/// 交给容器之后只读。
pub trait BindingRegistry: Send + Sync {
    /// 注册组件描述符
    ///
    /// 为组件类型自身以及它声明的每个契约添加绑定。同一具体类型重复注册，
    /// 或声明了多个可注入构造函数时返回错误。
    fn register(&mut self, descriptor: TypeDescriptor) -> DependencyResult<()>;

    /// 将请求的类型解析为具体实现
    ///
    /// 请求的类型本身是已注册的具体类型时直接返回；否则在契约的候选实现中选择，
    /// 多个候选时使用解析提示按简短类型名（不区分大小写）匹配；仅声明名称在精确匹配
    /// 落空后再忽略下划线匹配一次。
    fn resolve_implementation(
        &self,
        requested: &TypeInfo,
        hint: &ResolutionHint,
    ) -> DependencyResult<TypeInfo>;

    /// 契约的所有候选实现（按注册顺序）
    fn candidates(&self, contract: &TypeInfo) -> Vec<TypeInfo>;

    /// 获取具体类型的描述符
    fn descriptor(&self, concrete: &TypeInfo) -> Option<&TypeDescriptor>;

    /// 所有已注册的描述符（按注册顺序）
    fn descriptors(&self) -> Vec<&TypeDescriptor>;

    /// 检查具体类型是否已注册
    fn is_registered(&self, concrete: &TypeInfo) -> bool;

    /// 将具体实例投影为请求的类型视图
    fn project(
        &self,
        requested: &TypeInfo,
        concrete: &TypeInfo,
        instance: Instance,
    ) -> DependencyResult<Resolved>;

    /// 已注册组件数量
    fn len(&self) -> usize;

    /// 注册表是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
