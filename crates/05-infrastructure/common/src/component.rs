//! 组件描述符定义
//!
//! [`TypeDescriptor`] 是容器唯一理解的组件描述形式：它显式列出组件实现的契约、
//! 可注入构造函数、可注入字段以及初始化回调。描述符可以通过
//! [`TypeDescriptor::builder`] 手工构建，也可以由 `component-macros` 生成。

use crate::errors::BoxError;
use crate::metadata::TypeInfo;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::sync::Arc;

/// 类型擦除后的单例实例（内部为 `Arc<具体类型>`）
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 按请求类型投影后的依赖值（内部为 `Arc<T>`，`T` 可以是 `dyn Trait`）
pub type Resolved = Box<dyn Any + Send + Sync>;

/// 实例投影函数
pub type InstanceCaster = Arc<dyn Fn(Instance) -> Option<Resolved> + Send + Sync>;

/// 可注入构造函数
pub type ConstructorFn =
    Arc<dyn Fn(&mut Dependencies) -> Result<Instance, BoxError> + Send + Sync>;

/// 默认（无参）构造函数
pub type DefaultConstructorFn = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// 字段注入函数
pub type FieldInjectorFn =
    Arc<dyn Fn(&(dyn Any + Send + Sync), Resolved) -> Result<(), BoxError> + Send + Sync>;

/// 初始化回调函数
pub type HookFn = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> Result<(), BoxError> + Send + Sync>;

/// 解析提示
///
/// 同一契约存在多个实现时，先使用非空的限定符，其次使用依赖声明的名称
/// （字段名或构造函数参数名）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionHint {
    /// 显式限定符
    pub qualifier: Option<String>,
    /// 依赖声明的名称
    pub declared_name: Option<String>,
}

impl ResolutionHint {
    /// 不带任何提示
    pub fn none() -> Self {
        Self::default()
    }

    /// 仅带限定符
    pub fn qualified(qualifier: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            declared_name: None,
        }
    }

    /// 仅带声明名称
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            declared_name: Some(name.into()),
        }
    }

    /// 实际用于匹配的提示
    pub fn effective(&self) -> Option<&str> {
        match self.qualifier.as_deref() {
            Some(qualifier) if !qualifier.is_empty() => Some(qualifier),
            _ => self.declared_name.as_deref().filter(|name| !name.is_empty()),
        }
    }
}

/// 注入点：构造函数参数或字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
    /// 依赖类型（具体类型或契约）
    pub type_info: TypeInfo,
    /// 参数名或字段名
    pub name: String,
    /// 限定符
    pub qualifier: Option<String>,
}

impl InjectionPoint {
    /// 创建注入点
    pub fn of<D: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self {
            type_info: TypeInfo::of::<D>(),
            name: name.into(),
            qualifier: None,
        }
    }

    /// 设置限定符
    pub fn qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// 该注入点的解析提示
    pub fn hint(&self) -> ResolutionHint {
        ResolutionHint {
            qualifier: self.qualifier.clone(),
            declared_name: Some(self.name.clone()),
        }
    }
}

/// 契约绑定
#[derive(Clone)]
pub struct ContractBinding {
    /// 契约类型
    pub contract: TypeInfo,
    cast: InstanceCaster,
}

impl ContractBinding {
    /// 将具体实例投影为契约视图
    pub fn cast(&self, instance: Instance) -> Option<Resolved> {
        (self.cast)(instance)
    }
}

/// 可注入构造函数描述
#[derive(Clone)]
pub struct ConstructorDescriptor {
    /// 构造函数名称
    pub name: String,
    /// 参数列表（按声明顺序）
    pub parameters: Vec<InjectionPoint>,
    factory: ConstructorFn,
}

impl ConstructorDescriptor {
    /// 使用已解析的参数调用构造函数
    pub fn invoke(&self, dependencies: &mut Dependencies) -> Result<Instance, BoxError> {
        (self.factory)(dependencies)
    }
}

/// 可注入字段描述
#[derive(Clone)]
pub struct FieldDescriptor {
    /// 注入点
    pub point: InjectionPoint,
    injector: FieldInjectorFn,
}

impl FieldDescriptor {
    /// 将依赖写入实例的字段
    pub fn inject(&self, owner: &(dyn Any + Send + Sync), value: Resolved) -> Result<(), BoxError> {
        (self.injector)(owner, value)
    }
}

/// 初始化回调描述
#[derive(Clone)]
pub struct HookDescriptor {
    /// 回调名称
    pub name: String,
    hook: HookFn,
}

impl HookDescriptor {
    /// 在实例上执行回调
    pub fn invoke(&self, instance: &(dyn Any + Send + Sync)) -> Result<(), BoxError> {
        (self.hook)(instance)
    }
}

/// 直接父类型描述，只贡献其自身声明的字段
#[derive(Clone)]
pub struct SupertypeDescriptor {
    /// 父类型
    pub type_info: TypeInfo,
    /// 父类型自身的可注入字段
    pub fields: Vec<FieldDescriptor>,
}

/// 组件类型描述符
#[derive(Clone)]
pub struct TypeDescriptor {
    type_info: TypeInfo,
    contracts: Vec<ContractBinding>,
    constructors: Vec<ConstructorDescriptor>,
    default_constructor: Option<DefaultConstructorFn>,
    fields: Vec<FieldDescriptor>,
    supertype: Option<SupertypeDescriptor>,
    hooks: Vec<HookDescriptor>,
    self_cast: InstanceCaster,
}

impl TypeDescriptor {
    /// 为具体类型 `T` 创建描述符构建器
    pub fn builder<T: Send + Sync + 'static>() -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder::new()
    }

    /// 组件类型
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 简短类型名称
    pub fn short_name(&self) -> &'static str {
        self.type_info.short_name()
    }

    /// 声明实现的契约
    pub fn declared_contracts(&self) -> &[ContractBinding] {
        &self.contracts
    }

    /// 所有标记为可注入的构造函数
    pub fn injectable_constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// 唯一的可注入构造函数（如果有）
    pub fn injectable_constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructors.first()
    }

    /// 是否提供默认构造函数
    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    /// 调用默认构造函数
    pub fn construct_default(&self) -> Option<Result<Instance, BoxError>> {
        self.default_constructor.as_ref().map(|factory| factory())
    }

    /// 可注入字段：先是自身字段，然后是直接父类型的字段
    pub fn injectable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().chain(
            self.supertype
                .iter()
                .flat_map(|supertype| supertype.fields.iter()),
        )
    }

    /// 直接父类型
    pub fn supertype(&self) -> Option<&SupertypeDescriptor> {
        self.supertype.as_ref()
    }

    /// 初始化回调（按声明顺序）
    pub fn post_construct_hooks(&self) -> &[HookDescriptor] {
        &self.hooks
    }

    /// 所有注入点：可注入构造函数的参数，然后是字段
    pub fn injection_points(&self) -> impl Iterator<Item = &InjectionPoint> {
        self.injectable_constructor()
            .into_iter()
            .flat_map(|constructor| constructor.parameters.iter())
            .chain(self.injectable_fields().map(|field| &field.point))
    }

    /// 将实例投影为请求的类型视图
    ///
    /// `requested` 可以是组件自身类型，也可以是其声明的某个契约。
    pub fn project(&self, requested: &TypeInfo, instance: Instance) -> Option<Resolved> {
        if *requested == self.type_info {
            return (self.self_cast)(instance);
        }
        self.contracts
            .iter()
            .find(|binding| binding.contract == *requested)
            .and_then(|binding| binding.cast(instance))
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_info", &self.type_info)
            .field(
                "contracts",
                &self.contracts.iter().map(|c| c.contract).collect::<Vec<_>>(),
            )
            .field(
                "constructors",
                &self
                    .constructors
                    .iter()
                    .map(|c| (&c.name, &c.parameters))
                    .collect::<Vec<_>>(),
            )
            .field("default_constructor", &self.default_constructor.is_some())
            .field("supertype", &self.supertype().map(|supertype| supertype.type_info))
            .field(
                "fields",
                &self.injectable_fields().map(|f| &f.point).collect::<Vec<_>>(),
            )
            .field(
                "hooks",
                &self.hooks.iter().map(|h| &h.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// 描述符构建器
pub struct TypeDescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> TypeDescriptorBuilder<T> {
    fn new() -> Self {
        let self_cast: InstanceCaster = Arc::new(|instance: Instance| {
            instance
                .downcast::<T>()
                .ok()
                .map(|concrete| Box::new(concrete) as Resolved)
        });

        Self {
            descriptor: TypeDescriptor {
                type_info: TypeInfo::of::<T>(),
                contracts: Vec::new(),
                constructors: Vec::new(),
                default_constructor: None,
                fields: Vec::new(),
                supertype: None,
                hooks: Vec::new(),
                self_cast,
            },
            _marker: PhantomData,
        }
    }

    /// 声明实现的契约
    ///
    /// `upcast` 负责把 `Arc<T>` 转换为 `Arc<dyn Contract>`，通常写作
    /// `|this| this`。
    pub fn implements<C>(mut self, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let cast: InstanceCaster = Arc::new(move |instance: Instance| {
            instance
                .downcast::<T>()
                .ok()
                .map(|concrete| Box::new(upcast(concrete)) as Resolved)
        });
        self.descriptor.contracts.push(ContractBinding {
            contract: TypeInfo::of::<C>(),
            cast,
        });
        self
    }

    /// 设置默认构造函数
    pub fn default_constructor<F>(self, factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.try_default_constructor(move || Ok(factory()))
    }

    /// 设置可能失败的默认构造函数
    pub fn try_default_constructor<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.descriptor.default_constructor =
            Some(Arc::new(move || factory().map(|value| Arc::new(value) as Instance)));
        self
    }

    /// 添加可注入构造函数
    ///
    /// 重复调用会声明多个可注入构造函数，注册时会被拒绝。
    pub fn injectable_constructor<F>(
        mut self,
        name: impl Into<String>,
        parameters: Vec<InjectionPoint>,
        factory: F,
    ) -> Self
    where
        F: Fn(&mut Dependencies) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.descriptor.constructors.push(ConstructorDescriptor {
            name: name.into(),
            parameters,
            factory: Arc::new(move |dependencies: &mut Dependencies| {
                factory(dependencies).map(|value| Arc::new(value) as Instance)
            }),
        });
        self
    }

    /// 添加可注入字段
    pub fn field<D, F>(self, name: impl Into<String>, accessor: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&T) -> &Autowired<D> + Send + Sync + 'static,
    {
        self.push_field(InjectionPoint::of::<D>(name), accessor)
    }

    /// 添加带限定符的可注入字段
    pub fn qualified_field<D, F>(
        self,
        name: impl Into<String>,
        qualifier: impl Into<String>,
        accessor: F,
    ) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&T) -> &Autowired<D> + Send + Sync + 'static,
    {
        self.push_field(InjectionPoint::of::<D>(name).qualifier(qualifier), accessor)
    }

    fn push_field<D, F>(mut self, point: InjectionPoint, accessor: F) -> Self
    where
        D: ?Sized + Send + Sync + 'static,
        F: Fn(&T) -> &Autowired<D> + Send + Sync + 'static,
    {
        let injector: FieldInjectorFn = Arc::new(
            move |owner: &(dyn Any + Send + Sync), value: Resolved| -> Result<(), BoxError> {
                let owner = owner
                    .downcast_ref::<T>()
                    .ok_or("字段所属实例类型不匹配")?;
                let value = value
                    .downcast::<Arc<D>>()
                    .map_err(|_| "依赖值类型与字段类型不匹配")?;
                accessor(owner)
                    .wire(*value)
                    .map_err(|_| BoxError::from("字段已被注入"))
            },
        );
        self.descriptor.fields.push(FieldDescriptor { point, injector });
        self
    }

    /// 声明直接父类型
    ///
    /// 只继承 `base` 自身声明的可注入字段；父类型的契约、构造函数和回调都不参与。
    pub fn extends<B>(mut self, base: TypeDescriptor, project: fn(&T) -> &B) -> Self
    where
        B: Send + Sync + 'static,
    {
        let fields = base
            .fields
            .into_iter()
            .map(|field| {
                let inner = field.injector;
                let injector: FieldInjectorFn = Arc::new(
                    move |owner: &(dyn Any + Send + Sync), value: Resolved| -> Result<(), BoxError> {
                        let owner = owner
                            .downcast_ref::<T>()
                            .ok_or("字段所属实例类型不匹配")?;
                        inner(project(owner) as &(dyn Any + Send + Sync), value)
                    },
                );
                FieldDescriptor {
                    point: field.point,
                    injector,
                }
            })
            .collect();

        self.descriptor.supertype = Some(SupertypeDescriptor {
            type_info: base.type_info,
            fields,
        });
        self
    }

    /// 添加初始化回调
    pub fn post_construct<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let hook: HookFn = Arc::new(
            move |instance: &(dyn Any + Send + Sync)| -> Result<(), BoxError> {
                let instance = instance
                    .downcast_ref::<T>()
                    .ok_or("回调所属实例类型不匹配")?;
                callback(instance)
            },
        );
        self.descriptor.hooks.push(HookDescriptor {
            name: name.into(),
            hook,
        });
        self
    }

    /// 完成构建
    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

/// 构造函数参数
///
/// 按参数声明顺序保存已解析的依赖，由构造函数依次取出。
pub struct Dependencies {
    owner: TypeInfo,
    values: VecDeque<(TypeInfo, Resolved)>,
}

impl Dependencies {
    /// 创建参数列表
    pub fn new(owner: TypeInfo, values: Vec<(TypeInfo, Resolved)>) -> Self {
        Self {
            owner,
            values: values.into(),
        }
    }

    /// 取出下一个参数
    pub fn take<D>(&mut self) -> Result<Arc<D>, BoxError>
    where
        D: ?Sized + Send + Sync + 'static,
    {
        let (declared, value) = self
            .values
            .pop_front()
            .ok_or_else(|| format!("{} 的构造函数参数不足", self.owner))?;
        value.downcast::<Arc<D>>().map(|value| *value).map_err(|_| {
            format!(
                "构造函数参数类型不匹配: 期望 {}, 实际 {}",
                std::any::type_name::<D>(),
                declared
            )
            .into()
        })
    }

    /// 剩余参数数量
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("owner", &self.owner)
            .field(
                "values",
                &self.values.iter().map(|(ty, _)| ty).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// 字段注入槽
///
/// 组件中需要字段注入的依赖声明为 `Autowired<T>`，容器在构造实例之后写入一次。
pub struct Autowired<T: ?Sized> {
    slot: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Autowired<T> {
    /// 创建尚未注入的槽
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// 已注入的依赖
    pub fn get(&self) -> Option<&Arc<T>> {
        self.slot.get()
    }

    /// 是否已注入
    pub fn is_wired(&self) -> bool {
        self.slot.get().is_some()
    }

    /// 写入依赖，已写入过时返回传入的值
    pub fn wire(&self, value: Arc<T>) -> Result<(), Arc<T>> {
        self.slot.set(value)
    }
}

impl<T: ?Sized> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Deref for Autowired<T> {
    type Target = T;

    /// # Panics
    ///
    /// 依赖尚未注入时 panic。容器只会在所有字段注入完成后才执行初始化回调。
    fn deref(&self) -> &T {
        match self.slot.get() {
            Some(value) => value.as_ref(),
            None => panic!("依赖尚未注入: {}", std::any::type_name::<T>()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("type", &std::any::type_name::<T>())
            .field("wired", &self.is_wired())
            .finish()
    }
}
