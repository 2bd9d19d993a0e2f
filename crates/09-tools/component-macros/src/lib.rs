//! # Component Macros
//!
//! 这个 crate 提供了声明组件元数据的过程宏。
//!
//! ## 核心宏
//!
//! - [`Component`] - 生成组件描述符并注册到全局组件清单
//! - [`component_methods`] - 声明注入构造函数和初始化回调
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::{component_methods, Component};
//! use infrastructure_common::Autowired;
//! use std::sync::Arc;
//!
//! pub trait Horn: Send + Sync {
//!     fn honk(&self) -> String;
//! }
//!
//! #[derive(Default, Component)]
//! #[component(implements(dyn Horn))]
//! pub struct HornAir;
//!
//! #[derive(Default, Component)]
//! #[component(methods, constructor = Self::default)]
//! pub struct Car {
//!     #[autowired(qualifier = "HornAir")]
//!     horn: Autowired<dyn Horn>,
//! }
//!
//! #[component_methods]
//! impl Car {
//!     #[post_construct]
//!     fn start(&self) {
//!         self.horn.honk();
//!     }
//! }
//!
//! #[derive(Component)]
//! #[component(methods)]
//! pub struct CarService {
//!     horn: Arc<dyn Horn>,
//! }
//!
//! #[component_methods]
//! impl CarService {
//!     #[autowire]
//!     pub fn new(#[qualifier("HornAir")] horn: Arc<dyn Horn>) -> Self {
//!         Self { horn }
//!     }
//! }
//! ```
//!
//! 使用 `#[derive(Component)]` 的 crate 需要直接依赖 `ctor` 和
//! `infrastructure-common`。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemImpl};

mod component;
mod methods;
mod utils;

/// 组件派生宏
///
/// 为结构体实现 `ComponentDefinition`，并在进程启动时把描述符工厂提交到全局组件清单。
///
/// # 结构体参数 `#[component(...)]`
///
/// - `implements(dyn A, dyn B)` - 实现的契约
/// - `constructor = path` - 自定义默认构造函数（默认为 `Default::default`）
/// - `extends = field` - 以字段类型作为父类型，继承其可注入字段
/// - `scan = false` - 不提交到全局组件清单
/// - `methods` - 由 `#[component_methods]` 提供构造函数和回调；此时不再默认使用
///   `Default::default`
///
/// # 字段参数
///
/// - `#[autowired]` - 字段类型必须是 `Autowired<T>`
/// - `#[autowired(qualifier = "X")]` - 指定限定符
#[proc_macro_derive(Component, attributes(component, autowired))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// 组件方法宏
///
/// 用于组件的固有 impl 块，配合 `#[component(methods)]` 使用。
///
/// - `#[autowire]` - 注入构造函数，参数类型必须是 `Arc<T>`，可用
///   `#[qualifier("X")]` 标注参数；返回 `Self` 或 `Result<Self, E>`
/// - `#[post_construct]` - 注入完成后调用的 `&self` 方法，返回 `()` 或 `Result<(), E>`
#[proc_macro_attribute]
pub fn component_methods(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "#[component_methods] 不接受参数",
        )
        .into_compile_error()
        .into();
    }

    let item = parse_macro_input!(input as ItemImpl);
    methods::component_methods_impl(item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
