//! # Horn Demo
//!
//! 演示 Lorn IoC 容器的示例组件：一个喇叭契约、两种喇叭实现，以及三个通过
//! 字段注入或构造函数注入使用喇叭的服务。

pub mod horn;
pub mod services;

pub use horn::{Horn, HornAir, HornElectric};
pub use services::{Car, CarService, Odometer, TruckService};

use infrastructure_common::{ComponentDefinition, DescriptorFactory};

/// 根类型，以 `horn_demo` 为根命名空间启动
pub struct HornDemo;

/// 显式组件表
///
/// 与全局组件清单内容相同；当链接器丢弃了库中的启动期注册函数时仍然可以发现所有组件。
pub fn component_table() -> Vec<DescriptorFactory> {
    vec![
        HornAir::descriptor as DescriptorFactory,
        HornElectric::descriptor,
        Car::descriptor,
        TruckService::descriptor,
        CarService::descriptor,
    ]
}
