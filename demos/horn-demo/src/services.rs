//! 使用喇叭的车辆服务
//!
//! 三个服务分别演示带限定符的字段注入与构造函数注入。

use crate::horn::Horn;
use component_macros::{component_methods, Component};
use infrastructure_common::Autowired;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::info;

/// 里程表
#[derive(Debug, Default)]
pub struct Odometer(AtomicU32);

impl Odometer {
    /// 里程加一
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// 当前读数
    pub fn reading(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// 小汽车（字段注入气喇叭）
#[derive(Debug, Default, Component)]
#[component(methods, constructor = Self::default)]
pub struct Car {
    #[autowired(qualifier = "HornAir")]
    horn: Autowired<dyn Horn>,
    odometer: Odometer,
    last_honk: OnceCell<String>,
}

#[component_methods]
impl Car {
    #[post_construct]
    fn honk(&self) {
        let sound = self.horn.honk();
        info!("Car: {}", sound);
        let _ = self.last_honk.set(sound);
    }
}

impl Car {
    /// 初始化回调中的鸣笛内容
    pub fn last_honk(&self) -> Option<&str> {
        self.last_honk.get().map(String::as_str)
    }

    /// 里程表
    pub fn odometer(&self) -> &Odometer {
        &self.odometer
    }
}

/// 卡车服务（字段注入电喇叭）
#[derive(Debug, Default, Component)]
#[component(methods, constructor = Self::default)]
pub struct TruckService {
    #[autowired(qualifier = "HornElectric")]
    horn: Autowired<dyn Horn>,
    odometer: Odometer,
    last_honk: OnceCell<String>,
}

#[component_methods]
impl TruckService {
    #[post_construct]
    fn honk(&self) {
        let sound = self.horn.honk();
        info!("In Truck Service: {}", sound);
        let _ = self.last_honk.set(sound);
    }
}

impl TruckService {
    /// 初始化回调中的鸣笛内容
    pub fn last_honk(&self) -> Option<&str> {
        self.last_honk.get().map(String::as_str)
    }

    /// 里程表
    pub fn odometer(&self) -> &Odometer {
        &self.odometer
    }
}

/// 汽车服务（构造函数注入气喇叭）
#[derive(Component)]
#[component(methods)]
pub struct CarService {
    horn: Arc<dyn Horn>,
    odometer: Odometer,
    last_honk: OnceCell<String>,
}

#[component_methods]
impl CarService {
    /// 注入构造函数
    #[autowire]
    pub fn new(#[qualifier("HornAir")] horn: Arc<dyn Horn>) -> Self {
        Self {
            horn,
            odometer: Odometer::default(),
            last_honk: OnceCell::new(),
        }
    }

    #[post_construct]
    fn honk(&self) {
        let sound = self.horn.honk();
        info!("In Car Service: {}", sound);
        let _ = self.last_honk.set(sound);
    }
}

impl CarService {
    /// 初始化回调中的鸣笛内容
    pub fn last_honk(&self) -> Option<&str> {
        self.last_honk.get().map(String::as_str)
    }

    /// 里程表
    pub fn odometer(&self) -> &Odometer {
        &self.odometer
    }
}
