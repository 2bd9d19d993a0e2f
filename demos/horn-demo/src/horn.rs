//! 喇叭契约及其实现

use component_macros::{component_methods, Component};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// 喇叭
pub trait Horn: Send + Sync {
    /// 鸣笛，返回鸣笛内容
    fn honk(&self) -> String;
}

/// 气喇叭
#[derive(Debug, Default, Component)]
#[component(implements(dyn Horn), methods, constructor = Self::default)]
pub struct HornAir {
    initialized: AtomicBool,
}

#[component_methods]
impl HornAir {
    #[post_construct]
    fn post_construct(&self) {
        self.initialized.store(true, Ordering::SeqCst);
        info!("气喇叭初始化完成");
    }

    /// 初始化回调是否已执行
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}

impl Horn for HornAir {
    fn honk(&self) -> String {
        "Air Horn Implementation called.".to_string()
    }
}

/// 电喇叭
#[derive(Debug, Default, Component)]
#[component(implements(dyn Horn))]
pub struct HornElectric;

impl Horn for HornElectric {
    fn honk(&self) -> String {
        "Electric Horn Implementation called".to_string()
    }
}
