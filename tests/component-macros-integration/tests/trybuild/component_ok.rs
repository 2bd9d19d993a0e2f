use component_macros::{component_methods, Component};
use infrastructure_common::{Autowired, ComponentDefinition, TypeInfo};
use std::sync::Arc;

pub trait Horn: Send + Sync {
    fn honk(&self) -> String;
}

#[derive(Default, Component)]
#[component(implements(dyn Horn))]
struct HornAir;

impl Horn for HornAir {
    fn honk(&self) -> String {
        "air".to_string()
    }
}

#[derive(Default, Component)]
#[component(methods, constructor = Self::default)]
struct Car {
    #[autowired(qualifier = "HornAir")]
    horn: Autowired<dyn Horn>,
}

#[component_methods]
impl Car {
    #[post_construct]
    fn honk(&self) -> Result<(), String> {
        if self.horn.honk().is_empty() {
            return Err("silent".to_string());
        }
        Ok(())
    }
}

#[derive(Component)]
#[component(methods, scan = false)]
struct CarService {
    horn: Arc<dyn Horn>,
}

#[component_methods]
impl CarService {
    #[autowire]
    fn new(#[qualifier("HornAir")] horn: Arc<dyn Horn>) -> Self {
        Self { horn }
    }
}

fn main() {
    assert_eq!(HornAir::descriptor().declared_contracts().len(), 1);
    assert_eq!(Car::descriptor().injectable_fields().count(), 1);
    assert_eq!(Car::descriptor().post_construct_hooks().len(), 1);

    let service = CarService::descriptor();
    assert_eq!(*service.type_info(), TypeInfo::of::<CarService>());
    assert_eq!(service.injectable_constructors().len(), 1);

    let horn: Arc<dyn Horn> = Arc::new(HornAir);
    assert_eq!(CarService::new(horn).horn.honk(), "air");
}
