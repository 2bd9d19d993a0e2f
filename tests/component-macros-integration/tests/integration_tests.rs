//! 组件宏与组件清单扫描的集中集成测试

use component_macros::{component_methods, Component};
use di_abstractions::{ContainerConfig, CyclePolicy, DiContainer};
use infrastructure_common::{Autowired, DependencyError, InfrastructureError};
use infrastructure_composition::{ContainerBootstrapBuilder, InventoryComponentScanner};
use parking_lot::{const_mutex, Mutex};
use std::sync::Arc;

/// 初始化回调的执行记录
static HOOK_LOG: Mutex<Vec<&'static str>> = const_mutex(Vec::new());

mod garage {
    use super::*;

    pub trait Horn: Send + Sync {
        fn honk(&self) -> &'static str;
    }

    #[derive(Default, Component)]
    #[component(implements(dyn Horn), methods, constructor = Self::default)]
    pub struct HornAir;

    #[component_methods]
    impl HornAir {
        #[post_construct]
        fn ready(&self) {
            HOOK_LOG.lock().push("HornAir");
        }
    }

    impl Horn for HornAir {
        fn honk(&self) -> &'static str {
            "air"
        }
    }

    #[derive(Default, Component)]
    #[component(implements(dyn Horn))]
    pub struct HornElectric;

    impl Horn for HornElectric {
        fn honk(&self) -> &'static str {
            "electric"
        }
    }

    #[derive(Default, Component)]
    #[component(methods, constructor = Self::default)]
    pub struct Car {
        // 字段名与实现类型名一致时不需要限定符
        #[autowired]
        pub horn_air: Autowired<dyn Horn>,
    }

    #[component_methods]
    impl Car {
        #[post_construct]
        fn ready(&self) {
            HOOK_LOG.lock().push("Car");
        }
    }

    #[derive(Component)]
    #[component(methods)]
    pub struct Dealer {
        pub car: Arc<Car>,
        pub horn: Arc<dyn Horn>,
    }

    #[component_methods]
    impl Dealer {
        #[autowire]
        pub fn new(car: Arc<Car>, #[qualifier("HornElectric")] horn: Arc<dyn Horn>) -> Self {
            Self { car, horn }
        }

        #[post_construct]
        fn ready(&self) {
            HOOK_LOG.lock().push("Dealer");
        }
    }

    pub struct Root;
}

mod cycle {
    use super::*;

    #[derive(Default, Component)]
    pub struct Left {
        #[autowired]
        pub right: Autowired<Right>,
    }

    #[derive(Default, Component)]
    pub struct Right {
        #[autowired]
        pub left: Autowired<Left>,
    }

    pub struct Root;
}

mod failing {
    use super::*;

    #[derive(Default, Component)]
    #[component(methods, constructor = Self::default)]
    pub struct Broken;

    #[component_methods]
    impl Broken {
        #[post_construct]
        fn explode(&self) -> Result<(), std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
        }
    }

    pub struct Root;
}

#[tokio::test]
async fn test_inventory_bootstrap_wires_components() {
    let context = ContainerBootstrapBuilder::new()
        .add_component_scanner(InventoryComponentScanner::new())
        .bootstrap::<garage::Root>()
        .await
        .unwrap();

    assert_eq!(context.report().components.len(), 4);
    assert_eq!(context.report().materialized, 4);

    let car = context.resolve::<garage::Car>().unwrap();
    assert_eq!(car.horn_air.honk(), "air");

    let dealer = context.resolve::<garage::Dealer>().unwrap();
    assert_eq!(dealer.horn.honk(), "electric");
    assert!(Arc::ptr_eq(&dealer.car, &car));

    let log = HOOK_LOG.lock().clone();
    let position = |name| log.iter().position(|entry| *entry == name).unwrap();
    assert!(position("HornAir") < position("Car"));
    assert!(position("Car") < position("Dealer"));
}

#[tokio::test]
async fn test_field_cycle_policies() {
    let result = ContainerBootstrapBuilder::new()
        .scan_inventory()
        .bootstrap::<cycle::Root>()
        .await;
    match result {
        Err(InfrastructureError::DependencyError {
            source: DependencyError::CyclicDependency { dependency_chain },
        }) => {
            assert!(dependency_chain.contains("Left"));
            assert!(dependency_chain.contains("Right"));
        }
        other => panic!("期望循环依赖错误, 实际: {:?}", other.map(|_| ())),
    }

    let context = ContainerBootstrapBuilder::new()
        .with_container_config(ContainerConfig {
            cycle_policy: CyclePolicy::AllowFieldCycles,
            ..ContainerConfig::default()
        })
        .scan_inventory()
        .bootstrap::<cycle::Root>()
        .await
        .unwrap();

    let left = context.resolve::<cycle::Left>().unwrap();
    let right = context.resolve::<cycle::Right>().unwrap();
    assert!(Arc::ptr_eq(left.right.get().unwrap(), &right));
    assert!(Arc::ptr_eq(right.left.get().unwrap(), &left));
}

#[tokio::test]
async fn test_failing_hook_aborts_bootstrap() {
    let result = ContainerBootstrapBuilder::new()
        .scan_inventory()
        .bootstrap::<failing::Root>()
        .await;

    match result {
        Err(InfrastructureError::DependencyError {
            source: DependencyError::LifecycleInvocationFailed { type_name, hook, .. },
        }) => {
            assert!(type_name.ends_with("Broken"));
            assert_eq!(hook, "explode");
        }
        other => panic!("期望初始化回调失败, 实际: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_namespaces_are_isolated() {
    let context = ContainerBootstrapBuilder::new()
        .scan_inventory()
        .bootstrap::<garage::Root>()
        .await
        .unwrap();

    assert!(!context.is_materialized::<cycle::Left>());
    assert!(matches!(
        context.resolve::<failing::Broken>(),
        Err(DependencyError::NoImplementationFound { .. })
    ));
    assert_eq!(context.container().stats().registered_components, 4);
}
