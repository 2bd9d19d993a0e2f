//! 喇叭示例端到端测试

use di_abstractions::DiContainer;
use horn_demo::{component_table, Car, CarService, Horn, HornAir, HornDemo, TruckService};
use infrastructure_common::DependencyError;
use infrastructure_composition::{ApplicationContext, ContainerBootstrapBuilder};
use std::sync::Arc;

async fn start() -> ApplicationContext {
    ContainerBootstrapBuilder::new()
        .with_components(component_table())
        .bootstrap::<HornDemo>()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_field_injection_with_qualifier() {
    let context = start().await;

    let car = context.resolve::<Car>().unwrap();
    assert_eq!(car.last_honk(), Some("Air Horn Implementation called."));

    let truck = context.resolve::<TruckService>().unwrap();
    assert_eq!(
        truck.last_honk(),
        Some("Electric Horn Implementation called")
    );
}

#[tokio::test]
async fn test_constructor_injection_with_qualifier() {
    let context = start().await;

    let service = context.resolve::<CarService>().unwrap();
    assert_eq!(service.last_honk(), Some("Air Horn Implementation called."));

    service.odometer().increment();
    service.odometer().increment();
    assert_eq!(context.resolve::<CarService>().unwrap().odometer().reading(), 2);
}

#[tokio::test]
async fn test_every_component_materialized_once() {
    let context = start().await;

    assert_eq!(context.report().materialized, 5);
    assert_eq!(context.container().stats().active_singletons, 5);

    let air = context.resolve::<HornAir>().unwrap();
    assert!(air.is_initialized());

    let qualified = context.resolve_qualified::<dyn Horn>("HornAir").unwrap();
    let qualified_ptr = Arc::as_ptr(&qualified) as *const ();
    assert_eq!(qualified_ptr, Arc::as_ptr(&air) as *const ());
}

#[tokio::test]
async fn test_unqualified_horn_is_ambiguous() {
    let context = start().await;

    match context.resolve::<dyn Horn>() {
        Err(DependencyError::AmbiguousImplementation { candidates, .. }) => {
            assert_eq!(candidates, 2);
        }
        other => panic!("期望歧义错误, 实际: {:?}", other.map(|h| h.honk())),
    }

    let electric = context.resolve_qualified::<dyn Horn>("hornelectric").unwrap();
    assert_eq!(electric.honk(), "Electric Horn Implementation called");

    assert!(matches!(
        context.resolve_qualified::<dyn Horn>("horn_electric"),
        Err(DependencyError::AmbiguousImplementation { candidates: 2, .. })
    ));
}
