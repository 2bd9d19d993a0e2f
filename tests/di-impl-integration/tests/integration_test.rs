//! di-impl 的集中集成测试
//!
//! 通过抽象层 trait（`DiContainer`、`BindingRegistry`、`LifecycleInvoker`）使用容器。

use di_abstractions::{
    BindingRegistry, ComponentResolver, ContainerConfig, DiContainer, LifecycleInvoker,
    TypedComponentResolver,
};
use di_impl::{BindingRegistryImpl, DiContainerBuilder, DiContainerImpl, PostConstructInvoker};
use infrastructure_common::{
    Autowired, DependencyError, DependencyResult, Instance, InjectionPoint, ResolutionHint,
    TypeDescriptor, TypeInfo,
};
use parking_lot::Mutex;
use std::sync::Arc;

trait Storage: Send + Sync {
    fn kind(&self) -> &'static str;
}

#[derive(Default)]
struct MemoryStorage;

impl Storage for MemoryStorage {
    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[derive(Default)]
struct DiskStorage;

impl Storage for DiskStorage {
    fn kind(&self) -> &'static str {
        "disk"
    }
}

struct Repository {
    storage: Arc<dyn Storage>,
}

#[derive(Default)]
struct Controller {
    repository: Autowired<Repository>,
}

fn memory_storage() -> TypeDescriptor {
    TypeDescriptor::builder::<MemoryStorage>()
        .implements::<dyn Storage>(|this| this)
        .default_constructor(MemoryStorage::default)
        .build()
}

fn disk_storage() -> TypeDescriptor {
    TypeDescriptor::builder::<DiskStorage>()
        .implements::<dyn Storage>(|this| this)
        .default_constructor(DiskStorage::default)
        .build()
}

fn repository(qualifier: &str) -> TypeDescriptor {
    TypeDescriptor::builder::<Repository>()
        .injectable_constructor(
            "new",
            vec![InjectionPoint::of::<dyn Storage>("storage").qualifier(qualifier)],
            |deps| {
                Ok(Repository {
                    storage: deps.take::<dyn Storage>()?,
                })
            },
        )
        .build()
}

fn controller() -> TypeDescriptor {
    TypeDescriptor::builder::<Controller>()
        .field::<Repository, _>("repository", |c: &Controller| &c.repository)
        .default_constructor(Controller::default)
        .build()
}

fn application(qualifier: &str) -> Arc<dyn DiContainer> {
    let container = DiContainerBuilder::new()
        .register(memory_storage())
        .register(disk_storage())
        .register(repository(qualifier))
        .register(controller())
        .build()
        .unwrap();
    Arc::new(container)
}

/// 记录回调执行顺序的执行器
#[derive(Default)]
struct RecordingInvoker {
    order: Mutex<Vec<&'static str>>,
}

impl LifecycleInvoker for RecordingInvoker {
    fn run_post_construct(
        &self,
        descriptor: &TypeDescriptor,
        instance: &Instance,
    ) -> DependencyResult<()> {
        self.order.lock().push(descriptor.short_name());
        PostConstructInvoker.run_post_construct(descriptor, instance)
    }
}

#[test]
fn test_container_through_trait_object() {
    let container = application("DiskStorage");

    let controller = container.resolve::<Controller>().unwrap();
    assert_eq!(controller.repository.storage.kind(), "disk");

    let repository = container.resolve::<Repository>().unwrap();
    assert!(Arc::ptr_eq(controller.repository.get().unwrap(), &repository));

    assert_eq!(container.registered_components().len(), 4);
    assert_eq!(container.materialize_all().unwrap(), 4);
    assert!(container.validate().is_ok());
}

#[test]
fn test_contract_view_shares_singleton() {
    let container = application("MemoryStorage");

    let concrete = container.resolve::<MemoryStorage>().unwrap();
    let view = container
        .resolve_qualified::<dyn Storage>("memoryStorage")
        .unwrap();

    assert_eq!(view.kind(), "memory");
    assert_eq!(
        Arc::as_ptr(&view) as *const (),
        Arc::as_ptr(&concrete) as *const ()
    );
}

#[test]
fn test_resolve_view_holds_concrete_arc() {
    let container = application("MemoryStorage");

    let view = container
        .resolve_view(&TypeInfo::of::<MemoryStorage>(), &ResolutionHint::none())
        .unwrap();
    assert!(view.downcast_ref::<Arc<MemoryStorage>>().is_some());
    assert!(view.downcast_ref::<Arc<DiskStorage>>().is_none());
}

#[test]
fn test_stats_count_resolutions_and_errors() {
    let container = application("Missing");

    assert!(container.resolve::<MemoryStorage>().is_ok());
    let error = container.resolve::<Controller>().err().unwrap();
    assert!(matches!(
        error,
        DependencyError::AmbiguousImplementation { candidates: 2, .. }
    ));
    assert!(error.subject().ends_with("Storage"));

    let stats = container.stats();
    assert_eq!(stats.registered_components, 4);
    assert_eq!(stats.resolutions, 2);
    assert_eq!(stats.resolution_errors, 1);
    // 失败的解析不会留下 Controller 或 Repository
    assert_eq!(stats.active_singletons, 1);
    assert!(!container.is_materialized(&TypeInfo::of::<Controller>()));
}

#[test]
fn test_custom_lifecycle_invoker() {
    let invoker = Arc::new(RecordingInvoker::default());
    let container = DiContainerBuilder::new()
        .with_lifecycle_invoker(invoker.clone())
        .register(memory_storage())
        .register(repository("MemoryStorage"))
        .register(controller())
        .build()
        .unwrap();

    container.resolve::<Controller>().unwrap();
    container.resolve::<Controller>().unwrap();

    assert_eq!(
        *invoker.order.lock(),
        vec!["MemoryStorage", "Repository", "Controller"]
    );
}

#[test]
fn test_registry_seam() {
    let mut registry = BindingRegistryImpl::new();
    registry.register(memory_storage()).unwrap();
    registry.register(disk_storage()).unwrap();

    let duplicate = registry.register(memory_storage());
    assert!(matches!(
        duplicate,
        Err(DependencyError::RegistrationError { .. })
    ));

    let contract = TypeInfo::of::<dyn Storage>();
    assert_eq!(registry.candidates(&contract).len(), 2);
    assert_eq!(
        registry
            .resolve_implementation(&contract, &ResolutionHint::named("diskStorage"))
            .unwrap(),
        TypeInfo::of::<DiskStorage>()
    );

    let container = DiContainerImpl::new(registry, ContainerConfig::default());
    assert_eq!(container.registry().len(), 2);
    assert_eq!(
        container
            .resolve_qualified::<dyn Storage>("DiskStorage")
            .unwrap()
            .kind(),
        "disk"
    );
}
