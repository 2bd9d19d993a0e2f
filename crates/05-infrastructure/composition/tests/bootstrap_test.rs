//! 组件启动流程集成测试

use di_abstractions::{ContainerConfig, CyclePolicy, DiContainer};
use infrastructure_common::{
    Autowired, ComponentDefinition, DependencyError, InjectionPoint, TypeDescriptor,
};
use infrastructure_composition::{
    ContainerBootstrapBuilder, InfrastructureError, StaticComponentScanner,
};
use std::io::Write;
use std::sync::Arc;

mod app {
    use super::*;

    pub trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    #[derive(Debug, Default)]
    pub struct English;

    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    impl ComponentDefinition for English {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .implements::<dyn Greeter>(|this| this)
                .default_constructor(Self::default)
                .build()
        }
    }

    #[derive(Debug, Default)]
    pub struct Chinese;

    impl Greeter for Chinese {
        fn greet(&self) -> String {
            "你好".to_string()
        }
    }

    impl ComponentDefinition for Chinese {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .implements::<dyn Greeter>(|this| this)
                .default_constructor(Self::default)
                .build()
        }
    }

    pub struct Reception {
        pub greeter: Arc<dyn Greeter>,
    }

    impl ComponentDefinition for Reception {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::builder::<Self>()
                .injectable_constructor(
                    "new",
                    vec![InjectionPoint::of::<dyn Greeter>("greeter").qualifier("Chinese")],
                    |deps| {
                        Ok(Self {
                            greeter: deps.take::<dyn Greeter>()?,
                        })
                    },
                )
                .build()
        }
    }

    /// 根类型，只用于确定根命名空间
    pub struct Root;

    pub mod broken {
        use super::*;

        #[derive(Default)]
        pub struct Lonely {
            pub greeter: Autowired<dyn Greeter>,
            pub missing: Autowired<Missing>,
        }

        pub struct Missing;

        impl ComponentDefinition for Lonely {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::builder::<Self>()
                    .field::<dyn Greeter, _>("greeter", |lonely: &Lonely| &lonely.greeter)
                    .field::<Missing, _>("missing", |lonely: &Lonely| &lonely.missing)
                    .default_constructor(Self::default)
                    .build()
            }
        }
    }
}

fn scanner() -> StaticComponentScanner {
    StaticComponentScanner::new()
        .with_component::<app::English>()
        .with_component::<app::Chinese>()
        .with_component::<app::Reception>()
        .with_component::<app::broken::Lonely>()
}

/// 测试完整启动流程
#[tokio::test]
async fn test_bootstrap_materializes_every_component() {
    let context = ContainerBootstrapBuilder::new()
        .add_component_scanner(
            StaticComponentScanner::new()
                .with_component::<app::English>()
                .with_component::<app::Chinese>()
                .with_component::<app::Reception>(),
        )
        .bootstrap::<app::Root>()
        .await
        .unwrap();

    let report = context.report();
    assert_eq!(report.components.len(), 3);
    assert_eq!(report.materialized, 3);
    assert!(report.root_namespace.ends_with("::app"));

    assert!(context.is_materialized::<app::English>());
    let reception = context.resolve::<app::Reception>().unwrap();
    assert_eq!(reception.greeter.greet(), "你好");

    let english = context.resolve_qualified::<dyn app::Greeter>("English").unwrap();
    assert_eq!(english.greet(), "hello");
}

/// 测试启动前的依赖验证收集所有问题
#[tokio::test]
async fn test_eager_validation_reports_all_problems() {
    let result = ContainerBootstrapBuilder::new()
        .add_component_scanner(scanner())
        .bootstrap::<app::Root>()
        .await;

    match result {
        Err(InfrastructureError::ValidationFailed { errors }) => {
            assert_eq!(errors.len(), 2);
            assert!(errors.iter().any(|e| matches!(
                e,
                DependencyError::AmbiguousImplementation { candidates: 2, .. }
            )));
            assert!(errors
                .iter()
                .any(|e| matches!(e, DependencyError::NoImplementationFound { .. })));
        }
        other => panic!("期望验证失败, 实际: {:?}", other.map(|_| ())),
    }
}

/// 测试关闭验证后在实例化时失败
#[tokio::test]
async fn test_lazy_failure_without_validation() {
    let result = ContainerBootstrapBuilder::new()
        .with_container_config(ContainerConfig {
            eager_validation: false,
            ..ContainerConfig::default()
        })
        .add_component_scanner(scanner())
        .bootstrap::<app::Root>()
        .await;

    assert!(matches!(
        result,
        Err(InfrastructureError::DependencyError { .. })
    ));
}

/// 测试只启动子命名空间
#[tokio::test]
async fn test_bootstrap_sub_namespace() {
    let bootstrapper = ContainerBootstrapBuilder::new()
        .add_component_scanner(
            StaticComponentScanner::new()
                .with_component::<app::English>()
                .with_component::<app::Reception>(),
        )
        .build()
        .unwrap();

    let context = bootstrapper.bootstrap::<app::English>().await.unwrap();
    assert_eq!(context.report().materialized, 2);

    let nothing = bootstrapper
        .bootstrap::<app::broken::Missing>()
        .await
        .unwrap();
    assert_eq!(nothing.report().materialized, 0);
}

/// 测试未配置扫描器
#[tokio::test]
async fn test_builder_requires_scanner() {
    assert!(matches!(
        ContainerBootstrapBuilder::new().build(),
        Err(InfrastructureError::BootstrapFailed { .. })
    ));
}

/// 测试从配置文件加载容器配置
#[tokio::test]
async fn test_builder_with_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[container]\ncycle_policy = \"allow_field_cycles\"\neager_validation = false"
    )
    .unwrap();

    let context = ContainerBootstrapBuilder::new()
        .add_config_toml(file.path())
        .unwrap()
        .add_component_scanner(StaticComponentScanner::new().with_component::<app::English>())
        .bootstrap::<app::Root>()
        .await
        .unwrap();

    let config = context.container().config();
    assert_eq!(config.cycle_policy, CyclePolicy::AllowFieldCycles);
    assert!(!config.eager_validation);

    assert!(matches!(
        ContainerBootstrapBuilder::new().add_config_toml("/no/such/file.toml"),
        Err(InfrastructureError::ConfigError { .. })
    ));
}
