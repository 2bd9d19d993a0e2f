//! 组件发现简化示例
//!
//! 不使用过程宏，直接用描述符构建器声明组件，并通过显式组件表启动容器。

use infrastructure_common::{
    Autowired, ComponentDefinition, InfrastructureResult, InjectionPoint, TypeDescriptor,
};
use infrastructure_composition::{ContainerBootstrapBuilder, LoggingConfig};
use std::sync::Arc;

/// 用户仓储契约
pub trait UserRepository: Send + Sync {
    fn find_name(&self, id: u64) -> Option<String>;
}

/// 内存仓储
#[derive(Default)]
pub struct MemoryUserRepository;

impl UserRepository for MemoryUserRepository {
    fn find_name(&self, id: u64) -> Option<String> {
        (id == 1).then(|| "alice".to_string())
    }
}

impl ComponentDefinition for MemoryUserRepository {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .implements::<dyn UserRepository>(|this| this)
            .default_constructor(Self::default)
            .build()
    }
}

/// 用户服务（构造函数注入）
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl ComponentDefinition for UserService {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .injectable_constructor(
                "new",
                vec![InjectionPoint::of::<dyn UserRepository>("repository")],
                |deps| {
                    Ok(Self {
                        repository: deps.take::<dyn UserRepository>()?,
                    })
                },
            )
            .build()
    }
}

/// 问候服务（字段注入 + 初始化回调）
#[derive(Default)]
pub struct GreetingService {
    users: Autowired<UserService>,
}

impl ComponentDefinition for GreetingService {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .field::<UserService, _>("users", |this: &GreetingService| &this.users)
            .default_constructor(Self::default)
            .post_construct("warm_up", |this: &GreetingService| {
                this.greet(1).map(|_| ()).ok_or_else(|| "用户 1 不存在".into())
            })
            .build()
    }
}

impl GreetingService {
    pub fn greet(&self, id: u64) -> Option<String> {
        self.users
            .repository
            .find_name(id)
            .map(|name| format!("你好, {}", name))
    }
}

struct Root;

#[tokio::main]
async fn main() -> InfrastructureResult<()> {
    let context = ContainerBootstrapBuilder::new()
        .with_logging(LoggingConfig::development())
        .with_components([
            MemoryUserRepository::descriptor as fn() -> TypeDescriptor,
            UserService::descriptor,
            GreetingService::descriptor,
        ])
        .bootstrap::<Root>()
        .await?;

    let greeting = context.resolve::<GreetingService>()?;
    println!("{}", greeting.greet(1).unwrap_or_default());
    println!("已启动 {} 个组件", context.report().materialized);
    Ok(())
}
