//! 组件启动器
//!
//! 负责协调组件发现、绑定注册表构建、依赖验证与实例化

use di_abstractions::{
    ComponentResolver, ComponentScanner, ContainerConfig, DiContainer, TypedComponentResolver,
};
use di_impl::{DiContainerBuilder, DiContainerImpl};
use infrastructure_common::{
    DependencyResult, InfrastructureError, InfrastructureResult, TypeDescriptor, TypeInfo,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// 启动报告
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// 根命名空间
    pub root_namespace: String,
    /// 发现的组件类型（去重后）
    pub components: Vec<TypeInfo>,
    /// 实例化的组件数量
    pub materialized: usize,
    /// 启动耗时
    pub elapsed: Duration,
}

/// 应用上下文
///
/// 持有启动完成的容器，所有组件都已实例化并完成初始化回调。
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    container: Arc<DiContainerImpl>,
    report: BootstrapReport,
}

impl ApplicationContext {
    /// 依赖注入容器
    pub fn container(&self) -> &Arc<DiContainerImpl> {
        &self.container
    }

    /// 启动报告
    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }

    /// 解析组件，`T` 可以是具体类型或 `dyn Contract`
    pub fn resolve<T>(&self) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container.resolve::<T>()
    }

    /// 使用限定符解析组件
    pub fn resolve_qualified<T>(&self, qualifier: &str) -> DependencyResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.container.resolve_qualified::<T>(qualifier)
    }

    /// 组件是否已实例化
    pub fn is_materialized<T: ?Sized + 'static>(&self) -> bool {
        self.container.is_materialized(&TypeInfo::of::<T>())
    }
}

/// 组件启动器
pub struct ComponentBootstrapper {
    /// 组件扫描器列表
    scanners: Vec<Box<dyn ComponentScanner>>,
    /// 容器配置
    config: ContainerConfig,
}

impl ComponentBootstrapper {
    /// 创建新的启动器
    pub fn new(scanners: Vec<Box<dyn ComponentScanner>>, config: ContainerConfig) -> Self {
        Self { scanners, config }
    }

    /// 以 `Root` 所在模块为根命名空间启动
    ///
    /// 组件之间的实例化顺序只受依赖关系约束，其余顺序不作保证。
    pub async fn bootstrap<Root: ?Sized + 'static>(&self) -> InfrastructureResult<ApplicationContext> {
        let root = TypeInfo::of::<Root>();
        self.bootstrap_namespace(root.module_path()).await
    }

    /// 以指定命名空间为根启动
    pub async fn bootstrap_namespace(
        &self,
        root_namespace: &str,
    ) -> InfrastructureResult<ApplicationContext> {
        info!("开始启动组件容器: {}", root_namespace);
        let started = Instant::now();

        // 第一步：发现组件
        let descriptors = self.discover(root_namespace).await?;
        let components: Vec<TypeInfo> = descriptors.iter().map(|d| *d.type_info()).collect();

        // 第二步：构建绑定注册表
        let container = DiContainerBuilder::new()
            .with_config(self.config.clone())
            .register_all(descriptors)
            .build()
            .map_err(|e| {
                error!("绑定注册失败: {}", e);
                InfrastructureError::from(e)
            })?;

        // 第三步：验证依赖关系（如果启用）
        if self.config.eager_validation {
            debug!("验证依赖关系");
            container.validate().map_err(|errors| {
                error!("依赖关系验证失败: {} 个问题", errors.len());
                InfrastructureError::ValidationFailed { errors }
            })?;
            info!("依赖关系验证通过");
        }

        // 第四步：实例化所有组件
        let materialized = container.materialize_all().map_err(|e| {
            error!("组件实例化失败: {}", e);
            InfrastructureError::from(e)
        })?;

        let report = BootstrapReport {
            root_namespace: root_namespace.to_string(),
            components,
            materialized,
            elapsed: started.elapsed(),
        };
        info!(
            "组件容器启动完成: {} 个组件, 耗时 {:?}",
            report.materialized, report.elapsed
        );

        Ok(ApplicationContext {
            container: Arc::new(container),
            report,
        })
    }

    async fn discover(&self, root_namespace: &str) -> InfrastructureResult<Vec<TypeDescriptor>> {
        let mut seen = HashSet::new();
        let mut descriptors = Vec::new();

        for scanner in &self.scanners {
            if !scanner.supports(root_namespace) {
                debug!("扫描器 {} 不支持 {}", scanner.name(), root_namespace);
                continue;
            }
            let found = scanner.discover_components(root_namespace).await?;
            debug!("扫描器 {} 发现 {} 个组件", scanner.name(), found.len());
            descriptors.extend(
                found
                    .into_iter()
                    .filter(|descriptor| seen.insert(*descriptor.type_info())),
            );
        }

        if descriptors.is_empty() {
            warn!("未在 {} 下发现任何组件", root_namespace);
        }
        Ok(descriptors)
    }
}

impl std::fmt::Debug for ComponentBootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentBootstrapper")
            .field(
                "scanners",
                &self.scanners.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}
