//! 错误类型定义

use thiserror::Error;

/// 用户代码（构造函数、字段注入、生命周期回调）返回的错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖注入错误类型
///
/// 所有变体对启动流程都是致命的，不会在本地恢复或重试。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("未找到契约的实现: {contract}")]
    NoImplementationFound { contract: String },

    #[error("契约 {contract} 存在 {candidates} 个实现，请使用限定符(qualifier)指定")]
    AmbiguousImplementation { contract: String, candidates: usize },

    #[error("组件 {type_name} 声明了 {count} 个可注入构造函数，最多只允许一个")]
    MultipleInjectableConstructors { type_name: String, count: usize },

    #[error("组件实例化失败: {type_name}, 原因: {source}")]
    InstantiationFailure { type_name: String, source: BoxError },

    #[error("字段注入失败: {type_name}.{field}, 原因: {source}")]
    FieldInjectionFailure {
        type_name: String,
        field: String,
        source: BoxError,
    },

    #[error("初始化回调执行失败: {type_name}::{hook}, 原因: {source}")]
    LifecycleInvocationFailed {
        type_name: String,
        hook: String,
        source: BoxError,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CyclicDependency { dependency_chain: String },

    #[error("依赖解析深度超过上限 {max_depth}: {type_name}")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },

    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },
}

impl DependencyError {
    /// 创建注册错误
    pub fn registration(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistrationError {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 出错的组件、契约或回调所属类型的名称
    pub fn subject(&self) -> &str {
        match self {
            Self::NoImplementationFound { contract }
            | Self::AmbiguousImplementation { contract, .. } => contract,
            Self::MultipleInjectableConstructors { type_name, .. }
            | Self::InstantiationFailure { type_name, .. }
            | Self::FieldInjectionFailure { type_name, .. }
            | Self::LifecycleInvocationFailed { type_name, .. }
            | Self::ResolutionDepthExceeded { type_name, .. }
            | Self::RegistrationError { type_name, .. } => type_name,
            Self::CyclicDependency { dependency_chain } => dependency_chain,
            Self::TypeMismatch { expected, .. } => expected,
        }
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件发现失败: {root}, 原因: {message}")]
    DiscoveryFailure { root: String, message: String },
}

impl ComponentError {
    /// 创建发现错误
    pub fn discovery_failure(root: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DiscoveryFailure {
            root: root.into(),
            message: message.into(),
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("依赖关系验证失败: {}", format_errors(.errors))]
    ValidationFailed { errors: Vec<DependencyError> },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

fn format_errors(errors: &[DependencyError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
