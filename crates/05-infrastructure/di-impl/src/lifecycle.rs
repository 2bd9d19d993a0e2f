//! 初始化回调执行器实现

use di_abstractions::LifecycleInvoker;
use infrastructure_common::{DependencyError, DependencyResult, Instance, TypeDescriptor};
use tracing::debug;

/// 按声明顺序执行 `post_construct` 回调
#[derive(Debug, Default, Clone, Copy)]
pub struct PostConstructInvoker;

impl LifecycleInvoker for PostConstructInvoker {
    fn run_post_construct(
        &self,
        descriptor: &TypeDescriptor,
        instance: &Instance,
    ) -> DependencyResult<()> {
        for hook in descriptor.post_construct_hooks() {
            debug!("执行初始化回调: {}::{}", descriptor.short_name(), hook.name);
            hook.invoke(&**instance)
                .map_err(|source| DependencyError::LifecycleInvocationFailed {
                    type_name: descriptor.type_info().type_name.to_string(),
                    hook: hook.name.clone(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<&'static str>>,
    }

    #[test]
    fn test_hooks_run_in_declaration_order() {
        let descriptor = TypeDescriptor::builder::<Recorder>()
            .post_construct("first", |recorder: &Recorder| {
                recorder.calls.lock().push("first");
                Ok(())
            })
            .post_construct("second", |recorder: &Recorder| {
                recorder.calls.lock().push("second");
                Ok(())
            })
            .build();
        let recorder = Arc::new(Recorder::default());
        let instance: Instance = recorder.clone();

        PostConstructInvoker
            .run_post_construct(&descriptor, &instance)
            .unwrap();
        assert_eq!(*recorder.calls.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_failing_hook_names_type_and_hook() {
        let descriptor = TypeDescriptor::builder::<Recorder>()
            .post_construct("broken", |_: &Recorder| Err("boom".into()))
            .post_construct("never", |recorder: &Recorder| {
                recorder.calls.lock().push("never");
                Ok(())
            })
            .build();
        let recorder = Arc::new(Recorder::default());
        let instance: Instance = recorder.clone();

        match PostConstructInvoker.run_post_construct(&descriptor, &instance) {
            Err(DependencyError::LifecycleInvocationFailed {
                type_name, hook, ..
            }) => {
                assert!(type_name.ends_with("Recorder"));
                assert_eq!(hook, "broken");
            }
            other => panic!("期望回调失败, 实际: {:?}", other),
        }
        assert!(recorder.calls.lock().is_empty());
    }
}
