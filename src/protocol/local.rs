// In-process host adapter. Hosts that load the plugin as a library dispatch
// plain function calls instead of wire frames; this translates their call
// shape onto the same capability interface the RPC server uses.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    ExecuteTaskRequest, Execution, ExecutionStep, Flow, PayloadHandlerRequest, PluginDescriptor,
    Response, StoreConfig,
};
use crate::plugin::{ActionPlugin, PluginError};

/// Mutually exclusive terminal outcome of one task invocation, replacing the
/// legacy finished/canceled/failed flag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Finished,
    Canceled,
    Failed { error: String },
}

pub struct LocalHost {
    plugin: Arc<dyn ActionPlugin>,
}

impl LocalHost {
    pub fn new(plugin: Arc<dyn ActionPlugin>) -> Self {
        Self { plugin }
    }

    /// Run the task for one step and fold the result into the outcome the
    /// dispatch host consumes.
    pub async fn execute(
        &self,
        config: StoreConfig,
        execution: Execution,
        flow: Flow,
        step: ExecutionStep,
    ) -> (Option<HashMap<String, serde_json::Value>>, TaskOutcome) {
        let request = ExecuteTaskRequest {
            config,
            execution,
            flow,
            step,
        };
        match self.plugin.execute_task(request).await {
            Ok(Response { success: true, data }) => (data, TaskOutcome::Finished),
            Ok(Response { success: false, data }) => (data, TaskOutcome::Canceled),
            Err(e) => (
                None,
                TaskOutcome::Failed {
                    error: e.to_string(),
                },
            ),
        }
    }

    pub async fn handle_payload(
        &self,
        request: PayloadHandlerRequest,
    ) -> Result<Response, PluginError> {
        self.plugin.handle_payload(request).await
    }

    pub fn info(&self) -> PluginDescriptor {
        self.plugin.info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executions::ReporterError;
    use crate::models::StepStatus;
    use crate::plugin::descriptor;
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Stub plugin with a scripted execute_task result.
    struct ScriptedPlugin {
        result: fn() -> Result<Response, PluginError>,
    }

    #[async_trait]
    impl ActionPlugin for ScriptedPlugin {
        async fn execute_task(
            &self,
            _request: ExecuteTaskRequest,
        ) -> Result<Response, PluginError> {
            (self.result)()
        }

        async fn handle_payload(
            &self,
            _request: PayloadHandlerRequest,
        ) -> Result<Response, PluginError> {
            Err(PluginError::NotImplemented)
        }

        fn info(&self) -> PluginDescriptor {
            descriptor()
        }
    }

    fn host(result: fn() -> Result<Response, PluginError>) -> LocalHost {
        LocalHost::new(Arc::new(ScriptedPlugin { result }))
    }

    fn inputs() -> (StoreConfig, Execution, Flow, ExecutionStep) {
        (
            StoreConfig {
                api_url: "http://127.0.0.1:1".to_string(),
                token: String::new(),
            },
            Execution { id: Uuid::new_v4() },
            Flow {
                id: Uuid::new_v4(),
                actions: Vec::new(),
            },
            ExecutionStep {
                id: Uuid::new_v4(),
                messages: Vec::new(),
                status: StepStatus::Pending,
                started_at: None,
                finished_at: None,
                canceled_at: None,
                canceled_by: None,
            },
        )
    }

    #[tokio::test]
    async fn success_folds_to_finished() {
        let host = host(|| Ok(Response::success()));
        let (config, execution, flow, step) = inputs();
        let (data, outcome) = host.execute(config, execution, flow, step).await;
        assert_eq!(outcome, TaskOutcome::Finished);
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn cancellation_folds_to_canceled_with_data() {
        let host = host(|| Ok(Response::canceled()));
        let (config, execution, flow, step) = inputs();
        let (data, outcome) = host.execute(config, execution, flow, step).await;
        assert_eq!(outcome, TaskOutcome::Canceled);
        assert_eq!(data.unwrap().get("status").unwrap(), "canceled");
    }

    #[tokio::test]
    async fn reporting_error_folds_to_failed() {
        let host = host(|| {
            Err(PluginError::Reporting(ReporterError::UnexpectedStatus {
                status: 500,
                body: "down".to_string(),
            }))
        });
        let (config, execution, flow, step) = inputs();
        let (data, outcome) = host.execute(config, execution, flow, step).await;
        assert!(data.is_none());
        match outcome {
            TaskOutcome::Failed { error } => assert!(error.contains("step reporting failed")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
