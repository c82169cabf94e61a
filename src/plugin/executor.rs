// The task decision machine: one running report, one pure decision over the
// flow's action set, one terminal report. Any failed report aborts the
// invocation.

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::executions::StepReporter;
use crate::models::{
    ExecuteTaskRequest, Flow, PayloadHandlerRequest, PluginDescriptor, Response, StepUpdate,
};
use crate::plugin::{descriptor, ActionPlugin, PluginError};

const CANCELED_BY: &str = "Flow Action Check";

/// Mutually exclusive outcome of checking a flow's action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDecision {
    /// The flow defines no actions at all.
    NoActions,
    /// Actions exist but every one of them is inactive.
    NoActiveActions,
    /// At least one action is active; execution may proceed.
    HasActiveActions,
}

impl FlowDecision {
    pub fn evaluate(flow: &Flow) -> Self {
        if flow.actions.is_empty() {
            return FlowDecision::NoActions;
        }
        let active = flow.actions.iter().filter(|action| action.active).count();
        if active == 0 {
            FlowDecision::NoActiveActions
        } else {
            FlowDecision::HasActiveActions
        }
    }
}

/// The consolidated task executor behind both host adapters.
pub struct ActionsCheckExecutor<R: StepReporter> {
    reporter: R,
}

impl<R: StepReporter> ActionsCheckExecutor<R> {
    pub fn new(reporter: R) -> Self {
        Self { reporter }
    }
}

#[async_trait]
impl<R: StepReporter> ActionPlugin for ActionsCheckExecutor<R> {
    async fn execute_task(&self, request: ExecuteTaskRequest) -> Result<Response, PluginError> {
        let execution_id = request.execution.id;
        let step_id = request.step.id;

        // Step transitions are monotonic: a host never hands us a step that
        // already reached a terminal status.
        debug_assert!(
            !request.step.status.is_terminal(),
            "step {step_id} is already terminal"
        );

        // The one fatal path: if the running report fails, no decision runs.
        self.reporter
            .update_step(
                &request.config,
                execution_id,
                StepUpdate::running(step_id, "Checking for flow actions", Utc::now()),
            )
            .await?;

        let decision = FlowDecision::evaluate(&request.flow);
        info!(
            execution_id = %execution_id,
            step_id = %step_id,
            flow_id = %request.flow.id,
            decision = ?decision,
            "Flow action check decided"
        );

        let (update, response) = match decision {
            FlowDecision::NoActions => (
                StepUpdate::canceled(
                    step_id,
                    "Flow has no Actions defined. Cancel execution",
                    CANCELED_BY,
                    Utc::now(),
                ),
                Response::canceled(),
            ),
            FlowDecision::NoActiveActions => (
                StepUpdate::canceled(
                    step_id,
                    "Flow has no active Actions defined. Cancel execution",
                    CANCELED_BY,
                    Utc::now(),
                ),
                Response::canceled(),
            ),
            FlowDecision::HasActiveActions => (
                StepUpdate::finished(step_id, "Flow has Actions defined", Utc::now()),
                Response::success(),
            ),
        };

        // The decision is made; a failed terminal report surfaces the error
        // without re-reporting.
        self.reporter
            .update_step(&request.config, execution_id, update)
            .await?;

        Ok(response)
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
