// Plugin capability surface.
//
// One executor implements the whole capability interface; the RPC server and
// the in-process host are both thin adapters over `ActionPlugin`, so the
// decision logic exists exactly once.

pub mod descriptor;
pub mod executor;

use async_trait::async_trait;
use thiserror::Error;

use crate::executions::ReporterError;
use crate::models::{ExecuteTaskRequest, PayloadHandlerRequest, PluginDescriptor, Response};

pub use descriptor::descriptor;
pub use executor::{ActionsCheckExecutor, FlowDecision};

#[derive(Debug, Error)]
pub enum PluginError {
    /// A step update against the execution store failed. Fatal to the
    /// current invocation; the decision is never retried.
    #[error("step reporting failed: {0}")]
    Reporting(#[from] ReporterError),
    /// The operation is not part of this plugin's capability set.
    #[error("not implemented")]
    NotImplemented,
}

/// The capability interface every host adapter dispatches through.
///
/// An `Err` return surfaces to the host as `Response { success: false }`
/// alongside the error value, matching the wire contract.
#[async_trait]
pub trait ActionPlugin: Send + Sync {
    async fn execute_task(&self, request: ExecuteTaskRequest) -> Result<Response, PluginError>;

    async fn handle_payload(
        &self,
        request: PayloadHandlerRequest,
    ) -> Result<Response, PluginError>;

    /// Static self-description; always succeeds.
    fn info(&self) -> PluginDescriptor;
}
