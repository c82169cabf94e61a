// Actions Check plugin - flow action gate for the workflow runner
// This exposes the core components for testing and integration

pub mod config;
pub mod executions;
pub mod models;
pub mod plugin;
pub mod protocol;
pub mod telemetry;

// Re-export key types for easy access
pub use config::{HandshakeConfig, ListenConfig, PluginConfig};
pub use executions::{HttpStepReporter, ReporterError, StepReporter};
pub use models::{
    Action, ExecuteTaskRequest, Execution, ExecutionStep, Flow, PayloadHandlerRequest,
    PluginDescriptor, Response, StepStatus, StepUpdate, StoreConfig,
};
pub use plugin::{descriptor, ActionPlugin, ActionsCheckExecutor, FlowDecision, PluginError};
pub use protocol::{
    Handshake, HandshakeError, LocalHost, PluginCall, PluginServer, ProtocolError, ReplyBody,
    ReplyEnvelope, RequestEnvelope, TaskOutcome,
};
pub use telemetry::init_telemetry;
