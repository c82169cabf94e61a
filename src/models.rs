// Wire and data model shared between the RPC boundary, the executor and the
// execution-store client. Everything here crosses a process boundary, so it
// is all serde (de)serializable and owned per call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One configured workflow action, active or inactive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// A workflow definition: an ordered set of actions. Owned by the host,
/// read-only to the plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flow {
    pub id: Uuid,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Reference to the running execution this invocation belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Execution {
    pub id: Uuid,
}

/// Status of an execution step. Terminal statuses admit no further
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Finished,
    Canceled,
    Failed,
}

impl StepStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepStatus::Finished | StepStatus::Canceled | StepStatus::Failed
        )
    }
}

/// One unit of work inside a running execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionStep {
    pub id: Uuid,
    #[serde(default)]
    pub messages: Vec<String>,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_by: Option<String>,
}

/// Partial field set written against the execution store for one step.
/// Only constructible through the status-specific constructors, so a
/// canceled_by label cannot appear without a canceled status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepUpdate {
    pub id: Uuid,
    pub messages: Vec<String>,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_by: Option<String>,
}

impl StepUpdate {
    pub fn running(step_id: Uuid, message: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            id: step_id,
            messages: vec![message.to_string()],
            status: StepStatus::Running,
            started_at: Some(started_at),
            finished_at: None,
            canceled_at: None,
            canceled_by: None,
        }
    }

    pub fn finished(step_id: Uuid, message: &str, finished_at: DateTime<Utc>) -> Self {
        Self {
            id: step_id,
            messages: vec![message.to_string()],
            status: StepStatus::Finished,
            started_at: None,
            finished_at: Some(finished_at),
            canceled_at: None,
            canceled_by: None,
        }
    }

    pub fn canceled(
        step_id: Uuid,
        message: &str,
        canceled_by: &str,
        canceled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: step_id,
            messages: vec![message.to_string()],
            status: StepStatus::Canceled,
            started_at: None,
            finished_at: Some(canceled_at),
            canceled_at: Some(canceled_at),
            canceled_by: Some(canceled_by.to_string()),
        }
    }
}

/// Ambient configuration needed to reach the execution store. Travels with
/// every request so the plugin holds no store state of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub api_url: String,
    #[serde(default)]
    pub token: String,
}

/// Input to `execute_task`: the execution being advanced, the flow under
/// check, the step to report against, and the store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteTaskRequest {
    pub config: StoreConfig,
    pub execution: Execution,
    pub flow: Flow,
    pub step: ExecutionStep,
}

/// Input to `handle_payload`. Carried for wire compatibility; this plugin
/// rejects every payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadHandlerRequest {
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// RPC output: a success flag and an optional data map. The only key this
/// plugin ever populates is `"status": "canceled"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<HashMap<String, serde_json::Value>>,
}

impl Response {
    pub fn success() -> Self {
        Self {
            success: true,
            data: None,
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            data: None,
        }
    }

    pub fn canceled() -> Self {
        let mut data = HashMap::new();
        data.insert(
            "status".to_string(),
            serde_json::Value::String("canceled".to_string()),
        );
        Self {
            success: false,
            data: Some(data),
        }
    }
}

/// Static self-description returned by `info` for host-side discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub plugin_type: String,
    pub version: String,
    pub author: String,
    pub action: ActionDescriptor,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub action_type: String,
    pub icon: String,
    pub category: String,
    #[serde(default)]
    pub params: Vec<ParamSchema>,
    pub hidden: bool,
}

/// Parameter schema entry for actions that take configuration. This plugin
/// takes none; the type exists so the descriptor round-trips against hosts
/// that send populated schemas for other plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSchema {
    pub key: String,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
}
