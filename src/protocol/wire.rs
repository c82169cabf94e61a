// Frame types exchanged with the host: one JSON object per line, request
// and reply correlated by id.

use serde::{Deserialize, Serialize};

use crate::models::{ExecuteTaskRequest, PayloadHandlerRequest, PluginDescriptor, Response};
use crate::protocol::handshake::Handshake;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Host-assigned correlation id, starting at 1. Id 0 is reserved for
    /// replies to frames that could not be parsed, where no request id is
    /// recoverable.
    pub id: u64,
    #[serde(flatten)]
    pub call: PluginCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum PluginCall {
    Handshake(Handshake),
    ExecuteTask(Box<ExecuteTaskRequest>),
    HandlePayload(PayloadHandlerRequest),
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub id: u64,
    #[serde(flatten)]
    pub body: ReplyBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyBody {
    /// Handshake accepted; operations are now callable on this connection.
    HandshakeAck { protocol_version: u32 },
    /// Outcome of execute_task / handle_payload: the response, plus the
    /// error value when the operation failed.
    Task {
        response: Response,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Descriptor returned by info.
    Info { plugin: PluginDescriptor },
    /// Connection-level refusal (handshake failure, malformed frame).
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HandshakeConfig;

    #[test]
    fn request_envelope_round_trips() {
        let frame = RequestEnvelope {
            id: 7,
            call: PluginCall::Handshake(Handshake::from_config(&HandshakeConfig::default())),
        };
        let line = serde_json::to_string(&frame).unwrap();
        let parsed: RequestEnvelope = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed.id, 7);
        assert!(matches!(parsed.call, PluginCall::Handshake(_)));
    }

    #[test]
    fn info_call_has_no_params() {
        let frame = RequestEnvelope {
            id: 1,
            call: PluginCall::Info,
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json.get("method").unwrap(), "info");
        assert!(json.get("params").is_none());
    }

    #[test]
    fn task_reply_omits_error_when_absent() {
        let reply = ReplyEnvelope {
            id: 3,
            body: ReplyBody::Task {
                response: Response::success(),
                error: None,
            },
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json.get("kind").unwrap(), "task");
        assert!(json.get("error").is_none());
    }
}
