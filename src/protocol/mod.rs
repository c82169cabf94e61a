// The plugin execution protocol: a versioned handshake gating three remote
// operations, framed as one JSON object per line over the transport.

pub mod handshake;
pub mod local;
pub mod server;
pub mod wire;

use thiserror::Error;

pub use handshake::{verify_handshake, Handshake, HandshakeError};
pub use local::{LocalHost, TaskOutcome};
pub use server::PluginServer;
pub use wire::{PluginCall, ReplyBody, ReplyEnvelope, RequestEnvelope};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed frame: {0}")]
    Frame(#[from] serde_json::Error),
    #[error(transparent)]
    Handshake(#[from] HandshakeError),
    #[error("connection closed before handshake")]
    ClosedBeforeHandshake,
}
