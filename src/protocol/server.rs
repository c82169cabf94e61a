// RPC server adapter: a loopback TCP listener, one task per connection,
// every connection gated by the handshake frame before any operation is
// dispatched.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{
    tcp::{OwnedReadHalf, OwnedWriteHalf},
    TcpListener, TcpStream,
};
use tracing::{error, info, warn};

use crate::config::HandshakeConfig;
use crate::plugin::ActionPlugin;
use crate::protocol::handshake::{verify_environment, verify_handshake};
use crate::protocol::wire::{PluginCall, ReplyBody, ReplyEnvelope, RequestEnvelope};
use crate::protocol::ProtocolError;

pub struct PluginServer {
    handshake: HandshakeConfig,
    plugin: Arc<dyn ActionPlugin>,
}

impl PluginServer {
    pub fn new(handshake: HandshakeConfig, plugin: Arc<dyn ActionPlugin>) -> Self {
        Self { handshake, plugin }
    }

    /// Serve connections forever. Refuses to start when the host did not
    /// place the magic cookie in our environment. Prints the discovery line
    /// (`version|tcp|addr`) on stdout once the listener is bound, which is
    /// how the host learns where to connect.
    pub async fn serve(&self, addr: &str) -> Result<(), ProtocolError> {
        verify_environment(&self.handshake)?;

        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        println!("{}|tcp|{}", self.handshake.protocol_version, local_addr);
        self.serve_on(listener).await
    }

    /// Accept loop over an already-bound listener.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<(), ProtocolError> {
        info!(addr = ?listener.local_addr(), "Plugin serving");
        loop {
            let (stream, peer) = listener.accept().await?;
            let handshake = self.handshake.clone();
            let plugin = Arc::clone(&self.plugin);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(handshake, plugin, stream).await {
                    warn!(peer = %peer, "Connection ended with error: {e}");
                }
            });
        }
    }
}

async fn handle_connection(
    handshake: HandshakeConfig,
    plugin: Arc<dyn ActionPlugin>,
    stream: TcpStream,
) -> Result<(), ProtocolError> {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut writer = BufWriter::new(write_half);

    expect_handshake(&handshake, &mut reader, &mut writer).await?;

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let reply = match serde_json::from_str::<RequestEnvelope>(&line) {
            Ok(request) => ReplyEnvelope {
                id: request.id,
                body: dispatch(plugin.as_ref(), request.call).await,
            },
            Err(e) => {
                error!("Dropping malformed frame: {e}");
                ReplyEnvelope {
                    // Reserved id: the request id is unrecoverable here.
                    id: 0,
                    body: ReplyBody::Error {
                        message: format!("malformed frame: {e}"),
                    },
                }
            }
        };
        write_reply(&mut writer, &reply).await?;
    }
}

/// Read and verify the handshake frame. Any mismatch is answered with a
/// refusal and ends the connection before an operation is reachable.
async fn expect_handshake(
    config: &HandshakeConfig,
    reader: &mut BufReader<OwnedReadHalf>,
    writer: &mut BufWriter<OwnedWriteHalf>,
) -> Result<(), ProtocolError> {
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(ProtocolError::ClosedBeforeHandshake);
    }
    let request: RequestEnvelope = serde_json::from_str(&line)?;

    let offered = match request.call {
        PluginCall::Handshake(offered) => offered,
        _ => {
            let reply = ReplyEnvelope {
                id: request.id,
                body: ReplyBody::Error {
                    message: "handshake required before any operation".to_string(),
                },
            };
            write_reply(writer, &reply).await?;
            return Err(ProtocolError::ClosedBeforeHandshake);
        }
    };

    match verify_handshake(config, &offered) {
        Ok(()) => {
            let reply = ReplyEnvelope {
                id: request.id,
                body: ReplyBody::HandshakeAck {
                    protocol_version: config.protocol_version,
                },
            };
            write_reply(writer, &reply).await?;
            Ok(())
        }
        Err(e) => {
            warn!("Rejecting connection: {e}");
            let reply = ReplyEnvelope {
                id: request.id,
                body: ReplyBody::Error {
                    message: e.to_string(),
                },
            };
            write_reply(writer, &reply).await?;
            Err(e.into())
        }
    }
}

/// Translate one wire call into a capability-interface call. Errors from the
/// plugin surface as `success: false` plus the error value, never as a
/// dropped reply.
pub(crate) async fn dispatch(plugin: &dyn ActionPlugin, call: PluginCall) -> ReplyBody {
    match call {
        PluginCall::Handshake(_) => ReplyBody::Error {
            message: "handshake already completed".to_string(),
        },
        PluginCall::ExecuteTask(request) => match plugin.execute_task(*request).await {
            Ok(response) => ReplyBody::Task {
                response,
                error: None,
            },
            Err(e) => ReplyBody::Task {
                response: crate::models::Response::failure(),
                error: Some(e.to_string()),
            },
        },
        PluginCall::HandlePayload(request) => match plugin.handle_payload(request).await {
            Ok(response) => ReplyBody::Task {
                response,
                error: None,
            },
            Err(e) => ReplyBody::Task {
                response: crate::models::Response::failure(),
                error: Some(e.to_string()),
            },
        },
        PluginCall::Info => ReplyBody::Info {
            plugin: plugin.info(),
        },
    }
}

async fn write_reply(
    writer: &mut BufWriter<OwnedWriteHalf>,
    reply: &ReplyEnvelope,
) -> Result<(), ProtocolError> {
    let line = serde_json::to_string(reply)?;
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
