use async_trait::async_trait;
use tracing::debug;
use zeromq::{ReqSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

use crate::runtime::error::TransportError;

/// A request/reply connection to one remote endpoint.
///
/// Strict lockstep: every `send` must be followed by one `recv` before the
/// next `send`.
#[async_trait]
pub trait Channel: Send {
    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransportError>;
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError>;
    /// Tear the connection down without flushing pending messages.
    async fn close(&mut self);
}

/// Opens channels. One connector serves every reconnect of an environment.
#[async_trait]
pub trait Connector: Send + Sync {
    type Channel: Channel;

    async fn connect(&self, endpoint: &str) -> Result<Self::Channel, TransportError>;
}

/// ZeroMQ REQ socket connector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZmqConnector;

#[async_trait]
impl Connector for ZmqConnector {
    type Channel = ZmqChannel;

    async fn connect(&self, endpoint: &str) -> Result<ZmqChannel, TransportError> {
        let mut socket = ReqSocket::new();
        socket.connect(endpoint).await?;
        Ok(ZmqChannel {
            socket: Some(socket),
        })
    }
}

pub struct ZmqChannel {
    socket: Option<ReqSocket>,
}

#[async_trait]
impl Channel for ZmqChannel {
    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransportError> {
        let socket = self.socket.as_mut().ok_or(TransportError::Disconnected)?;
        socket.send(ZmqMessage::from(payload)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        let socket = self.socket.as_mut().ok_or(TransportError::Disconnected)?;
        let message = socket.recv().await?;
        // REP replies arrive as one frame; join defensively.
        Ok(message
            .into_vec()
            .into_iter()
            .flat_map(|frame| frame.to_vec())
            .collect())
    }

    async fn close(&mut self) {
        // zeromq sockets do not linger: whatever is still queued is dropped here.
        if let Some(socket) = self.socket.take() {
            let _ = socket.close().await;
            debug!("socket closed");
        }
    }
}
