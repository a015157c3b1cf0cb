use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::env::config::EnvConfig;
use crate::env::errors::EnvError;
use crate::env::spaces::{BoxSpace, Space};
use crate::env::traits::Env;
use crate::env::types::{Action, Info, Observation, RenderMode};
use crate::runtime::channel::{Channel, Connector, ZmqConnector};
use crate::runtime::codec::{Reply, encode_request};
use crate::runtime::error::TransportError;
use crate::runtime::global::{self, TransportContext};

struct Connection<Ch> {
    id: Uuid,
    channel: Ch,
}

/// An environment simulated by a remote process behind a REQ/REP socket.
///
/// Every `step` is one request and at most one reply. If the reply does not
/// arrive within the configured timeout the channel is thrown away and
/// reopened, and the step reports a terminal, all-zero result instead of
/// failing.
///
/// The adapter blocks the calling thread; do not drive it from inside an
/// async task.
pub struct RemoteEnv<C: Connector = ZmqConnector> {
    config: EnvConfig,
    connector: C,
    context: Option<Arc<TransportContext>>,
    connection: Option<Connection<C::Channel>>,
    reconnects: u64,
}

impl RemoteEnv<ZmqConnector> {
    pub fn new(config: EnvConfig) -> Result<Self, EnvError> {
        Self::with_connector(config, ZmqConnector)
    }
}

impl<C: Connector> RemoteEnv<C> {
    pub fn with_connector(config: EnvConfig, connector: C) -> Result<Self, EnvError> {
        config.validate()?;
        let context = global::acquire()?;
        let mut env = Self {
            config,
            connector,
            context: Some(context),
            connection: None,
            reconnects: 0,
        };

        // The simulator may come up after us; the first step retries.
        if let Err(error) = env.connect() {
            warn!(endpoint = %env.config.endpoint, %error, "could not connect to server");
        }
        Ok(env)
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Identity of the live channel; changes every time it is recreated.
    pub fn channel_id(&self) -> Option<Uuid> {
        self.connection.as_ref().map(|c| c.id)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.context.is_none()
    }

    /// Number of recovery cycles run so far.
    pub fn reconnects(&self) -> u64 {
        self.reconnects
    }

    fn timeout_error(&self) -> TransportError {
        TransportError::Timeout {
            millis: self.config.timeout_ms,
        }
    }

    fn connect(&mut self) -> Result<(), TransportError> {
        let context = self.context.clone().ok_or(TransportError::Disconnected)?;
        info!(endpoint = %self.config.endpoint, "connecting to server");

        // The timer must be created on the runtime, so build it inside the future.
        let timeout = self.config.timeout();
        let attempt = context.block_on(async {
            tokio::time::timeout(timeout, self.connector.connect(&self.config.endpoint)).await
        })?;
        let channel = attempt.map_err(|_| self.timeout_error())??;

        let id = Uuid::new_v4();
        info!(endpoint = %self.config.endpoint, channel = %id, "connected");
        self.connection = Some(Connection { id, channel });
        Ok(())
    }

    fn disconnect(&mut self) {
        let Some(mut connection) = self.connection.take() else {
            return;
        };
        info!(endpoint = %self.config.endpoint, channel = %connection.id, "disconnecting from server");
        if let Some(context) = &self.context {
            let timeout = self.config.timeout();
            let closed = context.block_on(async {
                tokio::time::timeout(timeout, connection.channel.close()).await
            });
            if !matches!(closed, Ok(Ok(()))) {
                debug!(channel = %connection.id, "channel close did not finish cleanly");
            }
        }
    }

    fn reconnect(&mut self) {
        self.reconnects += 1;
        self.disconnect();
        if let Err(error) = self.connect() {
            warn!(endpoint = %self.config.endpoint, %error, "reconnect failed");
        }
    }

    async fn round_trip(&mut self, payload: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let timeout = self.config.timeout();
        let elapsed = self.timeout_error();
        let connection = self
            .connection
            .as_mut()
            .ok_or(TransportError::Disconnected)?;

        match tokio::time::timeout(timeout, connection.channel.send(payload)).await {
            Ok(sent) => sent?,
            Err(_) => return Err(elapsed),
        }
        match tokio::time::timeout(timeout, connection.channel.recv()).await {
            Ok(reply) => reply,
            Err(_) => Err(elapsed),
        }
    }

    fn degraded(&self) -> (Observation, f32, bool, Info) {
        (
            Observation::zeros(&self.config.observation_space),
            0.0,
            true,
            Info::new(),
        )
    }

    fn request(&mut self, action: &Action) -> Result<(Observation, f32, bool, Info), EnvError> {
        let context = self.context.clone().ok_or(EnvError::Closed)?;
        if !self.config.action_space.contains(action) {
            return Err(EnvError::InvalidAction(format!("{action:?}")));
        }

        let payload = encode_request(action);
        debug!(bytes = payload.len(), "sending request");

        match context.block_on(self.round_trip(payload))? {
            Ok(bytes) => match Reply::decode(&bytes, &self.config.observation_space)? {
                Some(reply) => Ok((reply.observation, reply.reward, reply.done, Info::new())),
                None => {
                    warn!(endpoint = %self.config.endpoint, "server sent an empty reply");
                    Ok(self.degraded())
                }
            },
            Err(error) => {
                // A REQ socket that missed its reply cannot send again; replace it.
                warn!(endpoint = %self.config.endpoint, %error, "no response from server");
                self.reconnect();
                Ok(self.degraded())
            }
        }
    }
}

impl<C: Connector> Env for RemoteEnv<C> {
    type Obs = Observation;
    type Act = Action;
    type Info = Info;

    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.request(&Action::None).map(|(obs, ..)| obs)
    }

    fn step(&mut self, act: Action) -> Result<(Observation, f32, bool, Info), EnvError> {
        self.request(&act)
    }

    fn render(&mut self, _mode: RenderMode) -> Result<(), EnvError> {
        // Remote environments are live; the agent does not control their rendering.
        Ok(())
    }

    fn close(&mut self) -> Result<(), EnvError> {
        if self.is_closed() {
            return Ok(());
        }
        self.disconnect();
        self.context = None;
        Ok(())
    }

    fn action_space(&self) -> &Space {
        &self.config.action_space
    }

    fn observation_space(&self) -> &BoxSpace {
        &self.config.observation_space
    }
}

impl<C: Connector> Drop for RemoteEnv<C> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
