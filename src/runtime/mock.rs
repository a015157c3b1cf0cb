use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::runtime::channel::{Channel, Connector};
use crate::runtime::error::TransportError;

/// What the fake server does with the next request.
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Reply(Vec<u8>),
    /// Never answers.
    Silent,
    SendFails,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ConnectBehaviour {
    Accept,
    Hang,
    Refuse,
}

#[derive(Debug, Default)]
struct State {
    script: VecDeque<Scripted>,
    connect_plan: VecDeque<ConnectBehaviour>,
    requests: Vec<Vec<u8>>,
    connects: usize,
    closes: usize,
}

/// In-memory connector whose channels follow a shared script.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedConnector {
    state: Arc<Mutex<State>>,
}

impl ScriptedConnector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, text: &str) -> &Self {
        self.push(Scripted::Reply(text.as_bytes().to_vec()))
    }

    pub(crate) fn silent(&self) -> &Self {
        self.push(Scripted::Silent)
    }

    pub(crate) fn push(&self, step: Scripted) -> &Self {
        self.state.lock().unwrap().script.push_back(step);
        self
    }

    /// Behaviour of upcoming connects, in order; later connects accept.
    pub(crate) fn plan_connects(&self, plan: &[ConnectBehaviour]) -> &Self {
        self.state.lock().unwrap().connect_plan.extend(plan);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .map(|r| String::from_utf8_lossy(r).into_owned())
            .collect()
    }

    pub(crate) fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub(crate) fn closes(&self) -> usize {
        self.state.lock().unwrap().closes
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    type Channel = ScriptedChannel;

    async fn connect(&self, _endpoint: &str) -> Result<ScriptedChannel, TransportError> {
        let behaviour = {
            let mut state = self.state.lock().unwrap();
            state.connects += 1;
            state
                .connect_plan
                .pop_front()
                .unwrap_or(ConnectBehaviour::Accept)
        };
        match behaviour {
            ConnectBehaviour::Accept => Ok(ScriptedChannel {
                state: Arc::clone(&self.state),
                pending: None,
            }),
            ConnectBehaviour::Hang => std::future::pending().await,
            ConnectBehaviour::Refuse => Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "scripted refusal",
            ))),
        }
    }
}

pub(crate) struct ScriptedChannel {
    state: Arc<Mutex<State>>,
    pending: Option<Scripted>,
}

#[async_trait]
impl Channel for ScriptedChannel {
    async fn send(&mut self, payload: Vec<u8>) -> Result<(), TransportError> {
        let next = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(payload);
            state.script.pop_front().unwrap_or(Scripted::Silent)
        };
        if let Scripted::SendFails = next {
            return Err(TransportError::Disconnected);
        }
        self.pending = Some(next);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        match self.pending.take() {
            Some(Scripted::Reply(bytes)) => Ok(bytes),
            _ => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.state.lock().unwrap().closes += 1;
    }
}
