use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::runtime::error::TransportError;

// One context per process; environments share it and the last one out shuts it down.
static GLOBAL_CONTEXT: OnceLock<Mutex<Weak<TransportContext>>> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Reactor threads driving socket I/O.
    pub io_threads: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { io_threads: 1 }
    }
}

/// The reactor every channel in the process runs on.
#[derive(Debug)]
pub struct TransportContext {
    runtime: Option<Runtime>,
    io_threads: usize,
}

impl TransportContext {
    fn new(config: &ContextConfig) -> Result<Self, TransportError> {
        let io_threads = config.io_threads.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(io_threads)
            .thread_name("gym-zmq-io")
            .enable_all()
            .build()?;
        Ok(Self {
            runtime: Some(runtime),
            io_threads,
        })
    }

    pub fn io_threads(&self) -> usize {
        self.io_threads
    }

    /// Drive `future` to completion on the context, blocking the caller.
    ///
    /// Must not be called from inside an async task.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, TransportError> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| TransportError::Context("context is shut down".to_string()))?;
        Ok(runtime.block_on(future))
    }
}

impl Drop for TransportContext {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // Does not wait for, or panic on, tasks still parked on dead sockets.
            runtime.shutdown_background();
            info!("transport context shut down");
        }
    }
}

/// Shared context, created on first use.
pub fn acquire() -> Result<Arc<TransportContext>, TransportError> {
    acquire_with_config(&ContextConfig::default())
}

/// Like [`acquire`]; `config` only applies if no context is alive yet.
pub fn acquire_with_config(config: &ContextConfig) -> Result<Arc<TransportContext>, TransportError> {
    let registry = GLOBAL_CONTEXT.get_or_init(|| Mutex::new(Weak::new()));
    let mut slot = registry.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(context) = slot.upgrade() {
        return Ok(context);
    }

    let context = Arc::new(TransportContext::new(config)?);
    *slot = Arc::downgrade(&context);
    info!(io_threads = context.io_threads(), "transport context created");
    Ok(context)
}
