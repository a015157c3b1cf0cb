pub mod channel;
pub mod codec;
pub mod error;
pub mod global;
#[cfg(test)]
pub(crate) mod mock;

pub use channel::{Channel, Connector, ZmqChannel, ZmqConnector};
pub use codec::{Reply, encode_request};
pub use error::{DecodeError, TransportError};
pub use global::{ContextConfig, TransportContext, acquire, acquire_with_config};
