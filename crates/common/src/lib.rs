//! Wire types and errors shared by envelope clients and the gateway.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
pub use protocol::EncryptedBody;
