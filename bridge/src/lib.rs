pub mod backend;
pub mod config;
pub mod error;
pub mod frame;
pub mod handler;
pub mod server;

pub use backend::TracingBackend;
pub use config::BridgeConfig;
pub use error::BridgeError;
pub use frame::encode_frame;
pub use server::SnapshotServer;
