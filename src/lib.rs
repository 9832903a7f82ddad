pub mod config;
pub mod envelope;
pub mod metadata;

pub use metadata::{GatewayReception, PacketMetadata};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
