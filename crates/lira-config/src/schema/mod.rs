//! Configuration schema types for the gateway.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod model;
mod server;

pub use logging::*;
pub use model::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    pub model: ModelConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}
