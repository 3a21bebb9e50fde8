use serde::{Deserialize, Serialize};

/// HTTP listener and CORS settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Valid range: 1-65535.
    pub port: u32,
    /// Origins allowed to make cross-origin requests.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 5001,
            allowed_origins: vec![
                "http://localhost:3000".into(),
                "https://lira-orcin.vercel.app".into(),
            ],
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
