use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub public_dir: PathBuf,
    /// Base URL of the locally hosted inference API.
    pub backend_url: String,
    /// Base URL of the hosted ML inference API.
    pub ml_api_url: String,
    /// Selects `backend_url` when true, `ml_api_url` otherwise.
    pub use_local_backend: bool,
    pub allowed_origins: Vec<String>,
    pub api_timeout_secs: u64,
    pub default_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub history_path: PathBuf,
}

impl AppConfig {
    /// Base URL of the inference API the clients should talk to.
    #[must_use]
    pub fn inference_url(&self) -> &str {
        if self.use_local_backend {
            &self.backend_url
        } else {
            &self.ml_api_url
        }
    }
}
