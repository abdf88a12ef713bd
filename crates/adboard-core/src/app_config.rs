use std::net::SocketAddr;

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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub model_url: String,
    pub model_api_token: Option<String>,
    pub model_timeout_secs: u64,
    pub model_max_retries: u32,
    pub model_retry_backoff_ms: u64,
    pub rate_limit_per_minute: usize,
    pub max_upload_bytes: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("model_url", &self.model_url)
            .field(
                "model_api_token",
                &self.model_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("model_max_retries", &self.model_max_retries)
            .field("model_retry_backoff_ms", &self.model_retry_backoff_ms)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
