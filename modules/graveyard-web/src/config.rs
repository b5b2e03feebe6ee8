use std::env;

/// Web server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Missing key is a request-time 500, not a startup panic: the server
    /// still boots and reports misconfiguration per request.
    pub tapestry_api_key: Option<String>,
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            tapestry_api_key: env::var("TAPESTRY_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }
}
