/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Where the board client finds the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    server_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let server_url = std::env::var("TASKBOARD_API_URL")
            .unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(server_url)
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        Self { server_url }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    /// Board socket URL carrying `token` as a query parameter
    pub fn socket_url(&self, token: &str) -> String {
        let base = if let Some(rest) = self.server_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.server_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.server_url.clone()
        };
        format!("{base}/ws?token={token}")
    }
}
