use hyperswitch_masking::Secret;

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Connectors {
    pub vindicia: ConnectorParams,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct ConnectorParams {
    /// base url
    pub base_url: String,
    /// base url used while the gateway runs in test mode
    pub test_base_url: String,
}

impl ConnectorParams {
    pub fn select_base_url(&self, test_mode: bool) -> &str {
        if test_mode {
            &self.test_base_url
        } else {
            &self.base_url
        }
    }
}

#[derive(Debug, serde::Deserialize, Clone, Default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    #[serde(default)]
    pub bypass_proxy_urls: Vec<String>,
}

/// Credentials and mode the gateway is operated with.
///
/// Test mode needs its own login and password; it only changes the endpoint the requests
/// are sent to.
#[derive(Clone, serde::Deserialize, Debug)]
pub struct GatewaySettings {
    pub username: Secret<String>,
    pub password: Secret<String>,
    #[serde(default)]
    pub test_mode: bool,
}
