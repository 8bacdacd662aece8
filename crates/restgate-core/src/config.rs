//! Configuration for restgate applications.
//!
//! All configuration is driven by environment variables; every option has a
//! working default so the demo server starts without any setup.

/// Process-wide configuration for a restgate application.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestgateConfig {
    /// Directory scanned for service manifests.
    pub services_dir: String,
    /// Namespace prefix applied to discovered service identifiers.
    pub services_ns: Option<String>,
    /// Bind address for the HTTP listener.
    pub gateway_listen: String,
    /// Log level.
    pub log_level: String,
}

impl Default for RestgateConfig {
    fn default() -> Self {
        Self {
            services_dir: "./demos/services".to_owned(),
            services_ns: None,
            gateway_listen: "0.0.0.0:8080".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl RestgateConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SERVICES_DIR") {
            config.services_dir = v;
        }
        if let Ok(v) = std::env::var("SERVICES_NS") {
            if v.is_empty() {
                config.services_ns = None;
            } else {
                config.services_ns = Some(v);
            }
        }
        if let Ok(v) = std::env::var("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }
}
