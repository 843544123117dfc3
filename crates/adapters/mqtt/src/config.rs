//! MQTT session configuration.

use std::path::PathBuf;

use serde::Deserialize;

use hearth_domain::id::UserId;

/// Configuration for the MQTT broker session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Username for broker authentication.
    pub username: Option<String>,
    /// Password for broker authentication.
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Account whose device roster drives channel subscriptions.
    pub account_id: UserId,
    /// Transport security settings.
    pub tls: TlsConfig,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "hearth".to_string(),
            username: None,
            password: None,
            keep_alive_secs: 30,
            account_id: UserId::new(1),
            tls: TlsConfig::default(),
        }
    }
}

/// TLS settings for the broker connection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Whether and how to secure the connection.
    pub mode: TlsMode,
    /// PEM file holding the broker's CA certificate chain.
    pub ca_file: Option<PathBuf>,
    /// PEM file holding the client certificate, for mutual TLS.
    pub cert_file: Option<PathBuf>,
    /// PEM file holding the client private key, for mutual TLS.
    pub key_file: Option<PathBuf>,
}

/// How the broker's certificate is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain TCP, no TLS.
    #[default]
    Disabled,
    /// TLS with the broker certificate verified against `ca_file`.
    Verified,
    /// TLS without certificate verification. Only for test brokers with
    /// self-signed certificates.
    Insecure,
}
