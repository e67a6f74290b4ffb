use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub checkout: CheckoutSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`, relative to the working directory.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String {
    "checkout-frontend/static".to_string()
}

#[derive(Deserialize, Clone, Debug)]
pub struct BackendSettings {
    /// Base URL of the cart backend (bills, sessions, orders, verification).
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Branding and prefill passed to the payment widget.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CheckoutSettings {
    pub merchant_name: String,
    pub description: String,
    pub theme_color: String,
    pub prefill: PrefillSettings,
    /// Unfinished workflows idle for longer than this are dropped.
    pub workflow_idle_secs: u64,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            merchant_name: "Smart Cart".to_string(),
            description: "Cart Payment".to_string(),
            theme_color: "#667eea".to_string(),
            prefill: PrefillSettings::default(),
            workflow_idle_secs: 1800,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PrefillSettings {
    pub name: String,
    pub email: String,
    pub contact: String,
}

impl Default for PrefillSettings {
    fn default() -> Self {
        Self {
            name: "Customer".to_string(),
            email: "customer@example.com".to_string(),
            contact: "9999999999".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TelemetrySettings {
    pub log_level: String,
    /// OTLP collector; tracing stays local when unset.
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Cannot read current dir: {}", e)))?;

    // Allow running from the workspace root or from the crate directory
    let configuration_directory = if base_path.ends_with("checkout-frontend") {
        base_path.join("config")
    } else {
        base_path.join("checkout-frontend").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
