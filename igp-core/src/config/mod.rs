//! Runtime configuration shared by the server and the telemetry pipeline.
//!
//! Loading and parsing the TOML file is the server's job; these are the
//! validated values it produces. Sections that may change on SIGHUP live in
//! a [`ConfigStore`].

mod config_store;
mod gateway;
mod server;
mod telemetry;
mod widget;

pub use config_store::ConfigStore;
pub use gateway::GatewayConfig;
pub use server::ServerConfig;
pub use telemetry::{DEFAULT_FT_API_URL, DEFAULT_ORIGIN, DEFAULT_TIMEOUT, TelemetryConfig, mock_url};
pub use widget::WidgetConfig;

/// All reloadable configuration sections.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: ConfigStore<ServerConfig>,
    pub gateway: ConfigStore<GatewayConfig>,
    pub telemetry: ConfigStore<TelemetryConfig>,
    pub widget: ConfigStore<WidgetConfig>,
}

impl SharedConfig {
    pub fn new(
        server: ServerConfig,
        gateway: GatewayConfig,
        telemetry: TelemetryConfig,
        widget: WidgetConfig,
    ) -> Self {
        Self {
            server: ConfigStore::new(server),
            gateway: ConfigStore::new(gateway),
            telemetry: ConfigStore::new(telemetry),
            widget: ConfigStore::new(widget),
        }
    }
}
