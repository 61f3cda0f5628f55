//! Runtime configuration types, defined in `igp-core::config`.

pub use igp_core::config::{
    GatewayConfig, ServerConfig, SharedConfig, TelemetryConfig, WidgetConfig,
};
