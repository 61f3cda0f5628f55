use std::net::SocketAddr;

/// Listener settings. Only read at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Capacity of the in-memory activity log.
    pub activity_capacity: usize,
}
