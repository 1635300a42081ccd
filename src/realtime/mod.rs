//! Realtime channel to the chat server: websocket sessions and their lifecycle.

mod connection;
mod manager;
mod reconnect;

pub use connection::ConnectRequest;
pub use manager::ConnectionManager;
pub use reconnect::ReconnectPolicy;

/// Milliseconds for log fields, saturating instead of truncating.
fn duration_ms(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
