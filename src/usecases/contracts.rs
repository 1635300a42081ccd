use std::time::Instant;

use anyhow::Result;
use thiserror::Error;

use crate::{
    domain::{
        connection::ConnectionState, events::AppEvent, notification::NotificationPermission,
        shell_state::ShellState, user::UserId,
    },
    protocol::{OutboundFrame, SendError},
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn state_mut(&mut self) -> &mut ShellState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;

    /// Runs once before the first event is handled.
    fn start(&mut self) {}
}

/// Outbound side of the realtime channel.
pub trait FrameSink {
    fn send(&mut self, frame: OutboundFrame) -> Result<(), SendError>;

    /// Reports a transition of connection `connection`. Returns false when the
    /// transition belongs to a connection that has already been replaced.
    fn connection_changed(
        &mut self,
        _connection: u64,
        _state: ConnectionState,
        _now: Instant,
    ) -> bool {
        true
    }

    /// Drives time-based work such as scheduled reconnects.
    fn maintain(&mut self, _now: Instant) {}
}

/// Background REST loads whose results come back as [`AppEvent`]s.
pub trait FetchRequests {
    fn request_roster(&self, local_user: UserId);
    fn request_history(&self, request: HistoryRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRequest {
    pub local_user: UserId,
    pub peer: UserId,
    pub generation: u64,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to emit desktop notification: {0}")]
    Io(#[from] std::io::Error),
}

/// Desktop notification surface.
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;
    fn request_permission(&mut self) -> NotificationPermission;
    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Failure reported by a REST data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    InvalidData(String),
}
