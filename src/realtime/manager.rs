use std::{sync::mpsc::Sender, time::Instant};

use tokio::runtime::Handle;

use crate::{
    domain::{connection::ConnectionState, events::AppEvent},
    protocol::{OutboundFrame, SendError},
    usecases::contracts::FrameSink,
};

use super::{
    connection::{ConnectRequest, Connection},
    duration_ms,
    reconnect::ReconnectPolicy,
};

const SEND_NOT_CONNECTED: &str = "REALTIME_SEND_NOT_CONNECTED";
const RECONNECT_SCHEDULED: &str = "REALTIME_RECONNECT_SCHEDULED";
const RECONNECT_EXHAUSTED: &str = "REALTIME_RECONNECT_EXHAUSTED";

/// Owns the single live [`Connection`] and replaces it after failures.
pub struct ConnectionManager {
    runtime: Handle,
    request: ConnectRequest,
    events: Sender<AppEvent>,
    policy: ReconnectPolicy,
    current: Option<Connection>,
    last_id: u64,
    failed_attempts: u32,
    retry_at: Option<Instant>,
}

impl ConnectionManager {
    pub fn new(
        runtime: Handle,
        request: ConnectRequest,
        events: Sender<AppEvent>,
        policy: ReconnectPolicy,
    ) -> Self {
        Self {
            runtime,
            request,
            events,
            policy,
            current: None,
            last_id: 0,
            failed_attempts: 0,
            retry_at: None,
        }
    }

    /// Opens the session channel. Later calls leave the existing channel alone.
    pub fn connect(&mut self) {
        if let Some(current) = &self.current {
            tracing::debug!(
                connection = current.id(),
                "realtime channel already established"
            );
            return;
        }

        self.open_fresh();
    }

    fn open_fresh(&mut self) {
        self.last_id += 1;
        self.current = Some(Connection::open(
            &self.runtime,
            self.last_id,
            self.request.clone(),
            self.events.clone(),
        ));
    }

    fn schedule_retry(&mut self, now: Instant) {
        self.failed_attempts = self.failed_attempts.saturating_add(1);

        match self.policy.delay_for(self.failed_attempts) {
            Some(delay) => {
                tracing::info!(
                    code = RECONNECT_SCHEDULED,
                    attempt = self.failed_attempts,
                    delay_ms = duration_ms(delay),
                    "scheduling realtime reconnect"
                );
                self.retry_at = Some(now + delay);
            }
            None => {
                tracing::warn!(
                    code = RECONNECT_EXHAUSTED,
                    attempts = self.failed_attempts,
                    "realtime channel stays down"
                );
                self.retry_at = None;
            }
        }
    }
}

impl FrameSink for ConnectionManager {
    fn send(&mut self, frame: OutboundFrame) -> Result<(), SendError> {
        let result = match &self.current {
            Some(connection) => connection.send(&frame),
            None => Err(SendError::NotConnected),
        };

        if let Err(SendError::NotConnected) = &result {
            tracing::warn!(
                code = SEND_NOT_CONNECTED,
                kind = frame.kind(),
                "dropping frame while realtime channel is not open"
            );
        }

        result
    }

    fn connection_changed(&mut self, connection: u64, state: ConnectionState, now: Instant) -> bool {
        if self.current.as_ref().map(Connection::id) != Some(connection) {
            tracing::debug!(connection, state = ?state, "ignoring replaced connection");
            return false;
        }

        if state == ConnectionState::Open {
            self.failed_attempts = 0;
            self.retry_at = None;
        } else if state.is_terminal() {
            self.schedule_retry(now);
        }

        true
    }

    fn maintain(&mut self, now: Instant) {
        let Some(retry_at) = self.retry_at else {
            return;
        };

        if now < retry_at {
            return;
        }

        self.retry_at = None;
        self.current = None;
        self.open_fresh();
    }
}
