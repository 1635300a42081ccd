//! In-memory collaborators for exercising use cases without a network or terminal.

use std::{cell::RefCell, time::Instant};

use crate::{
    domain::{connection::ConnectionState, notification::NotificationPermission, user::UserId},
    protocol::{OutboundFrame, SendError},
    usecases::contracts::{FetchRequests, FrameSink, HistoryRequest, Notifier, NotifyError},
};

/// Records every frame; rejects them while `connected` is false.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub connected: bool,
    pub sent: Vec<OutboundFrame>,
    pub rejected: Vec<OutboundFrame>,
    pub transitions: Vec<(u64, ConnectionState)>,
    pub maintained: usize,
    pub current_connection: Option<u64>,
}

impl RecordingSink {
    pub fn connected() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }
}

impl FrameSink for RecordingSink {
    fn send(&mut self, frame: OutboundFrame) -> Result<(), SendError> {
        if !self.connected {
            self.rejected.push(frame);
            return Err(SendError::NotConnected);
        }

        self.sent.push(frame);
        Ok(())
    }

    fn connection_changed(&mut self, connection: u64, state: ConnectionState, _now: Instant) -> bool {
        if self
            .current_connection
            .is_some_and(|current| current != connection)
        {
            return false;
        }

        self.transitions.push((connection, state));
        self.connected = state == ConnectionState::Open;
        true
    }

    fn maintain(&mut self, _now: Instant) {
        self.maintained += 1;
    }
}

#[derive(Debug)]
pub struct StubNotifier {
    pub permission: NotificationPermission,
    pub permission_on_request: NotificationPermission,
    pub fail: bool,
    pub delivered: Vec<(String, String)>,
    pub requests: usize,
}

impl StubNotifier {
    pub fn with_permission(permission: NotificationPermission) -> Self {
        Self {
            permission,
            permission_on_request: permission,
            fail: false,
            delivered: Vec::new(),
            requests: 0,
        }
    }
}

impl Notifier for StubNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        self.requests += 1;
        self.permission = self.permission_on_request;
        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Io(std::io::Error::other("terminal gone")));
        }

        self.delivered.push((title.to_owned(), body.to_owned()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingFetches {
    pub roster_requests: RefCell<Vec<UserId>>,
    pub history_requests: RefCell<Vec<HistoryRequest>>,
}

impl FetchRequests for RecordingFetches {
    fn request_roster(&self, local_user: UserId) {
        self.roster_requests.borrow_mut().push(local_user);
    }

    fn request_history(&self, request: HistoryRequest) {
        self.history_requests.borrow_mut().push(request);
    }
}
