use std::fmt;

use crate::protocol::InboundFrame;

use super::{connection::ConnectionState, message::Message, roster::RosterEntry, user::UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    FocusChanged {
        focused: bool,
    },
    ConnectionChanged {
        connection: u64,
        state: ConnectionState,
    },
    FrameReceived(InboundFrame),
    HistoryFetched {
        peer: UserId,
        generation: u64,
        result: Result<Vec<Message>, FetchFailure>,
    },
    RosterFetched(Result<Vec<RosterEntry>, FetchFailure>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }

    /// The typed character, for keys that insert text.
    pub fn text_char(&self) -> Option<char> {
        if self.ctrl {
            return None;
        }

        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

/// A REST collaborator could not deliver the requested data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{status}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
