use chrono::{DateTime, Utc};

use super::user::UserId;

/// Which side of the conversation authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    Sent,
    Received,
}

impl MessageDirection {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender_id: UserId,
    pub sender_name: String,
    pub counterpart_id: UserId,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn direction(&self, local_user: UserId) -> MessageDirection {
        if self.sender_id == local_user {
            MessageDirection::Sent
        } else {
            MessageDirection::Received
        }
    }

    /// Returns the other participant of the conversation this message belongs to,
    /// seen from `local_user`.
    pub fn conversation_peer(&self, local_user: UserId) -> UserId {
        if self.sender_id == local_user {
            self.counterpart_id
        } else {
            self.sender_id
        }
    }

    pub(crate) fn same_delivery(&self, other: &Message) -> bool {
        self.sender_id == other.sender_id
            && self.counterpart_id == other.counterpart_id
            && self.timestamp == other.timestamp
            && self.body == other.body
    }
}

#[cfg(test)]
pub(crate) fn message_at(sender: i64, receiver: i64, body: &str, unix_seconds: i64) -> Message {
    Message {
        sender_id: UserId(sender),
        sender_name: format!("user-{sender}"),
        counterpart_id: UserId(receiver),
        body: body.to_owned(),
        timestamp: DateTime::from_timestamp(unix_seconds, 0).expect("timestamp must be valid"),
    }
}
