//! JSON frames exchanged over the realtime channel, tagged by `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    message::Message,
    roster::{OnlineStatus, RosterEntry},
    user::UserId,
};

use super::error::FrameError;

const INBOUND_KINDS: [&str; 7] = [
    "loadUsersResponse",
    "loadUsrAfterResponse",
    "getMessages",
    "SendMessage",
    "IsTyping",
    "Offline",
    "status",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundFrame {
    #[serde(rename = "loadUsers")]
    LoadUsers,
    #[serde(rename = "GetMessages")]
    GetMessages {
        #[serde(rename = "secondUser")]
        second_user: UserId,
        #[serde(rename = "Receiver")]
        receiver: String,
    },
    #[serde(rename = "SendMessage")]
    SendMessage {
        message: String,
        #[serde(rename = "secondUser")]
        second_user: UserId,
        #[serde(rename = "Receiver")]
        receiver: String,
    },
    #[serde(rename = "Typing")]
    Typing {
        #[serde(rename = "isTyping")]
        is_typing: bool,
        #[serde(rename = "SecondUser")]
        second_user: UserId,
        #[serde(rename = "FirstUser")]
        first_user: UserId,
    },
}

impl OutboundFrame {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoadUsers => "loadUsers",
            Self::GetMessages { .. } => "GetMessages",
            Self::SendMessage { .. } => "SendMessage",
            Self::Typing { .. } => "Typing",
        }
    }

    pub fn encode(&self) -> Result<String, FrameError> {
        serde_json::to_string(self).map_err(|source| FrameError::Encode {
            kind: self.kind(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundFrame {
    #[serde(rename = "loadUsersResponse", alias = "loadUsrAfterResponse")]
    Roster {
        #[serde(default)]
        users: Option<Vec<WireUser>>,
    },
    #[serde(rename = "getMessages")]
    History {
        #[serde(default)]
        messages: Option<Vec<WireMessage>>,
        #[serde(rename = "Sender")]
        sender: UserId,
        #[serde(rename = "Receiver", default)]
        receiver: String,
        #[serde(rename = "ReceiverID")]
        receiver_id: UserId,
    },
    #[serde(rename = "SendMessage")]
    Chat {
        messages: WireMessage,
        #[serde(rename = "Sender", default)]
        sender: UserId,
        #[serde(rename = "ReceiverID", default)]
        receiver_id: UserId,
    },
    #[serde(rename = "IsTyping")]
    Typing {
        #[serde(rename = "Sender")]
        sender: UserId,
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
    #[serde(rename = "Offline")]
    Offline {
        #[serde(rename = "Receiver", default)]
        receiver: Option<String>,
        #[serde(rename = "ReceiverID", default)]
        receiver_id: Option<UserId>,
    },
    #[serde(rename = "status")]
    Status {
        authenticated: bool,
        #[serde(default)]
        privilege: u8,
    },
}

impl InboundFrame {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Roster { .. } => "loadUsersResponse",
            Self::History { .. } => "getMessages",
            Self::Chat { .. } => "SendMessage",
            Self::Typing { .. } => "IsTyping",
            Self::Offline { .. } => "Offline",
            Self::Status { .. } => "status",
        }
    }
}

/// Chat message as serialized by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "FirstUser")]
    pub first_user: UserId,
    #[serde(rename = "SecondUser")]
    pub second_user: UserId,
    #[serde(alias = "Message", default)]
    pub message: String,
    #[serde(rename = "Sender", default)]
    pub sender: String,
    #[serde(rename = "Receiver", default)]
    pub receiver: String,
    #[serde(alias = "Timestamp", default)]
    pub timestamp: DateTime<Utc>,
}

impl WireMessage {
    pub fn into_message(self) -> Message {
        Message {
            sender_id: self.first_user,
            sender_name: self.sender,
            counterpart_id: self.second_user,
            body: self.message,
            timestamp: self.timestamp,
        }
    }
}

/// Roster entry as serialized by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireUser {
    #[serde(rename = "UserID", alias = "userId")]
    pub user_id: UserId,
    pub username: String,
    #[serde(rename = "lastMessage", default)]
    pub last_message: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: String,
}

impl WireUser {
    pub fn into_entry(self) -> RosterEntry {
        RosterEntry {
            user_id: self.user_id,
            online_status: OnlineStatus::from_wire(&self.status),
            username: self.username,
            last_message_sender: self.sender,
            last_message_body: self.last_message,
            last_message_timestamp: self.timestamp,
        }
    }
}

/// Parses one inbound text frame, reporting unknown `type` tags by name.
pub fn decode_inbound(text: &str) -> Result<InboundFrame, FrameError> {
    let value: Value = serde_json::from_str(text).map_err(FrameError::InvalidJson)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(FrameError::MissingKind)?
        .to_owned();

    if !INBOUND_KINDS.contains(&kind.as_str()) {
        return Err(FrameError::UnknownFrameKind { kind });
    }

    serde_json::from_value(value).map_err(|source| FrameError::Malformed { kind, source })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn encoded(frame: &OutboundFrame) -> Value {
        let text = frame.encode().expect("frame must encode");
        serde_json::from_str(&text).expect("encoded frame must be json")
    }

    #[test]
    fn outbound_frames_use_wire_field_names() {
        assert_eq!(encoded(&OutboundFrame::LoadUsers), json!({"type": "loadUsers"}));
        assert_eq!(
            encoded(&OutboundFrame::GetMessages {
                second_user: UserId(4),
                receiver: "bob".to_owned(),
            }),
            json!({"type": "GetMessages", "secondUser": 4, "Receiver": "bob"})
        );
        assert_eq!(
            encoded(&OutboundFrame::SendMessage {
                message: "hi".to_owned(),
                second_user: UserId(4),
                receiver: "bob".to_owned(),
            }),
            json!({"type": "SendMessage", "message": "hi", "secondUser": 4, "Receiver": "bob"})
        );
        assert_eq!(
            encoded(&OutboundFrame::Typing {
                is_typing: true,
                second_user: UserId(4),
                first_user: UserId(1),
            }),
            json!({"type": "Typing", "isTyping": true, "SecondUser": 4, "FirstUser": 1})
        );
    }

    #[test]
    fn decodes_roster_under_both_tags() {
        let text = r#"{"type":"loadUsrAfterResponse","users":[{"UserID":2,"username":"alice","lastMessage":"Say hi 👋","sender":"","timestamp":"0001-01-01T00:00:00Z","status":"online"}]}"#;

        let frame = decode_inbound(text).expect("roster must decode");

        let InboundFrame::Roster { users: Some(users) } = frame else {
            panic!("expected roster frame");
        };
        let entry = users[0].clone().into_entry();
        assert_eq!(entry.user_id, UserId(2));
        assert_eq!(entry.online_status, OnlineStatus::Online);
        assert_eq!(entry.last_message_label(), "Say hi 👋");

        let initial = decode_inbound(r#"{"type":"loadUsersResponse","users":null}"#)
            .expect("null roster must decode");
        assert_eq!(initial, InboundFrame::Roster { users: None });
    }

    #[test]
    fn decodes_history_with_null_messages() {
        let frame = decode_inbound(
            r#"{"type":"getMessages","Sender":1,"Receiver":"bob","ReceiverID":2,"messages":null}"#,
        )
        .expect("history must decode");

        assert_eq!(
            frame,
            InboundFrame::History {
                messages: None,
                sender: UserId(1),
                receiver: "bob".to_owned(),
                receiver_id: UserId(2),
            }
        );
    }

    #[test]
    fn decodes_chat_message_payload() {
        let frame = decode_inbound(
            r#"{"type":"SendMessage","Sender":2,"Receiver":"me","ReceiverID":1,
                "messages":{"FirstUser":2,"SecondUser":1,"message":"yo","Sender":"bob","Receiver":"me","timestamp":"2024-05-01T10:00:00.5+02:00"}}"#,
        )
        .expect("chat frame must decode");

        let InboundFrame::Chat { messages, .. } = frame else {
            panic!("expected chat frame");
        };
        let message = messages.into_message();
        assert_eq!(message.sender_id, UserId(2));
        assert_eq!(message.counterpart_id, UserId(1));
        assert_eq!(message.sender_name, "bob");
        assert_eq!(message.body, "yo");
        assert_eq!(message.timestamp.to_rfc3339(), "2024-05-01T08:00:00.500+00:00");
    }

    #[test]
    fn decodes_typing_offline_and_status() {
        assert_eq!(
            decode_inbound(r#"{"type":"IsTyping","Sender":2,"isTyping":true}"#)
                .expect("typing must decode"),
            InboundFrame::Typing {
                sender: UserId(2),
                is_typing: true
            }
        );
        assert_eq!(
            decode_inbound(r#"{"type":"Offline","Sender":1,"Receiver":"bob","ReceiverID":2}"#)
                .expect("offline must decode"),
            InboundFrame::Offline {
                receiver: Some("bob".to_owned()),
                receiver_id: Some(UserId(2)),
            }
        );
        assert_eq!(
            decode_inbound(r#"{"type":"status","authenticated":true,"privilege":2}"#)
                .expect("status must decode"),
            InboundFrame::Status {
                authenticated: true,
                privilege: 2
            }
        );
    }

    #[test]
    fn unknown_kind_is_reported_by_name() {
        let error = decode_inbound(r#"{"type":"Reaction","emoji":"👍"}"#)
            .expect_err("unknown kind must be rejected");

        assert!(matches!(
            error,
            FrameError::UnknownFrameKind { ref kind } if kind == "Reaction"
        ));
    }

    #[test]
    fn missing_tag_and_bad_payloads_are_rejected() {
        assert!(matches!(
            decode_inbound(r#"{"users":[]}"#),
            Err(FrameError::MissingKind)
        ));
        assert!(matches!(
            decode_inbound("not json"),
            Err(FrameError::InvalidJson(_))
        ));
        assert!(matches!(
            decode_inbound(r#"{"type":"IsTyping","Sender":"two"}"#),
            Err(FrameError::Malformed { .. })
        ));
    }
}
