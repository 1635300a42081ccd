//! Sending a chat message over the realtime channel.
//!
//! Delivery is at-most-once: a message that cannot be handed to an open
//! channel is reported back and never retried.

use thiserror::Error;

use crate::{
    domain::user::UserId,
    protocol::{OutboundFrame, SendError},
};

use super::contracts::FrameSink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub peer_id: UserId,
    pub peer_name: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("message text is empty")]
    EmptyMessage,
    #[error("not connected to the chat server")]
    NotConnected,
    #[error("message could not be encoded: {0}")]
    Encoding(String),
}

pub fn send_message(
    sink: &mut dyn FrameSink,
    command: SendMessageCommand,
) -> Result<(), SendMessageError> {
    let text = command.text.trim();
    if text.is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    sink.send(OutboundFrame::SendMessage {
        message: text.to_owned(),
        second_user: command.peer_id,
        receiver: command.peer_name,
    })
    .map_err(map_send_error)
}

fn map_send_error(error: SendError) -> SendMessageError {
    match error {
        SendError::NotConnected => SendMessageError::NotConnected,
        SendError::Frame(error) => SendMessageError::Encoding(error.to_string()),
    }
}
