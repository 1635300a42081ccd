use crate::domain::{events::FetchFailure, message::Message, user::UserId};

use super::contracts::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub local_user: UserId,
    pub peer: UserId,
}

pub trait MessagesSource {
    fn list_messages(&self, sender: UserId, receiver: UserId) -> Result<Vec<Message>, SourceError>;
}

impl<T> MessagesSource for &T
where
    T: MessagesSource + ?Sized,
{
    fn list_messages(&self, sender: UserId, receiver: UserId) -> Result<Vec<Message>, SourceError> {
        (*self).list_messages(sender, receiver)
    }
}

impl From<SourceError> for FetchFailure {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Status { status, message } => FetchFailure {
                status: Some(status),
                message,
            },
            SourceError::Transport(message) => FetchFailure {
                status: None,
                message: format!("server unreachable: {message}"),
            },
            SourceError::InvalidData(message) => FetchFailure {
                status: None,
                message: format!("unexpected server data: {message}"),
            },
        }
    }
}

/// Loads the full conversation between the session user and `peer`, oldest first.
pub fn load_history(
    source: &dyn MessagesSource,
    query: HistoryQuery,
) -> Result<Vec<Message>, FetchFailure> {
    let mut messages = source
        .list_messages(query.local_user, query.peer)
        .map_err(FetchFailure::from)?;

    messages.sort_by_key(|message| message.timestamp);
    Ok(messages)
}
