use std::ops::Range;

use super::{message::Message, user::UserId};

/// Number of messages revealed per pagination step.
pub const CHUNK_SIZE: usize = 10;

/// A contiguous slice of a conversation's history, addressed by index range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageChunk {
    range: Range<usize>,
}

impl MessageChunk {
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn len(&self) -> usize {
        self.range.len()
    }
}

/// Splits `total` messages into chunks ordered oldest to newest.
///
/// Boundaries are aligned with the newest end, so only the oldest chunk may be
/// shorter than `chunk_size`.
pub fn partition_chunks(total: usize, chunk_size: usize) -> Vec<MessageChunk> {
    if total == 0 || chunk_size == 0 {
        return Vec::new();
    }

    let remainder = total % chunk_size;
    let mut chunks = Vec::with_capacity(total.div_ceil(chunk_size));
    let mut start = 0;

    if remainder != 0 {
        chunks.push(MessageChunk { range: 0..remainder });
        start = remainder;
    }

    while start < total {
        chunks.push(MessageChunk {
            range: start..start + chunk_size,
        });
        start += chunk_size;
    }

    chunks
}

/// Message history with one peer, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    peer_id: UserId,
    peer_name: String,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(peer_id: UserId, peer_name: impl Into<String>, mut history: Vec<Message>) -> Self {
        history.sort_by_key(|message| message.timestamp);

        Self {
            peer_id,
            peer_name: peer_name.into(),
            messages: history,
        }
    }

    pub fn peer_id(&self) -> UserId {
        self.peer_id
    }

    pub fn peer_name(&self) -> &str {
        &self.peer_name
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn chunks(&self) -> Vec<MessageChunk> {
        partition_chunks(self.messages.len(), CHUNK_SIZE)
    }

    pub fn chunk_messages(&self, chunk: &MessageChunk) -> &[Message] {
        self.messages.get(chunk.range()).unwrap_or_default()
    }

    pub fn contains(&self, message: &Message) -> bool {
        self.messages
            .iter()
            .rev()
            .any(|known| known.same_delivery(message))
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// Walks a conversation's chunks from newest to oldest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationCursor {
    chunks: Vec<MessageChunk>,
    loaded_from: usize,
}

impl PaginationCursor {
    pub fn new(chunks: Vec<MessageChunk>) -> Self {
        let loaded_from = chunks.len();
        Self {
            chunks,
            loaded_from,
        }
    }

    pub fn has_older(&self) -> bool {
        self.loaded_from > 0
    }

    pub fn loaded_chunks(&self) -> usize {
        self.chunks.len() - self.loaded_from
    }

    /// Hands out the next chunk not yet revealed; the first call yields the newest.
    pub fn next_older(&mut self) -> Option<MessageChunk> {
        if self.loaded_from == 0 {
            return None;
        }

        self.loaded_from -= 1;
        self.chunks.get(self.loaded_from).cloned()
    }
}
