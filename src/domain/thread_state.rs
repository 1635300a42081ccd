//! State of the message thread for the open conversation.
//!
//! History is revealed in chunks from the newest end. The scroll model counts
//! terminal rows: `scroll_top` is the first visible row of the rendered content.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};

use super::{
    conversation::{Conversation, PaginationCursor},
    message::{Message, MessageDirection},
    throttle::LeadingThrottle,
    typing::TypingIndicator,
    user::UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadUiState {
    Closed,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub direction: MessageDirection,
    pub sender_name: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl RenderedMessage {
    fn new(message: &Message, local_user: UserId) -> Self {
        Self {
            direction: message.direction(local_user),
            sender_name: message.sender_name.clone(),
            body: message.body.clone(),
            timestamp: message.timestamp,
        }
    }

    /// Rows taken in the thread at `width` columns: the sender line, the wrapped
    /// body, the time line.
    pub fn height(&self, width: usize) -> usize {
        let body_rows: usize = self
            .body
            .lines()
            .map(|line| wrapped_row_count(line.chars().count(), width))
            .sum();

        2 + body_rows.max(1)
    }

    /// Body split into rows of at most `width` characters; `0` leaves lines whole.
    pub fn body_rows(&self, width: usize) -> Vec<String> {
        let mut rows: Vec<String> = Vec::new();

        for line in self.body.lines() {
            let chars: Vec<char> = line.chars().collect();
            if width == 0 || chars.is_empty() {
                rows.push(line.to_owned());
                continue;
            }
            rows.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
        }

        if rows.is_empty() {
            rows.push(String::new());
        }
        rows
    }
}

fn wrapped_row_count(chars: usize, width: usize) -> usize {
    if width == 0 {
        return 1;
    }

    chars.div_ceil(width).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Peer {
    id: UserId,
    name: String,
}

#[derive(Debug, Clone)]
pub struct ThreadState {
    local_user: UserId,
    ui_state: ThreadUiState,
    generation: u64,
    peer: Option<Peer>,
    conversation: Option<Conversation>,
    cursor: PaginationCursor,
    rendered: VecDeque<RenderedMessage>,
    pending_live: Vec<Message>,
    scroll_top: usize,
    viewport_height: usize,
    wrap_width: usize,
    pinned_to_bottom: bool,
    smooth_scroll: bool,
    scroll_throttle: LeadingThrottle,
    typing: TypingIndicator,
}

impl ThreadState {
    pub fn new(local_user: UserId, scroll_throttle: Duration) -> Self {
        Self {
            local_user,
            ui_state: ThreadUiState::Closed,
            generation: 0,
            peer: None,
            conversation: None,
            cursor: PaginationCursor::default(),
            rendered: VecDeque::new(),
            pending_live: Vec::new(),
            scroll_top: 0,
            viewport_height: 0,
            wrap_width: 0,
            pinned_to_bottom: true,
            smooth_scroll: false,
            scroll_throttle: LeadingThrottle::new(scroll_throttle),
            typing: TypingIndicator::default(),
        }
    }

    pub fn ui_state(&self) -> ThreadUiState {
        self.ui_state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn open_peer(&self) -> Option<UserId> {
        self.peer.as_ref().map(|peer| peer.id)
    }

    pub fn peer_name(&self) -> Option<&str> {
        self.peer.as_ref().map(|peer| peer.name.as_str())
    }

    pub fn rendered(&self) -> impl ExactSizeIterator<Item = &RenderedMessage> {
        self.rendered.iter()
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn has_older(&self) -> bool {
        self.cursor.has_older()
    }

    pub fn typing(&self) -> &TypingIndicator {
        &self.typing
    }

    /// Starts (or restarts) loading the conversation with `peer_id` and returns the
    /// generation a history response must carry to be accepted.
    pub fn open(&mut self, peer_id: UserId, peer_name: impl Into<String>) -> u64 {
        self.generation += 1;
        self.ui_state = ThreadUiState::Loading;
        self.peer = Some(Peer {
            id: peer_id,
            name: peer_name.into(),
        });
        self.clear_view();
        self.generation
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.ui_state = ThreadUiState::Closed;
        self.peer = None;
        self.clear_view();
    }

    /// Whether a history response for `peer` is the one the thread is waiting for.
    /// Socket responses carry no generation and match any pending request.
    pub fn accepts_history(&self, peer: UserId, generation: Option<u64>) -> bool {
        self.ui_state == ThreadUiState::Loading
            && self.open_peer() == Some(peer)
            && generation.map_or(true, |generation| generation == self.generation)
    }

    pub fn show_history(&mut self, history: Vec<Message>) {
        let Some(peer) = self.peer.clone() else {
            return;
        };

        let mut conversation = Conversation::new(peer.id, peer.name, history);
        let mut cursor = PaginationCursor::new(conversation.chunks());

        self.rendered.clear();
        if let Some(chunk) = cursor.next_older() {
            let local_user = self.local_user;
            self.rendered.extend(
                conversation
                    .chunk_messages(&chunk)
                    .iter()
                    .map(|message| RenderedMessage::new(message, local_user)),
            );
        }

        for message in std::mem::take(&mut self.pending_live) {
            if !conversation.contains(&message) {
                self.rendered
                    .push_back(RenderedMessage::new(&message, self.local_user));
                conversation.append(message);
            }
        }

        self.conversation = Some(conversation);
        self.cursor = cursor;
        self.ui_state = ThreadUiState::Ready;
        self.scroll_throttle.reset();
        self.scroll_to_bottom(false);
    }

    pub fn set_error(&mut self) {
        if self.ui_state == ThreadUiState::Loading {
            self.ui_state = ThreadUiState::Error;
            self.pending_live.clear();
        }
    }

    /// Adds a message delivered while the conversation is open. Returns false when
    /// the message belongs to another conversation.
    pub fn append_live(&mut self, message: Message) -> bool {
        if self.open_peer() != Some(message.conversation_peer(self.local_user)) {
            return false;
        }

        match self.ui_state {
            ThreadUiState::Loading => {
                self.pending_live.push(message);
                true
            }
            ThreadUiState::Ready => {
                self.rendered
                    .push_back(RenderedMessage::new(&message, self.local_user));
                if let Some(conversation) = self.conversation.as_mut() {
                    conversation.append(message);
                }
                self.scroll_to_bottom(true);
                true
            }
            ThreadUiState::Closed | ThreadUiState::Error => false,
        }
    }

    pub fn apply_peer_typing(&mut self, sender: UserId, is_typing: bool) -> bool {
        if self.open_peer() != Some(sender) {
            return false;
        }

        self.typing.apply(is_typing);
        true
    }

    pub fn content_height(&self) -> usize {
        self.rendered
            .iter()
            .map(|message| message.height(self.wrap_width))
            .sum()
    }

    /// Columns body lines wrap at; `0` until the first draw.
    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    pub fn set_viewport(&mut self, height: usize, width: usize) {
        self.viewport_height = height;
        self.wrap_width = width;

        if self.pinned_to_bottom && !self.smooth_scroll {
            self.scroll_top = self.max_scroll_top();
        } else {
            self.scroll_top = self.scroll_top.min(self.max_scroll_top());
        }
    }

    /// Moves the viewport by `delta` rows, negative meaning up. Returns true when
    /// reaching the top revealed an older chunk.
    pub fn scroll_by(&mut self, delta: isize, now: Instant) -> bool {
        if self.ui_state != ThreadUiState::Ready {
            return false;
        }

        let max_scroll_top = self.max_scroll_top();
        self.smooth_scroll = false;
        self.scroll_top = if delta < 0 {
            self.scroll_top.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_top
                .saturating_add(delta.unsigned_abs())
                .min(max_scroll_top)
        };
        self.pinned_to_bottom = self.scroll_top >= max_scroll_top;

        if !self.scroll_throttle.try_fire(now) {
            return false;
        }

        self.scroll_top == 0 && self.reveal_older()
    }

    /// Advances a pending smooth scroll by half the remaining distance.
    pub fn step_smooth_scroll(&mut self) {
        if !self.smooth_scroll {
            return;
        }

        let target = self.max_scroll_top();
        let remaining = target.saturating_sub(self.scroll_top);
        self.scroll_top = (self.scroll_top + remaining.div_ceil(2)).min(target);

        if self.scroll_top >= target {
            self.smooth_scroll = false;
        }
    }

    fn reveal_older(&mut self) -> bool {
        let Some(conversation) = self.conversation.as_ref() else {
            return false;
        };
        let Some(chunk) = self.cursor.next_older() else {
            return false;
        };

        let mut added_height = 0;
        for message in conversation.chunk_messages(&chunk).iter().rev() {
            let rendered = RenderedMessage::new(message, self.local_user);
            added_height += rendered.height(self.wrap_width);
            self.rendered.push_front(rendered);
        }

        self.scroll_top += added_height;
        self.pinned_to_bottom = false;
        tracing::debug!(
            peer = %conversation.peer_id(),
            loaded_chunks = self.cursor.loaded_chunks(),
            added_rows = added_height,
            "revealed older messages"
        );
        true
    }

    fn scroll_to_bottom(&mut self, smooth: bool) {
        self.pinned_to_bottom = true;
        self.smooth_scroll = smooth;

        if !smooth {
            self.scroll_top = self.max_scroll_top();
        }
    }

    fn max_scroll_top(&self) -> usize {
        self.content_height().saturating_sub(self.viewport_height)
    }

    fn clear_view(&mut self) {
        self.conversation = None;
        self.cursor = PaginationCursor::default();
        self.rendered.clear();
        self.pending_live.clear();
        self.scroll_top = 0;
        self.pinned_to_bottom = true;
        self.smooth_scroll = false;
        self.scroll_throttle.reset();
        self.typing.reset();
    }
}
