//! Typing status in both directions for the open conversation.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypingState {
    #[default]
    Idle,
    PeerTyping,
}

/// Whether the peer of the open conversation is currently typing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingIndicator {
    state: TypingState,
}

impl TypingIndicator {
    pub fn state(&self) -> TypingState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == TypingState::PeerTyping
    }

    pub fn apply(&mut self, is_typing: bool) {
        self.state = if is_typing {
            TypingState::PeerTyping
        } else {
            TypingState::Idle
        };
    }

    pub fn reset(&mut self) {
        self.state = TypingState::Idle;
    }
}

/// The local user's typing status as announced to the peer.
///
/// Each method returns `Some(is_typing)` only when the announced status flips,
/// which is when a typing frame must go out.
#[derive(Debug, Clone)]
pub struct OutboundTyping {
    idle_timeout: Duration,
    active: bool,
    deadline: Option<Instant>,
}

impl OutboundTyping {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            idle_timeout,
            active: false,
            deadline: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Input changed; `has_text` is false once the draft is blank.
    pub fn on_input(&mut self, now: Instant, has_text: bool) -> Option<bool> {
        if !has_text {
            if self.active {
                self.deadline = Some(now + self.idle_timeout);
            }
            return None;
        }

        self.deadline = Some(now + self.idle_timeout);
        if self.active {
            return None;
        }

        self.active = true;
        Some(true)
    }

    pub fn on_send(&mut self) -> Option<bool> {
        self.stop()
    }

    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.stop(),
            _ => None,
        }
    }

    /// Drops the status without producing a frame, used when the peer changed.
    pub fn clear(&mut self) {
        self.active = false;
        self.deadline = None;
    }

    fn stop(&mut self) -> Option<bool> {
        self.deadline = None;
        if !self.active {
            return None;
        }

        self.active = false;
        Some(false)
    }
}
