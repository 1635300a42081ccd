use chrono::{DateTime, Utc};

use super::user::UserId;

const LAST_MESSAGE_MAX_CHARS: usize = 18;
const SENDER_NAME_MAX_CHARS: usize = 10;
const ELLIPSIS: &str = "...";
const OWN_MESSAGE_PREFIX: &str = "You: ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnlineStatus {
    Online,
    #[default]
    Offline,
}

impl OnlineStatus {
    pub fn from_wire(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("online") {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// One account in the presence list together with its latest exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub user_id: UserId,
    pub username: String,
    pub last_message_sender: String,
    pub last_message_body: String,
    pub last_message_timestamp: DateTime<Utc>,
    pub online_status: OnlineStatus,
}

impl RosterEntry {
    /// Summary line for the latest exchange with this account.
    ///
    /// The server reports the author of the last message in `last_message_sender`;
    /// when it is not this entry's own account the local user wrote it.
    pub fn last_message_label(&self) -> String {
        if self.last_message_sender.is_empty() {
            return truncate_chars(&self.last_message_body, LAST_MESSAGE_MAX_CHARS);
        }

        if self.last_message_sender != self.username && !self.last_message_body.is_empty() {
            return truncate_chars(
                &format!("{OWN_MESSAGE_PREFIX}{}", self.last_message_body),
                LAST_MESSAGE_MAX_CHARS,
            );
        }

        let sender = truncate_chars(&self.last_message_sender, SENDER_NAME_MAX_CHARS);
        truncate_chars(
            &format!("{sender}: {}", self.last_message_body),
            LAST_MESSAGE_MAX_CHARS,
        )
    }
}

/// Keeps the first `max_chars` characters and marks the cut with an ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(username: &str, sender: &str, body: &str) -> RosterEntry {
        RosterEntry {
            user_id: UserId(2),
            username: username.to_owned(),
            last_message_sender: sender.to_owned(),
            last_message_body: body.to_owned(),
            last_message_timestamp: DateTime::<Utc>::default(),
            online_status: OnlineStatus::Online,
        }
    }

    #[test]
    fn peer_authored_message_is_prefixed_and_truncated() {
        let alice = entry("alice", "alice", "hello world this is long");

        assert_eq!(alice.last_message_label(), "alice: hello world...");
    }

    #[test]
    fn own_message_gets_you_prefix() {
        let alice = entry("alice", "bob", "see you");

        assert_eq!(alice.last_message_label(), "You: see you");
    }

    #[test]
    fn empty_sender_shows_body_verbatim() {
        let newcomer = entry("carol", "", "Say hi 👋");

        assert_eq!(newcomer.last_message_label(), "Say hi 👋");
    }

    #[test]
    fn empty_sender_body_is_still_truncated() {
        let entry = entry("dave", "", "hello world this is long");

        assert_eq!(entry.last_message_label(), "hello world this i...");
    }

    #[test]
    fn long_sender_names_are_shortened_before_joining() {
        let long = entry("bartholomew_the_third", "bartholomew_the_third", "ok");

        assert_eq!(long.last_message_label(), "bartholome...: ok");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("ééééé", 3), "ééé...");
        assert_eq!(truncate_chars("short", 18), "short");
        assert_eq!(truncate_chars("exactly-eighteen!!", 18), "exactly-eighteen!!");
    }

    #[test]
    fn parses_online_status_case_insensitively() {
        assert_eq!(OnlineStatus::from_wire("Online"), OnlineStatus::Online);
        assert_eq!(OnlineStatus::from_wire("offline"), OnlineStatus::Offline);
        assert_eq!(OnlineStatus::from_wire(""), OnlineStatus::Offline);
    }
}
