//! Turns rendered thread messages into terminal lines.
//!
//! Every message takes exactly [`RenderedMessage::height`] lines at the given
//! width (the sender, each wrapped body row, the time) so the thread's row-based
//! scroll model matches what is drawn.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
};

use crate::domain::{
    message::MessageDirection, thread_state::RenderedMessage, time_labels::format_message_time,
};

use super::styles;

pub fn thread_lines<'a>(
    messages: impl Iterator<Item = &'a RenderedMessage>,
    width: usize,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    messages
        .flat_map(|message| message_lines(message, width, now))
        .collect()
}

pub fn message_lines(
    message: &RenderedMessage,
    width: usize,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let (alignment, sender, sender_style) = match message.direction {
        MessageDirection::Sent => (Alignment::Right, "You".to_owned(), styles::sent_sender_style()),
        MessageDirection::Received => (
            Alignment::Left,
            message.sender_name.clone(),
            styles::received_sender_style(),
        ),
    };

    let mut lines = Vec::with_capacity(message.height(width));
    lines.push(Line::from(Span::styled(sender, sender_style)).alignment(alignment));

    for row in message.body_rows(width) {
        lines.push(Line::from(Span::styled(row, styles::message_text_style())).alignment(alignment));
    }

    lines.push(
        Line::from(Span::styled(
            format_message_time(message.timestamp, now),
            styles::message_time_style(),
        ))
        .alignment(alignment),
    );

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(direction: MessageDirection, body: &str) -> RenderedMessage {
        RenderedMessage {
            direction,
            sender_name: "bob".to_owned(),
            body: body.to_owned(),
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp"),
        }
    }

    fn line_to_string(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn line_count_matches_message_height() {
        let now = Utc::now();

        let long = "z".repeat(95);
        for body in ["", "one", "one\ntwo\nthree", long.as_str()] {
            let message = rendered(MessageDirection::Received, body);
            assert_eq!(message_lines(&message, 40, now).len(), message.height(40));
            assert_eq!(message_lines(&message, 0, now).len(), message.height(0));
        }
    }

    #[test]
    fn sent_messages_are_right_aligned_and_labelled_you() {
        let lines = message_lines(&rendered(MessageDirection::Sent, "hi"), 40, Utc::now());

        assert_eq!(line_to_string(&lines[0]), "You");
        assert!(lines
            .iter()
            .all(|line| line.alignment == Some(Alignment::Right)));
    }

    #[test]
    fn received_messages_show_sender_then_body() {
        let lines = message_lines(&rendered(MessageDirection::Received, "hi"), 40, Utc::now());

        assert_eq!(line_to_string(&lines[0]), "bob");
        assert_eq!(line_to_string(&lines[1]), "hi");
        assert_eq!(lines[0].alignment, Some(Alignment::Left));
    }

    #[test]
    fn thread_lines_concatenate_in_order() {
        let messages = [
            rendered(MessageDirection::Received, "first"),
            rendered(MessageDirection::Sent, "second"),
        ];

        let lines = thread_lines(messages.iter(), 40, Utc::now());

        assert_eq!(lines.len(), 6);
        assert_eq!(line_to_string(&lines[4]), "second");
    }
}
