//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Panel styles
// =============================================================================

pub fn active_panel_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn inactive_panel_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Highlight for the selected roster row.
pub fn selection_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}

// =============================================================================
// Roster styles
// =============================================================================

/// Style for the account name (bold, bright).
pub fn username_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn online_indicator_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn offline_indicator_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the last-message summary (dimmed).
pub fn last_message_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn time_label_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Thread styles
// =============================================================================

pub fn sent_sender_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub fn received_sender_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

pub fn message_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn message_time_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the "typing..." marker next to the peer name.
pub fn typing_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::ITALIC)
}

// =============================================================================
// Composer styles
// =============================================================================

pub fn input_prompt_style() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn input_placeholder_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

// =============================================================================
// Status and error styles
// =============================================================================

pub fn status_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Style for in-app alerts shown in place of the status line.
pub fn alert_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
}

pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_style_is_bold_white() {
        let style = username_style();
        assert_eq!(style.fg, Some(Color::White));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn online_indicator_style_is_green() {
        assert_eq!(online_indicator_style().fg, Some(Color::Green));
    }

    #[test]
    fn sent_and_received_senders_differ() {
        assert_ne!(sent_sender_style(), received_sender_style());
    }

    #[test]
    fn alert_style_stands_out() {
        assert_eq!(alert_style().bg, Some(Color::Yellow));
    }
}
