//! Desktop notifications raised through the terminal's OSC 9 escape.

use std::{
    env,
    io::{self, Write},
};

use crossterm::{execute, style::Print};

use crate::{
    domain::notification::NotificationPermission,
    usecases::contracts::{Notifier, NotifyError},
};

/// Terminals known to turn OSC 9 into a desktop notification.
const OSC9_TERMINALS: [&str; 3] = ["iTerm.app", "WezTerm", "ghostty"];

pub struct TerminalNotifier<W: Write = io::Stdout> {
    permission: NotificationPermission,
    term_program: Option<String>,
    writer: W,
}

impl TerminalNotifier {
    pub fn new(permission: NotificationPermission) -> Self {
        Self::with_writer(permission, env::var("TERM_PROGRAM").ok(), io::stdout())
    }
}

impl<W: Write> TerminalNotifier<W> {
    pub fn with_writer(
        permission: NotificationPermission,
        term_program: Option<String>,
        writer: W,
    ) -> Self {
        Self {
            permission,
            term_program,
            writer,
        }
    }
}

impl<W: Write> Notifier for TerminalNotifier<W> {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        if self.permission == NotificationPermission::Default {
            self.permission = if supports_osc9(self.term_program.as_deref()) {
                NotificationPermission::Granted
            } else {
                NotificationPermission::Denied
            };
            tracing::info!(permission = ?self.permission, "notification permission decided");
        }

        self.permission
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        let text = format!("{}: {}", printable(title), printable(body));
        execute!(self.writer, Print(format!("\x1b]9;{text}\x07")))?;
        Ok(())
    }
}

fn supports_osc9(term_program: Option<&str>) -> bool {
    term_program.is_some_and(|program| OSC9_TERMINALS.contains(&program))
}

/// Drops control characters so message text cannot end the escape early.
fn printable(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}
