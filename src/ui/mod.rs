//! UI layer: terminal rendering and input.

mod event_source;
mod message_input;
mod message_rendering;
pub mod shell;
mod styles;
mod terminal;
mod view;

pub(crate) use event_source::TerminalEventSource;
