use std::{
    sync::mpsc::Receiver,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    domain::events::{AppEvent, KeyInput},
    usecases::contracts::AppEventSource,
};

const TICK_INTERVAL: Duration = Duration::from_millis(100);
const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Merges terminal input with events posted by network and fetch workers, and
/// emits a `Tick` at least every [`TICK_INTERVAL`].
pub struct TerminalEventSource {
    inbound: Receiver<AppEvent>,
    last_tick: Instant,
}

impl TerminalEventSource {
    pub fn new(inbound: Receiver<AppEvent>) -> Self {
        Self {
            inbound,
            last_tick: Instant::now(),
        }
    }
}

impl AppEventSource for TerminalEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if self.last_tick.elapsed() >= TICK_INTERVAL {
            self.last_tick = Instant::now();
            return Ok(Some(AppEvent::Tick));
        }

        if let Ok(event) = self.inbound.try_recv() {
            return Ok(Some(event));
        }

        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(None);
        }

        Ok(map_terminal_event(event::read()?))
    }
}

fn map_terminal_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => map_key_event(key),
        Event::FocusGained => Some(AppEvent::FocusChanged { focused: true }),
        Event::FocusLost => Some(AppEvent::FocusChanged { focused: false }),
        _ => None,
    }
}

fn map_key_event(key: KeyEvent) -> Option<AppEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(AppEvent::QuitRequested);
    }

    let name = match key.code {
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::Enter => "enter".to_owned(),
        KeyCode::Esc => "esc".to_owned(),
        KeyCode::Backspace => "backspace".to_owned(),
        KeyCode::Delete => "delete".to_owned(),
        KeyCode::Left => "left".to_owned(),
        KeyCode::Right => "right".to_owned(),
        KeyCode::Up => "up".to_owned(),
        KeyCode::Down => "down".to_owned(),
        KeyCode::Home => "home".to_owned(),
        KeyCode::End => "end".to_owned(),
        KeyCode::PageUp => "pageup".to_owned(),
        KeyCode::PageDown => "pagedown".to_owned(),
        _ => return None,
    };

    Some(AppEvent::InputKey(KeyInput::new(name, ctrl)))
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}
