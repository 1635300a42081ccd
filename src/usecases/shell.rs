use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::{
    domain::{
        connection::ConnectionState,
        events::{AppEvent, FetchFailure, KeyInput},
        message::Message,
        roster::RosterEntry,
        shell_state::{ActiveView, FocusedPane, ShellState},
        user::{SessionStatus, UserId},
    },
    protocol::{InboundFrame, OutboundFrame, WireMessage, WireUser},
};

use super::{
    contracts::{FetchRequests, FrameSink, HistoryRequest, Notifier, ShellOrchestrator},
    notifications::{self, Outcome, Route},
    send_message::{send_message, SendMessageCommand, SendMessageError},
};

const SCROLL_PAGE_ROWS: isize = 10;

pub struct DefaultShellOrchestrator<F, N, R>
where
    F: FrameSink,
    N: Notifier,
    R: FetchRequests,
{
    state: ShellState,
    frames: F,
    notifier: N,
    fetches: R,
}

impl<F, N, R> DefaultShellOrchestrator<F, N, R>
where
    F: FrameSink,
    N: Notifier,
    R: FetchRequests,
{
    pub fn new(state: ShellState, frames: F, notifier: N, fetches: R) -> Self {
        Self {
            state,
            frames,
            notifier,
            fetches,
        }
    }

    /// Handles `event` against explicit clocks: `now` drives timers, `wall` drives labels.
    pub fn handle_event_at(
        &mut self,
        event: AppEvent,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> Result<()> {
        match event {
            AppEvent::Tick => self.on_tick(now, wall),
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.on_key(&key, now),
            AppEvent::FocusChanged { focused } => self.state.set_terminal_focused(focused),
            AppEvent::ConnectionChanged { connection, state } => {
                self.on_connection_changed(connection, state, now)
            }
            AppEvent::FrameReceived(frame) => self.on_frame(frame, wall),
            AppEvent::HistoryFetched {
                peer,
                generation,
                result,
            } => self.on_history_fetched(peer, generation, result),
            AppEvent::RosterFetched(result) => self.on_roster_fetched(result, wall),
        }

        Ok(())
    }

    fn local_user(&self) -> UserId {
        self.state.session_user().id
    }

    fn on_tick(&mut self, now: Instant, wall: DateTime<Utc>) {
        if let Some(is_typing) = self.state.outbound_typing_mut().poll(now) {
            self.send_typing(is_typing);
        }
        self.state.thread_mut().step_smooth_scroll();
        self.state.roster_mut().refresh_time_labels(wall);
        self.frames.maintain(now);
    }

    fn on_key(&mut self, key: &KeyInput, now: Instant) {
        self.state.dismiss_alert();

        match self.state.view() {
            ActiveView::Roster => self.on_roster_key(key),
            ActiveView::Messages => match self.state.focus() {
                FocusedPane::Thread => self.on_thread_key(key, now),
                FocusedPane::Composer => self.on_composer_key(key, now),
            },
            ActiveView::Error(_) => {
                if matches!(key.key.as_str(), "esc" | "enter") {
                    self.state.thread_mut().close();
                    self.state.show_roster();
                }
            }
        }
    }

    fn on_roster_key(&mut self, key: &KeyInput) {
        match key.key.as_str() {
            "j" | "down" => self.state.roster_mut().select_next(),
            "k" | "up" => self.state.roster_mut().select_previous(),
            "enter" => self.open_selected(),
            "r" => self.refresh_roster(),
            "q" => self.state.stop(),
            _ => {}
        }
    }

    fn on_thread_key(&mut self, key: &KeyInput, now: Instant) {
        let delta = match key.key.as_str() {
            "k" | "up" => -1,
            "j" | "down" => 1,
            "pageup" => -SCROLL_PAGE_ROWS,
            "pagedown" => SCROLL_PAGE_ROWS,
            "i" => {
                self.state.set_focus(FocusedPane::Composer);
                return;
            }
            "esc" | "h" => {
                self.close_conversation();
                return;
            }
            _ => return,
        };

        self.state.thread_mut().scroll_by(delta, now);
    }

    fn on_composer_key(&mut self, key: &KeyInput, now: Instant) {
        match key.key.as_str() {
            "enter" => return self.submit_draft(),
            "esc" => return self.state.set_focus(FocusedPane::Thread),
            _ => {}
        }

        let composer = self.state.composer_mut();
        let edited = match key.key.as_str() {
            "backspace" => composer.backspace(),
            "delete" => composer.delete(),
            "left" => {
                composer.move_left();
                false
            }
            "right" => {
                composer.move_right();
                false
            }
            "home" => {
                composer.move_home();
                false
            }
            "end" => {
                composer.move_end();
                false
            }
            _ => match key.text_char() {
                Some(ch) => composer.insert(ch),
                None => false,
            },
        };

        if !edited {
            return;
        }

        let has_text = self.state.composer().has_text();
        if let Some(is_typing) = self.state.outbound_typing_mut().on_input(now, has_text) {
            self.send_typing(is_typing);
        }
    }

    fn open_selected(&mut self) {
        let Some(row) = self.state.roster().selected_row() else {
            return;
        };
        let peer = row.user_id();
        let peer_name = row.username().to_owned();

        self.stop_typing();
        let generation = self.state.thread_mut().open(peer, peer_name.clone());
        self.state.composer_mut().take();
        self.state.show_messages();
        self.state.set_focus(FocusedPane::Thread);

        let request = OutboundFrame::GetMessages {
            second_user: peer,
            receiver: peer_name,
        };
        if self.frames.send(request).is_err() {
            self.fetches.request_history(HistoryRequest {
                local_user: self.local_user(),
                peer,
                generation,
            });
        }
    }

    fn close_conversation(&mut self) {
        self.stop_typing();
        self.state.thread_mut().close();
        self.state.composer_mut().take();
        self.state.show_roster();
    }

    fn refresh_roster(&mut self) {
        if self.frames.send(OutboundFrame::LoadUsers).is_err() {
            self.fetches.request_roster(self.local_user());
        }
    }

    fn submit_draft(&mut self) {
        let Some(peer_id) = self.state.thread().open_peer() else {
            return;
        };
        let peer_name = self.state.thread().peer_name().unwrap_or_default().to_owned();
        let command = SendMessageCommand {
            peer_id,
            peer_name,
            text: self.state.composer().text().to_owned(),
        };

        match send_message(&mut self.frames, command) {
            Ok(()) => {
                self.state.composer_mut().take();
                self.stop_typing();
            }
            Err(SendMessageError::EmptyMessage) => {}
            Err(error) => self.state.set_alert(format!("Message was not sent: {error}")),
        }
    }

    fn stop_typing(&mut self) {
        if let Some(is_typing) = self.state.outbound_typing_mut().on_send() {
            self.send_typing(is_typing);
        }
    }

    fn send_typing(&mut self, is_typing: bool) {
        let Some(peer) = self.state.thread().open_peer() else {
            return;
        };

        let frame = OutboundFrame::Typing {
            is_typing,
            second_user: peer,
            first_user: self.local_user(),
        };
        if self.frames.send(frame).is_err() {
            tracing::debug!(is_typing, "typing status not announced");
        }
    }

    fn on_connection_changed(&mut self, connection: u64, state: ConnectionState, now: Instant) {
        if !self.frames.connection_changed(connection, state, now) {
            return;
        }

        self.state.set_connection(state);
        match state {
            ConnectionState::Connecting => {}
            ConnectionState::Open => self.refresh_roster(),
            ConnectionState::Closed | ConnectionState::Errored => {
                self.state.outbound_typing_mut().clear();
                if let Some(peer) = self.state.thread().open_peer() {
                    self.state.thread_mut().apply_peer_typing(peer, false);
                }
            }
        }
    }

    fn on_frame(&mut self, frame: InboundFrame, wall: DateTime<Utc>) {
        match frame {
            InboundFrame::Roster { users } => {
                let entries = self.roster_entries(users.unwrap_or_default());
                self.state.roster_mut().reconcile(&entries, wall);
            }
            InboundFrame::History {
                messages,
                receiver_id,
                ..
            } => {
                if !self.state.thread().accepts_history(receiver_id, None) {
                    tracing::debug!(peer = %receiver_id, "dropping history for a closed conversation");
                    return;
                }
                let history = messages
                    .unwrap_or_default()
                    .into_iter()
                    .map(WireMessage::into_message)
                    .collect();
                self.state.thread_mut().show_history(history);
            }
            InboundFrame::Chat { messages, .. } => {
                self.on_chat_message(messages.into_message());
                self.refresh_roster();
            }
            InboundFrame::Typing { sender, is_typing } => {
                if !self.state.thread_mut().apply_peer_typing(sender, is_typing) {
                    tracing::debug!(sender = %sender, "typing status for a closed conversation");
                }
            }
            InboundFrame::Offline {
                receiver,
                receiver_id,
            } => {
                let name = receiver
                    .filter(|name| !name.is_empty())
                    .or_else(|| {
                        receiver_id
                            .and_then(|id| self.state.roster().row(id))
                            .map(|row| row.username().to_owned())
                    })
                    .unwrap_or_else(|| "Recipient".to_owned());
                self.state
                    .set_alert(format!("{name} is offline; message was not delivered"));
            }
            InboundFrame::Status {
                authenticated,
                privilege,
            } => {
                self.state.set_session_status(SessionStatus {
                    authenticated,
                    privilege,
                });
                if !authenticated {
                    self.state
                        .set_alert("Session is not authenticated; sign in again");
                }
            }
        }
    }

    fn roster_entries(&self, users: Vec<WireUser>) -> Vec<RosterEntry> {
        let local_user = self.local_user();
        users
            .into_iter()
            .map(WireUser::into_entry)
            .filter(|entry| entry.user_id != local_user)
            .collect()
    }

    fn on_chat_message(&mut self, message: Message) {
        let local_user = self.local_user();
        if message.sender_id == local_user {
            self.state.thread_mut().append_live(message);
            return;
        }

        let route = notifications::route_incoming(
            &message,
            local_user,
            self.state.thread().open_peer(),
            self.state.is_visible(),
        );
        match route {
            Route::RenderInThread => {
                self.state.thread_mut().append_live(message);
            }
            Route::Notify => {
                if let Outcome::Alert(text) = notifications::deliver(&mut self.notifier, &message) {
                    self.state.set_alert(text);
                }
            }
        }
    }

    fn on_history_fetched(
        &mut self,
        peer: UserId,
        generation: u64,
        result: Result<Vec<Message>, FetchFailure>,
    ) {
        if !self.state.thread().accepts_history(peer, Some(generation)) {
            tracing::debug!(peer = %peer, generation, "dropping stale history response");
            return;
        }

        match result {
            Ok(history) => self.state.thread_mut().show_history(history),
            Err(failure) => {
                self.state.thread_mut().set_error();
                self.state.show_error(failure);
            }
        }
    }

    fn on_roster_fetched(&mut self, result: Result<Vec<RosterEntry>, FetchFailure>, wall: DateTime<Utc>) {
        match result {
            Ok(entries) => {
                self.state.roster_mut().reconcile(&entries, wall);
            }
            Err(failure) => {
                self.state.roster_mut().set_error();
                if self.state.view() == &ActiveView::Roster {
                    self.state.show_error(failure);
                }
            }
        }
    }
}

impl<F, N, R> ShellOrchestrator for DefaultShellOrchestrator<F, N, R>
where
    F: FrameSink,
    N: Notifier,
    R: FetchRequests,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ShellState {
        &mut self.state
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        self.handle_event_at(event, Instant::now(), Utc::now())
    }

    fn start(&mut self) {
        self.fetches.request_roster(self.local_user());
    }
}
