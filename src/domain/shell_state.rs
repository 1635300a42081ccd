use std::time::Duration;

use super::{
    composer_state::ComposerState,
    connection::ConnectionState,
    events::FetchFailure,
    roster_state::RosterState,
    thread_state::ThreadState,
    typing::OutboundTyping,
    user::{SessionStatus, SessionUser},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveView {
    Roster,
    Messages,
    Error(FetchFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Thread,
    Composer,
}

#[derive(Debug, Clone)]
pub struct ShellState {
    running: bool,
    session_user: SessionUser,
    session_status: Option<SessionStatus>,
    connection: ConnectionState,
    view: ActiveView,
    focus: FocusedPane,
    terminal_focused: bool,
    alert: Option<String>,
    roster: RosterState,
    thread: ThreadState,
    composer: ComposerState,
    outbound_typing: OutboundTyping,
}

impl ShellState {
    pub fn new(session_user: SessionUser, typing_idle: Duration, scroll_throttle: Duration) -> Self {
        Self {
            running: true,
            session_status: None,
            connection: ConnectionState::Connecting,
            view: ActiveView::Roster,
            focus: FocusedPane::Thread,
            terminal_focused: true,
            alert: None,
            roster: RosterState::default(),
            thread: ThreadState::new(session_user.id, scroll_throttle),
            composer: ComposerState::default(),
            outbound_typing: OutboundTyping::new(typing_idle),
            session_user,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn session_user(&self) -> &SessionUser {
        &self.session_user
    }

    pub fn session_status(&self) -> Option<SessionStatus> {
        self.session_status
    }

    pub fn set_session_status(&mut self, status: SessionStatus) {
        self.session_status = Some(status);
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn show_roster(&mut self) {
        self.view = ActiveView::Roster;
        self.focus = FocusedPane::Thread;
    }

    pub fn show_messages(&mut self) {
        self.view = ActiveView::Messages;
    }

    pub fn show_error(&mut self, failure: FetchFailure) {
        self.view = ActiveView::Error(failure);
        self.focus = FocusedPane::Thread;
    }

    pub fn focus(&self) -> FocusedPane {
        self.focus
    }

    pub fn set_focus(&mut self, focus: FocusedPane) {
        self.focus = focus;
    }

    /// Whether the user is looking at the client, the terminal analogue of a
    /// visible browser tab.
    pub fn is_visible(&self) -> bool {
        self.terminal_focused
    }

    pub fn set_terminal_focused(&mut self, focused: bool) {
        self.terminal_focused = focused;
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn set_alert(&mut self, text: impl Into<String>) {
        self.alert = Some(text.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn roster(&self) -> &RosterState {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut RosterState {
        &mut self.roster
    }

    pub fn thread(&self) -> &ThreadState {
        &self.thread
    }

    pub fn thread_mut(&mut self) -> &mut ThreadState {
        &mut self.thread
    }

    pub fn composer(&self) -> &ComposerState {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut ComposerState {
        &mut self.composer
    }

    pub fn outbound_typing_mut(&mut self) -> &mut OutboundTyping {
        &mut self.outbound_typing
    }
}
