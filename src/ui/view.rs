use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::{
    events::FetchFailure,
    roster::OnlineStatus,
    roster_state::{RosterRow, RosterUiState},
    shell_state::{ActiveView, FocusedPane, ShellState},
    thread_state::ThreadUiState,
};

use super::{message_input::render_composer, message_rendering::thread_lines, styles};

pub fn render(frame: &mut Frame<'_>, state: &mut ShellState) {
    let now = Utc::now();
    let [content_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .areas(frame.area());

    if let ActiveView::Error(failure) = state.view() {
        render_error(frame, content_area, failure);
    } else {
        let [roster_area, conversation_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .areas(content_area);

        // 3 lines for the composer: 1 border + 1 text + 1 border
        let [thread_area, composer_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .areas(conversation_area);

        render_roster_panel(frame, roster_area, state);
        render_thread_panel(frame, thread_area, state, now);
        render_composer(
            frame,
            composer_area,
            state.composer(),
            state.view() == &ActiveView::Messages && state.focus() == FocusedPane::Composer,
        );
    }

    render_status(frame, status_area, state);
}

fn panel_block(title: impl Into<Line<'static>>, is_active: bool) -> Block<'static> {
    let border_style = if is_active {
        styles::active_panel_border_style()
    } else {
        styles::inactive_panel_border_style()
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_roster_panel(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let is_active = state.view() == &ActiveView::Roster;
    let roster = state.roster();

    let placeholder = match roster.ui_state() {
        RosterUiState::Loading => Some("Loading users..."),
        RosterUiState::Empty => Some("No other users yet. Press r to refresh."),
        RosterUiState::Error => Some("Failed to load users. Press r to retry."),
        RosterUiState::Ready => None,
    };
    if let Some(text) = placeholder {
        frame.render_widget(
            Paragraph::new(text).block(panel_block("Users", is_active)),
            area,
        );
        return;
    }

    let inner_width = usize::from(area.width.saturating_sub(2));
    let items: Vec<ListItem<'static>> = roster
        .rows()
        .map(|row| ListItem::new(roster_row_lines(row, inner_width)))
        .collect();

    let list = List::new(items)
        .block(panel_block(format!("Users ({})", roster.len()), is_active))
        .highlight_style(styles::selection_style());

    let mut list_state = ListState::default();
    list_state.select(roster.selected_index());
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Two lines per account: presence, name and time, then the last message.
fn roster_row_lines(row: &RosterRow, width: usize) -> Vec<Line<'static>> {
    let (dot, dot_style) = match row.status() {
        OnlineStatus::Online => ("\u{25CF} ", styles::online_indicator_style()),
        OnlineStatus::Offline => ("\u{25CB} ", styles::offline_indicator_style()),
    };

    let time_label = row.time_label().to_owned();
    let used = 2 + row.username().chars().count() + time_label.chars().count();
    let padding = width.saturating_sub(used).max(1);

    vec![
        Line::from(vec![
            Span::styled(dot, dot_style),
            Span::styled(row.username().to_owned(), styles::username_style()),
            Span::raw(" ".repeat(padding)),
            Span::styled(time_label, styles::time_label_style()),
        ]),
        Line::from(Span::styled(
            format!("  {}", row.last_message_label()),
            styles::last_message_style(),
        )),
    ]
}

fn render_thread_panel(frame: &mut Frame<'_>, area: Rect, state: &mut ShellState, now: DateTime<Utc>) {
    let is_active = state.view() == &ActiveView::Messages && state.focus() == FocusedPane::Thread;
    let title = thread_title(state);
    let block = panel_block(title, is_active);

    let placeholder = match state.thread().ui_state() {
        ThreadUiState::Closed => Some("Select a user to start chatting"),
        ThreadUiState::Loading => Some("Loading messages..."),
        ThreadUiState::Error => Some("Failed to load messages."),
        ThreadUiState::Ready if state.thread().rendered().len() == 0 => {
            Some("No messages yet. Say hi!")
        }
        ThreadUiState::Ready => None,
    };
    if let Some(text) = placeholder {
        frame.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let viewport_height = usize::from(area.height.saturating_sub(2));
    let wrap_width = usize::from(area.width.saturating_sub(2));
    state.thread_mut().set_viewport(viewport_height, wrap_width);

    let thread = state.thread();
    let lines = visible_lines(
        thread_lines(thread.rendered(), thread.wrap_width(), now),
        thread.scroll_top(),
        viewport_height,
    );

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Rows `scroll_top..scroll_top + height` of the thread content.
fn visible_lines(lines: Vec<Line<'static>>, scroll_top: usize, height: usize) -> Vec<Line<'static>> {
    lines.into_iter().skip(scroll_top).take(height).collect()
}

fn thread_title(state: &ShellState) -> Line<'static> {
    let thread = state.thread();
    let Some(peer_name) = thread.peer_name() else {
        return Line::from("Messages");
    };

    let mut spans = vec![Span::raw(format!("Messages with {peer_name}"))];
    if thread.has_older() {
        spans.push(Span::styled(" (more above)", styles::message_time_style()));
    }
    if thread.typing().is_visible() {
        spans.push(Span::styled(
            format!(" {peer_name} is typing..."),
            styles::typing_style(),
        ));
    }

    Line::from(spans)
}

fn render_error(frame: &mut Frame<'_>, area: Rect, failure: &FetchFailure) {
    let lines = vec![
        Line::from(Span::styled(error_heading(failure), styles::error_style())),
        Line::from(""),
        Line::from(failure.message.clone()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or Enter to go back",
            styles::message_time_style(),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel_block("Error", true));
    frame.render_widget(paragraph, area);
}

fn error_heading(failure: &FetchFailure) -> String {
    match failure.status {
        Some(status) => format!("Request failed with status {status}"),
        None => "Request failed".to_owned(),
    }
}

fn render_status(frame: &mut Frame<'_>, area: Rect, state: &ShellState) {
    let (text, style): (String, Style) = match state.alert() {
        Some(alert) => (format!(" {alert} (press any key)"), styles::alert_style()),
        None => (status_line(state), styles::status_style()),
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn status_line(state: &ShellState) -> String {
    let mut user = state.session_user().username.clone();
    if state.session_status().is_some_and(|status| !status.authenticated) {
        user.push_str(" (signed out)");
    }
    let connection = state.connection().as_label();
    let nav_hint = match (state.view(), state.focus()) {
        (ActiveView::Roster, _) => "j/k: navigate | Enter: open | r: refresh | q: quit",
        (ActiveView::Messages, FocusedPane::Thread) => {
            "j/k: scroll | i: compose | h/Esc: back to users | Ctrl+C: quit"
        }
        (ActiveView::Messages, FocusedPane::Composer) => "Enter: send | Esc: stop typing",
        (ActiveView::Error(_), _) => "Esc/Enter: back to users",
    };

    format!("{user} | {connection} | {nav_hint}")
}
