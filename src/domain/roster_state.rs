//! Presence list kept as a keyed map of long-lived rows.
//!
//! Refreshes are diffed against the rows already shown: a row keeps its handle
//! for as long as its account stays in the roster, so the view can update it in
//! place instead of rebuilding the list.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::{
    roster::{OnlineStatus, RosterEntry},
    time_labels::format_time_ago,
    user::UserId,
};

/// Identity of a rendered roster row, stable across refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    handle: RowHandle,
    user_id: UserId,
    username: String,
    status: OnlineStatus,
    last_message_label: String,
    last_message_timestamp: DateTime<Utc>,
    time_label: String,
}

impl RosterRow {
    fn new(handle: RowHandle, entry: &RosterEntry, now: DateTime<Utc>) -> Self {
        let mut row = Self {
            handle,
            user_id: entry.user_id,
            username: String::new(),
            status: OnlineStatus::Offline,
            last_message_label: String::new(),
            last_message_timestamp: DateTime::<Utc>::default(),
            time_label: String::new(),
        };
        row.update(entry, now);
        row
    }

    fn update(&mut self, entry: &RosterEntry, now: DateTime<Utc>) {
        self.username.clone_from(&entry.username);
        self.status = entry.online_status;
        self.last_message_label = entry.last_message_label();
        self.last_message_timestamp = entry.last_message_timestamp;
        self.time_label = format_time_ago(entry.last_message_timestamp, now);
    }

    pub fn handle(&self) -> RowHandle {
        self.handle
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn status(&self) -> OnlineStatus {
        self.status
    }

    pub fn last_message_label(&self) -> &str {
        &self.last_message_label
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub updated: usize,
    pub appended: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterUiState {
    Loading,
    Ready,
    Empty,
    Error,
}

#[derive(Debug, Clone)]
pub struct RosterState {
    ui_state: RosterUiState,
    rows: HashMap<UserId, RosterRow>,
    order: Vec<UserId>,
    selected: Option<UserId>,
    next_handle: u64,
}

impl Default for RosterState {
    fn default() -> Self {
        Self {
            ui_state: RosterUiState::Loading,
            rows: HashMap::new(),
            order: Vec::new(),
            selected: None,
            next_handle: 0,
        }
    }
}

impl RosterState {
    pub fn ui_state(&self) -> RosterUiState {
        self.ui_state
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &RosterRow> {
        self.order.iter().filter_map(|user_id| self.rows.get(user_id))
    }

    pub fn row(&self, user_id: UserId) -> Option<&RosterRow> {
        self.rows.get(&user_id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected?;
        self.order.iter().position(|user_id| *user_id == selected)
    }

    pub fn selected_row(&self) -> Option<&RosterRow> {
        self.selected.and_then(|user_id| self.rows.get(&user_id))
    }

    pub fn set_error(&mut self) {
        if self.order.is_empty() {
            self.ui_state = RosterUiState::Error;
        }
    }

    /// Applies a fresh roster snapshot, keeping rows for accounts that remain.
    pub fn reconcile(&mut self, entries: &[RosterEntry], now: DateTime<Utc>) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut order = Vec::with_capacity(entries.len());
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in entries {
            if !seen.insert(entry.user_id) {
                continue;
            }
            order.push(entry.user_id);

            match self.rows.get_mut(&entry.user_id) {
                Some(row) => {
                    row.update(entry, now);
                    report.updated += 1;
                }
                None => {
                    let handle = self.allocate_handle();
                    self.rows
                        .insert(entry.user_id, RosterRow::new(handle, entry, now));
                    report.appended += 1;
                }
            }
        }

        let before = self.rows.len();
        self.rows.retain(|user_id, _| seen.contains(user_id));
        report.removed = before - self.rows.len();

        self.order = order;
        self.ui_state = if self.order.is_empty() {
            RosterUiState::Empty
        } else {
            RosterUiState::Ready
        };
        self.selected = self
            .selected
            .filter(|user_id| self.rows.contains_key(user_id))
            .or_else(|| self.order.first().copied());

        report
    }

    pub fn refresh_time_labels(&mut self, now: DateTime<Utc>) {
        for row in self.rows.values_mut() {
            row.time_label = format_time_ago(row.last_message_timestamp, now);
        }
    }

    pub fn select_next(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };

        let last_index = self.order.len().saturating_sub(1);
        self.selected = self
            .order
            .get(std::cmp::min(index.saturating_add(1), last_index))
            .copied();
    }

    pub fn select_previous(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };

        self.selected = self.order.get(index.saturating_sub(1)).copied();
    }

    fn allocate_handle(&mut self) -> RowHandle {
        self.next_handle += 1;
        RowHandle(self.next_handle)
    }
}
