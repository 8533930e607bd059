//! UI state and key-event transitions.
//!
//! # Responsibility
//! - Hold everything the draw code needs: active tab, input fields,
//!   checklist selection, the info line and the current record snapshot.
//! - Dispatch key events to the record service and re-query after every
//!   mutation.
//!
//! # Invariants
//! - `records` is a full, unfiltered `list_all` snapshot.
//! - `selected` always points into the pending view (clamped on refresh).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use procboard_core::report;
use procboard_core::{ProcessRecord, RecordRepository, RecordService, RepoError};
use std::collections::BTreeSet;

pub const TAB_TITLES: [&str; 3] = ["Add", "Pending", "Closed"];

/// Active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Add,
    Pending,
    Closed,
}

impl Tab {
    pub fn index(self) -> usize {
        match self {
            Self::Add => 0,
            Self::Pending => 1,
            Self::Closed => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Add => Self::Pending,
            Self::Pending => Self::Closed,
            Self::Closed => Self::Add,
        }
    }
}

/// Focused input on the Add tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddField {
    Number,
    Submitter,
    Remove,
}

impl AddField {
    fn next(self) -> Self {
        match self {
            Self::Number => Self::Submitter,
            Self::Submitter => Self::Remove,
            Self::Remove => Self::Number,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Number => Self::Remove,
            Self::Submitter => Self::Number,
            Self::Remove => Self::Submitter,
        }
    }
}

pub struct App {
    pub tab: Tab,
    pub focus: AddField,
    pub number_input: String,
    pub submitter_input: String,
    pub remove_input: String,
    /// Cursor into the pending checklist on the Closed tab.
    pub selected: usize,
    /// One-line status message shown at the bottom of every view.
    pub info: String,
    pub records: Vec<ProcessRecord>,
}

impl App {
    pub fn new() -> Self {
        Self {
            tab: Tab::Add,
            focus: AddField::Number,
            number_input: String::new(),
            submitter_input: String::new(),
            remove_input: String::new(),
            selected: 0,
            info: String::new(),
            records: Vec::new(),
        }
    }

    /// Re-queries the full table and clamps the checklist selection.
    pub fn refresh<R: RecordRepository>(&mut self, service: &RecordService<R>) {
        match service.list_all() {
            Ok(records) => {
                self.records = records;
                let last = report::pending(&self.records).len().saturating_sub(1);
                self.selected = self.selected.min(last);
            }
            Err(err) => self.info = format!("Storage failure: {err}"),
        }
    }

    /// Handles one key press. Returns `true` when the app should quit.
    pub fn on_key<R: RecordRepository>(
        &mut self,
        key: KeyEvent,
        service: &RecordService<R>,
    ) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.info.clear();
                self.refresh(service);
                return false;
            }
            _ => {}
        }

        match self.tab {
            Tab::Add => self.on_add_key(key.code, service),
            Tab::Pending => self.on_list_key(key.code, service),
            Tab::Closed => self.on_closed_key(key.code, service),
        }
    }

    fn on_add_key<R: RecordRepository>(
        &mut self,
        code: KeyCode,
        service: &RecordService<R>,
    ) -> bool {
        match code {
            KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Enter => match self.focus {
                AddField::Remove => self.remove_by_typed_number(service),
                AddField::Number | AddField::Submitter => self.submit_form(service),
            },
            KeyCode::Backspace => {
                self.focused_input_mut().pop();
            }
            KeyCode::Char(c) => self.focused_input_mut().push(c),
            _ => {}
        }
        false
    }

    fn on_list_key<R: RecordRepository>(
        &mut self,
        code: KeyCode,
        service: &RecordService<R>,
    ) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => {
                self.refresh(service);
                self.info = String::from("Refreshed.");
            }
            _ => {}
        }
        false
    }

    fn on_closed_key<R: RecordRepository>(
        &mut self,
        code: KeyCode,
        service: &RecordService<R>,
    ) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('r') => {
                self.refresh(service);
                self.info = String::from("Refreshed.");
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = report::pending(&self.records).len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
            }
            KeyCode::Char(' ') => self.close_selected(service),
            KeyCode::Char('a') => self.close_all(service),
            KeyCode::Char('p') => self.purge_history(service),
            _ => {}
        }
        false
    }

    fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            AddField::Number => &mut self.number_input,
            AddField::Submitter => &mut self.submitter_input,
            AddField::Remove => &mut self.remove_input,
        }
    }

    fn submit_form<R: RecordRepository>(&mut self, service: &RecordService<R>) {
        match service.submit(self.number_input.clone(), self.submitter_input.clone()) {
            Ok(record) => {
                self.info = format!("Process {} submitted.", record.number);
                self.number_input.clear();
                self.submitter_input.clear();
                self.focus = AddField::Number;
                self.refresh(service);
            }
            Err(RepoError::Validation(_)) => {
                self.info = String::from("Fill in all fields.");
            }
            Err(err) => self.info = format!("Storage failure: {err}"),
        }
    }

    fn remove_by_typed_number<R: RecordRepository>(&mut self, service: &RecordService<R>) {
        if self.remove_input.is_empty() {
            self.info = String::from("Enter the process number to remove.");
            return;
        }

        match service.remove_by_number(&self.remove_input) {
            Ok(removed) => {
                self.info = format!(
                    "Removed {removed} record(s) for process {}.",
                    self.remove_input
                );
                self.remove_input.clear();
                self.refresh(service);
            }
            Err(err) => self.info = format!("Storage failure: {err}"),
        }
    }

    fn close_selected<R: RecordRepository>(&mut self, service: &RecordService<R>) {
        let Some(number) = report::pending(&self.records)
            .get(self.selected)
            .map(|record| record.number.clone())
        else {
            return;
        };

        let mut numbers = BTreeSet::new();
        numbers.insert(number.clone());
        match service.close_numbers(&numbers) {
            Ok(_) => {
                self.info = format!("Process {number} closed.");
                self.refresh(service);
            }
            Err(err) => self.info = format!("Storage failure: {err}"),
        }
    }

    fn close_all<R: RecordRepository>(&mut self, service: &RecordService<R>) {
        if report::pending(&self.records).is_empty() {
            self.info = String::from("No pending processes.");
            return;
        }

        match service.close_all_pending() {
            Ok(closed) => {
                self.info = format!("Closed {closed} process(es).");
                self.refresh(service);
            }
            Err(err) => self.info = format!("Storage failure: {err}"),
        }
    }

    fn purge_history<R: RecordRepository>(&mut self, service: &RecordService<R>) {
        match service.purge_closed() {
            Ok(purged) => {
                self.info = format!("Cleared {purged} record(s) from the closed history.");
                self.refresh(service);
            }
            Err(err) => self.info = format!("Storage failure: {err}"),
        }
    }
}
