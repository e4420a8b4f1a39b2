//! Application state management for the terminal spreadsheet.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface, including the assistant sidebar and
//! the review of assistant-proposed spreadsheets.

use std::sync::Arc;

use super::actions::{AssistantAction, ProposedSpreadsheet};
use super::chat::{ChatPanel, WELCOME_MESSAGE};
use super::text_input::TextInput;
use crate::domain::{DomainResult, Grid, Spreadsheet, SpreadsheetStore};
use crate::infrastructure::{
    ActionInvocation, Assistant, AssistantError, AssistantReply, ChatMessage, HostBridge,
    parse_tsv,
};

/// Shown when a proposal arrives while the user is busy elsewhere.
pub const PROPOSAL_READY: &str = "Spreadsheet proposal ready: press p to review";

/// Represents the current mode of the application.
///
/// The mode determines how user input is interpreted and what UI elements
/// are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Normal navigation mode - arrow keys move selection, shortcuts available
    Normal,
    /// Cell editing mode - user is typing into a cell
    Editing,
    /// Typing a message to the assistant
    Chat,
    /// Reviewing a spreadsheet proposed by the assistant
    Preview,
    /// Editing a cell of the proposed spreadsheet
    PreviewEditing,
    /// Help screen is displayed
    Help,
}

/// Main application state containing the spreadsheets and UI state.
///
/// # Examples
///
/// ```
/// use chatsheet::application::App;
///
/// let app = App::default();
/// assert_eq!(app.selected_row, 0);
/// assert_eq!(app.selected_col, 0);
/// assert_eq!(app.spreadsheet().title, "Spreadsheet 1");
/// ```
pub struct App {
    /// All spreadsheets and which one is shown
    pub store: SpreadsheetStore,
    /// Currently selected row (zero-based)
    pub selected_row: usize,
    /// Currently selected column (zero-based)
    pub selected_col: usize,
    /// Top-left row visible in the viewport
    pub scroll_row: usize,
    /// Left-most column visible in the viewport
    pub scroll_col: usize,
    /// Current application mode
    pub mode: AppMode,
    /// Buffer for cell editing, in the sheet or in the preview
    pub input: TextInput,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Assistant sidebar
    pub chat: ChatPanel,
    /// Spreadsheet proposed by the assistant, awaiting review
    pub proposal: Option<ProposedSpreadsheet>,
    /// Cursor inside the proposal grid
    pub preview_row: usize,
    pub preview_col: usize,
    /// Viewport height in rows (for scrolling calculations)
    pub viewport_rows: usize,
    /// Viewport width in columns (for scrolling calculations)
    pub viewport_cols: usize,
    /// Proposal that arrived while a proposed cell was being edited
    incoming_proposal: Option<ProposedSpreadsheet>,
    host: HostBridge,
    assistant: Option<Arc<dyn Assistant>>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(HostBridge::default(), None, false)
    }
}

impl App {
    pub fn new(host: HostBridge, assistant: Option<Arc<dyn Assistant>>, sidebar_open: bool) -> Self {
        let mut chat = ChatPanel::default();
        chat.visible = sidebar_open;
        Self {
            store: SpreadsheetStore::default(),
            selected_row: 0,
            selected_col: 0,
            scroll_row: 0,
            scroll_col: 0,
            mode: AppMode::Normal,
            input: TextInput::default(),
            help_scroll: 0,
            status_message: None,
            chat,
            proposal: None,
            preview_row: 0,
            preview_col: 0,
            viewport_rows: 20,
            viewport_cols: 8,
            incoming_proposal: None,
            host,
            assistant,
        }
    }

    /// The spreadsheet currently shown.
    pub fn spreadsheet(&self) -> &Spreadsheet {
        self.store.selected()
    }

    fn grid(&self) -> &Grid {
        &self.spreadsheet().rows
    }

    /// Applies `edit` to a copy of the selected spreadsheet, stores the copy
    /// in place of the original and tells the host about it.
    fn replace_selected<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut Spreadsheet) -> DomainResult<()>,
    {
        let index = self.store.selected_index();
        let mut sheet = self.spreadsheet().clone();
        let result = edit(&mut sheet).and_then(|()| self.store.update_spreadsheet(index, sheet));
        match result {
            Ok(()) => self.host.notify_spreadsheet_updated(self.store.selected()),
            Err(e) => {
                log::warn!("Spreadsheet update rejected: {}", e);
                self.status_message = Some(e.to_string());
            }
        }
    }

    // Navigation

    pub fn move_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
        self.ensure_cursor_visible();
    }

    pub fn move_down(&mut self) {
        if self.selected_row + 1 < self.grid().row_count() {
            self.selected_row += 1;
        }
        self.ensure_cursor_visible();
    }

    pub fn move_left(&mut self) {
        self.selected_col = self.selected_col.saturating_sub(1);
        self.ensure_cursor_visible();
    }

    pub fn move_right(&mut self) {
        if self.selected_col + 1 < self.grid().col_count() {
            self.selected_col += 1;
        }
        self.ensure_cursor_visible();
    }

    fn reset_cursor(&mut self) {
        self.selected_row = 0;
        self.selected_col = 0;
        self.scroll_row = 0;
        self.scroll_col = 0;
    }

    pub fn next_spreadsheet(&mut self) {
        self.store.select_next();
        self.reset_cursor();
    }

    pub fn previous_spreadsheet(&mut self) {
        self.store.select_previous();
        self.reset_cursor();
    }

    /// Updates the viewport size for proper scrolling calculations.
    pub fn update_viewport_size(&mut self, rows: usize, cols: usize) {
        self.viewport_rows = rows;
        self.viewport_cols = cols;
    }

    /// Ensures the selected cell is visible by adjusting scroll position.
    pub fn ensure_cursor_visible(&mut self) {
        if self.selected_row < self.scroll_row {
            self.scroll_row = self.selected_row;
        } else if self.selected_row >= self.scroll_row + self.viewport_rows {
            self.scroll_row = self.selected_row + 1 - self.viewport_rows.max(1);
        }

        if self.selected_col < self.scroll_col {
            self.scroll_col = self.selected_col;
        } else if self.selected_col >= self.scroll_col + self.viewport_cols {
            self.scroll_col = self.selected_col + 1 - self.viewport_cols.max(1);
        }
    }

    // Editing the selected spreadsheet

    /// Switches to editing mode for the currently selected cell.
    pub fn start_editing(&mut self) {
        if self.grid().get(self.selected_row, self.selected_col).is_none() {
            return;
        }
        self.input = TextInput::with_text(self.grid().value(self.selected_row, self.selected_col));
        self.mode = AppMode::Editing;
    }

    /// Writes the input into the selected cell and moves down one row.
    pub fn finish_editing(&mut self) {
        let (row, col) = (self.selected_row, self.selected_col);
        let value = self.input.take();
        self.replace_selected(|sheet| sheet.rows.set(row, col, value));
        self.mode = AppMode::Normal;
        self.move_down();
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
    }

    pub fn clear_selected_cell(&mut self) {
        let (row, col) = (self.selected_row, self.selected_col);
        self.replace_selected(|sheet| sheet.rows.set(row, col, ""));
    }

    pub fn append_row(&mut self) {
        self.replace_selected(|sheet| {
            sheet.rows.push_row();
            Ok(())
        });
    }

    pub fn append_column(&mut self) {
        self.replace_selected(|sheet| {
            sheet.rows.push_column();
            Ok(())
        });
    }

    /// Value of the selected cell, for the clipboard.
    pub fn selected_value(&self) -> &str {
        self.grid().value(self.selected_row, self.selected_col)
    }

    /// Pastes tab-separated text with its top-left corner at the cursor,
    /// growing the spreadsheet when the block does not fit.
    pub fn paste_text(&mut self, text: &str) {
        let block = match parse_tsv(text) {
            Ok(block) if !block.is_empty() => block,
            Ok(_) => return,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };
        let (top, left) = (self.selected_row, self.selected_col);
        let width = block.iter().map(Vec::len).max().unwrap_or(0);
        self.replace_selected(|sheet| {
            sheet.rows.ensure_size(top + block.len(), left + width);
            for (r, values) in block.into_iter().enumerate() {
                for (c, value) in values.into_iter().enumerate() {
                    sheet.rows.set(top + r, left + c, value)?;
                }
            }
            Ok(())
        });
    }

    // Assistant sidebar

    pub fn toggle_sidebar(&mut self) {
        self.chat.visible = !self.chat.visible;
        self.host.notify_sidebar_visibility(self.chat.visible);
        if !self.chat.visible && self.mode == AppMode::Chat {
            self.mode = AppMode::Normal;
        }
    }

    pub fn focus_chat(&mut self) {
        if !self.chat.visible {
            self.toggle_sidebar();
        }
        self.mode = AppMode::Chat;
    }

    pub fn leave_chat(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Welcome text shown above an empty history.
    pub fn chat_greeting(&self) -> &'static str {
        WELCOME_MESSAGE
    }

    /// Sends the chat input to the assistant. Ignored while a previous
    /// message is still being processed or when the input is blank.
    pub fn send_chat_message(&mut self) {
        if self.chat.in_progress() || self.chat.input.as_str().trim().is_empty() {
            return;
        }
        let text = self.chat.input.take();
        self.chat.messages.push(ChatMessage::user(text));

        match self.assistant.clone() {
            Some(assistant) => self.chat.start_exchange(assistant),
            None => {
                log::warn!("No assistant runtime configured");
                self.chat
                    .messages
                    .push(ChatMessage::assistant("No assistant runtime is configured."));
            }
        }
    }

    /// Picks up a finished assistant exchange, if any.
    pub fn poll_assistant(&mut self) {
        if let Some(result) = self.chat.poll() {
            self.handle_assistant_reply(result);
        }
    }

    pub fn handle_assistant_reply(&mut self, result: Result<AssistantReply, AssistantError>) {
        match result {
            Ok(reply) => {
                if let Some(message) = reply.message.filter(|m| !m.is_empty()) {
                    self.chat.messages.push(ChatMessage::assistant(message));
                }
                for invocation in &reply.actions {
                    self.handle_action(invocation);
                }
            }
            Err(e) => {
                log::warn!("Assistant exchange failed: {}", e);
                self.chat
                    .messages
                    .push(ChatMessage::assistant(format!("Sorry, something went wrong: {}", e)));
            }
        }
        self.host.notify_message_processed();
    }

    /// Runs an assistant action. A proposed spreadsheet opens for review
    /// straight away only from normal mode; in any other mode it is kept
    /// and announced, and whatever the user is typing is left alone.
    pub fn handle_action(&mut self, invocation: &ActionInvocation) {
        match AssistantAction::from_invocation(invocation) {
            AssistantAction::CreateSpreadsheet(args) => {
                let proposal = ProposedSpreadsheet::from_args(&args);
                log::debug!(
                    "Proposed spreadsheet {:?}: {}x{}",
                    proposal.title,
                    proposal.preview.rows().row_count(),
                    proposal.preview.rows().col_count()
                );
                match self.mode {
                    AppMode::Normal | AppMode::Preview => {
                        self.replace_proposal(proposal);
                        self.mode = AppMode::Preview;
                    }
                    AppMode::PreviewEditing => {
                        // Swapped in once the cell edit is finished or cancelled
                        self.incoming_proposal = Some(proposal);
                    }
                    AppMode::Editing | AppMode::Chat | AppMode::Help => {
                        self.replace_proposal(proposal);
                        self.status_message = Some(PROPOSAL_READY.to_string());
                    }
                }
            }
            AssistantAction::Unknown(name) => {
                log::warn!("Assistant invoked unknown action {}", name);
                self.chat
                    .messages
                    .push(ChatMessage::assistant(format!("Unknown action: {}", name)));
            }
        }
    }

    fn replace_proposal(&mut self, proposal: ProposedSpreadsheet) {
        if self.proposal.is_some() {
            log::info!("Replacing unanswered spreadsheet proposal");
        }
        self.proposal = Some(proposal);
        self.preview_row = 0;
        self.preview_col = 0;
    }

    /// Installs a proposal that arrived during a preview cell edit.
    fn take_incoming_proposal(&mut self) {
        if let Some(proposal) = self.incoming_proposal.take() {
            self.replace_proposal(proposal);
            self.status_message = Some("Replaced by a newer proposal".to_string());
        }
    }

    /// Opens the pending proposal for review.
    pub fn open_preview(&mut self) {
        if self.proposal.is_some() {
            self.mode = AppMode::Preview;
        } else {
            self.status_message = Some("No proposal to review".to_string());
        }
    }

    // Reviewing a proposal

    /// Commits the proposal as a new spreadsheet and shows it.
    pub fn accept_preview(&mut self) {
        let Some(mut proposal) = self.proposal.take() else {
            return;
        };
        match proposal.commit_into(&mut self.store) {
            Ok(index) => {
                log::info!("Created spreadsheet {:?} at index {}", proposal.title, index);
                self.reset_cursor();
                self.status_message = Some(proposal.preview.label().to_string());
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
        self.mode = AppMode::Normal;
    }

    /// Drops the proposal; the spreadsheets are left untouched.
    pub fn reject_preview(&mut self) {
        if let Some(mut proposal) = self.proposal.take() {
            let _ = proposal.preview.reject();
            self.status_message = Some("Changes discarded".to_string());
        }
        self.mode = AppMode::Normal;
    }

    fn proposal_grid(&self) -> Option<&Grid> {
        self.proposal.as_ref().map(|p| p.preview.rows())
    }

    pub fn preview_move(&mut self, rows: isize, cols: isize) {
        let Some((height, width)) = self.proposal_grid().map(|g| (g.row_count(), g.col_count())) else {
            return;
        };
        self.preview_row = self
            .preview_row
            .saturating_add_signed(rows)
            .min(height.saturating_sub(1));
        self.preview_col = self
            .preview_col
            .saturating_add_signed(cols)
            .min(width.saturating_sub(1));
    }

    pub fn start_preview_editing(&mut self) {
        let value = match self.proposal_grid().and_then(|g| g.get(self.preview_row, self.preview_col)) {
            Some(cell) => cell.value.clone(),
            None => return,
        };
        self.input = TextInput::with_text(value);
        self.mode = AppMode::PreviewEditing;
    }

    pub fn finish_preview_editing(&mut self) {
        let value = self.input.take();
        if let Some(proposal) = self.proposal.as_mut() {
            if let Err(e) = proposal.preview.set_cell(self.preview_row, self.preview_col, value) {
                self.status_message = Some(e.to_string());
            }
        }
        self.mode = AppMode::Preview;
        self.take_incoming_proposal();
    }

    pub fn cancel_preview_editing(&mut self) {
        self.input.clear();
        self.mode = AppMode::Preview;
        self.take_incoming_proposal();
    }
}
