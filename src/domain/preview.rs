//! Two-phase change: a proposed grid is reviewed before it touches state.

use super::errors::{DomainError, DomainResult};
use super::models::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    /// Waiting for the user to accept or reject.
    Pending,
    Committed,
    Rejected,
}

/// A candidate grid held apart from committed state.
///
/// The commit callback runs at most once, and only from [`PreviewChanges::commit`]
/// while the preview is still pending.
///
/// # Examples
///
/// ```
/// use chatsheet::domain::{Grid, PreviewChanges, PreviewStatus};
///
/// let mut preview = PreviewChanges::new("Create spreadsheet", "Spreadsheet created", Grid::new(1, 1));
/// preview.set_cell(0, 0, "hello").unwrap();
///
/// let mut committed = None;
/// preview.commit(|rows| committed = Some(rows)).unwrap();
///
/// assert_eq!(preview.status(), PreviewStatus::Committed);
/// assert_eq!(preview.label(), "Spreadsheet created");
/// assert_eq!(committed.unwrap().value(0, 0), "hello");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewChanges {
    pre_commit_title: String,
    post_commit_title: String,
    rows: Grid,
    status: PreviewStatus,
}

impl PreviewChanges {
    pub fn new(
        pre_commit_title: impl Into<String>,
        post_commit_title: impl Into<String>,
        rows: Grid,
    ) -> Self {
        Self {
            pre_commit_title: pre_commit_title.into(),
            post_commit_title: post_commit_title.into(),
            rows,
            status: PreviewStatus::Pending,
        }
    }

    pub fn status(&self) -> PreviewStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == PreviewStatus::Pending
    }

    /// Title to show for the current state.
    pub fn label(&self) -> &str {
        match self.status {
            PreviewStatus::Committed => &self.post_commit_title,
            PreviewStatus::Pending | PreviewStatus::Rejected => &self.pre_commit_title,
        }
    }

    pub fn rows(&self) -> &Grid {
        &self.rows
    }

    /// Edits the candidate grid before it is committed.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::PreviewClosed);
        }
        self.rows.set(row, col, value)
    }

    /// Hands the final grid to `apply` and closes the preview.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PreviewClosed`] without calling `apply` if the
    /// preview was already committed or rejected.
    pub fn commit<F>(&mut self, apply: F) -> DomainResult<()>
    where
        F: FnOnce(Grid),
    {
        if !self.is_pending() {
            return Err(DomainError::PreviewClosed);
        }
        self.status = PreviewStatus::Committed;
        apply(self.rows.clone());
        Ok(())
    }

    /// Discards the proposal.
    pub fn reject(&mut self) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::PreviewClosed);
        }
        self.status = PreviewStatus::Rejected;
        Ok(())
    }
}
