//! chatsheet - Terminal Spreadsheet with an AI Assistant
//!
//! A terminal spreadsheet editor whose assistant sidebar can propose new
//! spreadsheets. Proposals are normalized into rectangular grids, reviewed
//! by the user, and only then added to the workbook.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
