//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! managing application state, the assistant conversation and the review of
//! proposed spreadsheets.

pub mod actions;
pub mod chat;
pub mod state;
pub mod text_input;

pub use actions::*;
pub use chat::*;
pub use state::*;
pub use text_input::*;
