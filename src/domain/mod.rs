pub mod models;
pub mod canonical;
pub mod preview;
pub mod store;
pub mod errors;

pub use models::*;
pub use canonical::*;
pub use preview::*;
pub use store::*;
pub use errors::*;
