//! Order records and the paid-flag state machine.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
