//! Product-specific domain logic, including atomic stock reservation.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
