//! User records. Read-only from the order and payment flows.

pub mod entity;
pub mod error;

pub use error::*;
