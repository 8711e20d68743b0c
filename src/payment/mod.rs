//! Everything that leaves the process during payment: the processor that
//! captures funds and the mailer that sends the receipt.

pub mod error;
pub mod notifier;
pub mod processor;

pub use error::*;
pub use notifier::*;
pub use processor::*;
