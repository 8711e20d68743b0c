//! Typed handles over the store actors, plus the orchestrating clients
//! (checkout and payment) that coordinate several of them.

#[macro_use]
mod macros;

mod order_client;
mod payment_client;
mod product_client;
mod user_client;

pub use order_client::*;
pub use payment_client::*;
pub use product_client::*;
pub use user_client::*;
