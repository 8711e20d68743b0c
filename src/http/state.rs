use crate::auth::AuthGate;
use crate::clients::{OrderClient, PaymentClient};

/// Shared handler state. Every field is a cheap channel handle.
#[derive(Clone)]
pub struct AppState {
    pub orders: OrderClient,
    pub payments: PaymentClient,
    pub gate: AuthGate,
}

impl AppState {
    pub fn new(orders: OrderClient, payments: PaymentClient, gate: AuthGate) -> Self {
        Self { orders, payments, gate }
    }
}
