use crate::domain::Order;

/// Payment transitions for an order.
///
/// An order moves `unpaid -> capturing -> paid`, or back from `capturing` to
/// `unpaid` when the processor refuses the charge. Only the caller holding the
/// `capturing` claim may talk to the processor.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    /// Claims the order for a charge. Fails if it is paid or already claimed.
    BeginCapture,
    /// Marks the claimed order as paid.
    CompleteCapture,
    /// Drops the claim after a failed charge.
    AbortCapture,
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    /// Snapshot of the order at the moment it was claimed
    BeginCapture(Order),
    CompleteCapture(Order),
    AbortCapture,
}
