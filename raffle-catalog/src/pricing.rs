use serde::{Deserialize, Serialize};

/// Flat per-ticket price. Display only: nothing in the reservation flow
/// depends on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketPricing {
    pub unit_price: u32,
}

impl TicketPricing {
    pub fn new(unit_price: u32) -> Self {
        Self { unit_price }
    }

    /// Amount owed for `count` tickets
    pub fn amount_for(&self, count: usize) -> u64 {
        count as u64 * u64::from(self.unit_price)
    }
}
