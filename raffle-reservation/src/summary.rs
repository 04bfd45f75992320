use raffle_catalog::{Catalog, TicketPricing};
use raffle_shared::{TicketRecord, TicketStatus};
use serde::Serialize;

use crate::occupancy::OccupancySnapshot;

/// Headline counts for the sales board
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SalesSummary {
    pub paid: usize,
    pub reserved: usize,
    pub available: usize,
    pub total: usize,
    /// Paid tickets times the unit price
    pub collected: u64,
}

impl SalesSummary {
    pub fn from_records(records: &[TicketRecord], catalog: &Catalog, pricing: &TicketPricing) -> Self {
        let snapshot = OccupancySnapshot::from_records(records);
        let mut paid = 0;
        let mut reserved = 0;
        for n in catalog.all_numbers() {
            match snapshot.status_of(*n) {
                Some(TicketStatus::Paid) => paid += 1,
                Some(TicketStatus::Reserved) => reserved += 1,
                None => {}
            }
        }

        Self {
            paid,
            reserved,
            available: catalog.len() - paid - reserved,
            total: catalog.len(),
            collected: pricing.amount_for(paid),
        }
    }
}
