use raffle_catalog::Catalog;
use raffle_core::{CoreResult, TicketStore};
use raffle_shared::{TicketNumber, TicketRecord, TicketStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a participant sees for one number
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    Free,
    Reserved,
    Paid,
}

/// Point-in-time view of which numbers hold an active record.
///
/// A cache of the store, valid for one interaction at most. Anything that
/// writes must take a fresh one first.
#[derive(Debug, Clone, Default)]
pub struct OccupancySnapshot {
    occupied: HashMap<TicketNumber, TicketStatus>,
}

impl OccupancySnapshot {
    pub fn from_records(records: &[TicketRecord]) -> Self {
        let mut occupied = HashMap::with_capacity(records.len());
        for record in records {
            // Duplicate rows only come out of the commit race; a paid row wins.
            let status = occupied.entry(record.number).or_insert(record.status);
            if record.status == TicketStatus::Paid {
                *status = TicketStatus::Paid;
            }
        }
        Self { occupied }
    }

    /// Read the store now
    pub async fn fetch(store: &dyn TicketStore) -> CoreResult<Self> {
        let records = store.read_all().await?;
        Ok(Self::from_records(&records))
    }

    pub fn contains(&self, number: TicketNumber) -> bool {
        self.occupied.contains_key(&number)
    }

    pub fn status_of(&self, number: TicketNumber) -> Option<TicketStatus> {
        self.occupied.get(&number).copied()
    }

    /// Occupied numbers, ascending
    pub fn numbers(&self) -> Vec<TicketNumber> {
        let mut numbers: Vec<TicketNumber> = self.occupied.keys().copied().collect();
        numbers.sort();
        numbers
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    /// State of every catalog number, in catalog order
    pub fn availability(&self, catalog: &Catalog) -> Vec<(TicketNumber, Availability)> {
        catalog
            .all_numbers()
            .iter()
            .map(|&n| {
                let state = match self.status_of(n) {
                    None => Availability::Free,
                    Some(TicketStatus::Reserved) => Availability::Reserved,
                    Some(TicketStatus::Paid) => Availability::Paid,
                };
                (n, state)
            })
            .collect()
    }
}
