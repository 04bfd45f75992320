use raffle_catalog::Catalog;
use raffle_core::{CoreError, CoreResult};
use raffle_shared::TicketNumber;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::occupancy::OccupancySnapshot;

/// Bounds on how many tickets one participant may request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub min: u32,
    pub max: u32,
}

/// Most tickets any one participant may hold in a single selection
pub const MAX_TICKETS_PER_PARTICIPANT: u32 = 20;

impl SelectionLimits {
    /// Limits must satisfy `1 <= min <= max <= 20`.
    pub fn new(min: u32, max: u32) -> CoreResult<Self> {
        if min == 0 || min > max || max > MAX_TICKETS_PER_PARTICIPANT {
            return Err(CoreError::InvalidInput(format!(
                "ticket limits {}..{} must lie within 1..{}",
                min, max, MAX_TICKETS_PER_PARTICIPANT
            )));
        }
        Ok(Self { min, max })
    }
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self { min: 1, max: MAX_TICKETS_PER_PARTICIPANT }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// One participant's in-progress, unpersisted choice of numbers.
///
/// Holds `chosen.len() <= requested_count` at all times. Dropping the
/// session without committing leaves no trace anywhere.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    id: Uuid,
    owner_name: String,
    requested_count: u32,
    chosen: BTreeSet<TicketNumber>,
    limits: SelectionLimits,
    catalog: Arc<Catalog>,
}

impl SelectionSession {
    pub fn new(catalog: Arc<Catalog>, limits: SelectionLimits) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_name: String::new(),
            requested_count: limits.min,
            chosen: BTreeSet::new(),
            limits,
            catalog,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn set_owner_name(&mut self, name: &str) {
        self.owner_name = name.trim().to_string();
    }

    pub fn requested_count(&self) -> u32 {
        self.requested_count
    }

    /// Change how many tickets the participant wants.
    ///
    /// Lowering the count below what is already chosen is refused rather
    /// than dropping numbers behind the participant's back.
    pub fn set_requested_count(&mut self, count: u32) -> CoreResult<()> {
        if count < self.limits.min || count > self.limits.max {
            return Err(CoreError::InvalidInput(format!(
                "ticket count must be between {} and {}, got {}",
                self.limits.min, self.limits.max, count
            )));
        }
        if (count as usize) < self.chosen.len() {
            return Err(CoreError::InvalidTransition {
                requested: count,
                chosen: self.chosen.len(),
            });
        }
        self.requested_count = count;
        Ok(())
    }

    /// Select or deselect `number` against the latest snapshot
    pub fn toggle(&mut self, number: TicketNumber, snapshot: &OccupancySnapshot) -> CoreResult<ToggleOutcome> {
        if !self.catalog.contains(number) {
            return Err(CoreError::InvalidInput(format!("{} is not a ticket in this raffle", number)));
        }
        if snapshot.contains(number) {
            return Err(CoreError::NumberUnavailable(vec![number]));
        }
        if self.chosen.remove(&number) {
            return Ok(ToggleOutcome::Removed);
        }
        if self.chosen.len() >= self.requested_count as usize {
            return Err(CoreError::CapacityReached {
                requested: self.requested_count,
            });
        }
        self.chosen.insert(number);
        Ok(ToggleOutcome::Added)
    }

    /// Drop every chosen number that `snapshot` shows as taken.
    /// Returns the dropped numbers, ascending.
    pub fn refresh(&mut self, snapshot: &OccupancySnapshot) -> Vec<TicketNumber> {
        let taken: Vec<TicketNumber> = self.chosen.iter().copied().filter(|n| snapshot.contains(*n)).collect();
        for n in &taken {
            self.chosen.remove(n);
        }
        taken
    }

    pub fn is_ready_to_commit(&self) -> bool {
        !self.owner_name.is_empty() && self.chosen.len() == self.requested_count as usize
    }

    /// Chosen numbers, ascending
    pub fn chosen(&self) -> Vec<TicketNumber> {
        self.chosen.iter().copied().collect()
    }

    pub fn chosen_set(&self) -> &BTreeSet<TicketNumber> {
        &self.chosen
    }

    pub fn clear(&mut self) {
        self.chosen.clear();
    }
}
