use async_trait::async_trait;
use chrono::{DateTime, Utc};
use raffle_core::{StoreError, TicketStore};
use raffle_shared::{TicketNumber, TicketRecord, TicketStatus};
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct State {
    rows: Vec<TicketRecord>,
    unavailable: bool,
    fail_next_append_after: Option<usize>,
}

/// Reference store keeping rows in memory.
///
/// The plain variant behaves like the spreadsheet: appends are blind, so two
/// writers that checked the same stale snapshot can both append a number.
/// The conditional variant offers `append_if_vacant`, which checks and
/// appends under one write lock.
pub struct InMemoryTicketStore {
    state: RwLock<State>,
    conditional: bool,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            conditional: false,
        }
    }

    /// A store that supports atomic conditional appends
    pub fn conditional() -> Self {
        Self {
            state: RwLock::new(State::default()),
            conditional: true,
        }
    }

    pub fn with_records(self, records: Vec<TicketRecord>) -> Self {
        Self {
            state: RwLock::new(State {
                rows: records,
                ..State::default()
            }),
            conditional: self.conditional,
        }
    }

    /// Make every call fail with `StoreError::Unavailable` until cleared
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Make the next append write only the first `rows` records, then fail
    pub async fn fail_next_append_after(&self, rows: usize) {
        self.state.write().await.fail_next_append_after = Some(rows);
    }

    fn check_available(state: &State) -> Result<(), StoreError> {
        if state.unavailable {
            return Err(StoreError::Unavailable("in-memory store offline".into()));
        }
        Ok(())
    }

    fn push_rows(state: &mut State, records: &[TicketRecord]) -> Result<(), StoreError> {
        match state.fail_next_append_after.take() {
            Some(limit) if limit < records.len() => {
                state.rows.extend_from_slice(&records[..limit]);
                Err(StoreError::Write(format!(
                    "append interrupted after {} of {} rows",
                    limit,
                    records.len()
                )))
            }
            _ => {
                state.rows.extend_from_slice(records);
                Ok(())
            }
        }
    }
}

impl Default for InMemoryTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn read_all(&self) -> Result<Vec<TicketRecord>, StoreError> {
        let state = self.state.read().await;
        Self::check_available(&state)?;
        Ok(state.rows.clone())
    }

    async fn append_batch(&self, records: &[TicketRecord]) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        Self::check_available(&state)?;
        Self::push_rows(&mut state, records)?;
        debug!("Appended {} ticket rows", records.len());
        Ok(())
    }

    async fn update_status(
        &self,
        number: TicketNumber,
        status: TicketStatus,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Self::check_available(&state)?;

        let mut found = false;
        for row in state.rows.iter_mut().filter(|r| r.number == number) {
            row.status = status;
            found = true;
        }
        Ok(found)
    }

    async fn release(
        &self,
        number: TicketNumber,
        held_since: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        Self::check_available(&state)?;

        let before = state.rows.len();
        state.rows.retain(|r| {
            !(r.number == number && r.status == TicketStatus::Reserved && r.timestamp == held_since)
        });
        Ok(state.rows.len() < before)
    }

    async fn clear_and_rewrite(&self, records: Vec<TicketRecord>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        Self::check_available(&state)?;
        state.rows = records;
        Ok(())
    }

    fn supports_conditional_append(&self) -> bool {
        self.conditional
    }

    async fn append_if_vacant(
        &self,
        records: &[TicketRecord],
    ) -> Result<Vec<TicketNumber>, StoreError> {
        if !self.conditional {
            return Err(StoreError::Unsupported("append_if_vacant"));
        }

        let mut state = self.state.write().await;
        Self::check_available(&state)?;

        let occupied: HashSet<TicketNumber> = state.rows.iter().map(|r| r.number).collect();
        let mut conflicts: Vec<TicketNumber> = records
            .iter()
            .map(|r| r.number)
            .filter(|n| occupied.contains(n))
            .collect();

        if !conflicts.is_empty() {
            conflicts.sort();
            conflicts.dedup();
            return Ok(conflicts);
        }

        Self::push_rows(&mut state, records)?;
        Ok(Vec::new())
    }
}
