use raffle_core::{Clock, CoreError, CoreResult, StoreError, TicketStore};
use raffle_shared::models::events::TicketsReservedEvent;
use raffle_shared::{Masked, TicketNumber, TicketRecord, TicketStatus};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::occupancy::OccupancySnapshot;
use crate::session::SelectionSession;

/// Turns a complete selection into persisted RESERVED rows.
///
/// Against a plain store the check-then-append leaves a window of one read
/// round-trip in which another writer can take the same number. Stores that
/// support conditional appends close that window.
pub struct ReservationCommitter {
    store: Arc<dyn TicketStore>,
    clock: Arc<dyn Clock>,
}

impl ReservationCommitter {
    pub fn new(store: Arc<dyn TicketStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Persist the session's numbers for its owner.
    ///
    /// On success the session is cleared. On any error the session is left
    /// exactly as it was so the caller can refresh or retry.
    pub async fn commit(&self, session: &mut SelectionSession) -> CoreResult<Vec<TicketRecord>> {
        if session.owner_name().is_empty() {
            return Err(CoreError::InvalidInput("participant name is required".into()));
        }
        if !session.is_ready_to_commit() {
            return Err(CoreError::InvalidInput(format!(
                "chose {} of {} tickets",
                session.chosen_set().len(),
                session.requested_count()
            )));
        }

        let fresh = OccupancySnapshot::fetch(self.store.as_ref()).await?;
        let conflicts: Vec<TicketNumber> = session
            .chosen_set()
            .iter()
            .copied()
            .filter(|n| fresh.contains(*n))
            .collect();
        if !conflicts.is_empty() {
            warn!(session_id = %session.id(), ?conflicts, "Selection lost numbers before commit");
            return Err(CoreError::NumberUnavailable(conflicts));
        }

        let now = self.clock.now();
        let records: Vec<TicketRecord> = session
            .chosen_set()
            .iter()
            .map(|&n| TicketRecord::reserved(session.owner_name(), n, now))
            .collect();

        let written = if self.store.supports_conditional_append() {
            self.store.append_if_vacant(&records).await
        } else {
            self.store.append_batch(&records).await.map(|_| Vec::new())
        };

        match written {
            Ok(conflicts) if conflicts.is_empty() => {}
            Ok(conflicts) => {
                warn!(session_id = %session.id(), ?conflicts, "Conditional append refused taken numbers");
                return Err(CoreError::NumberUnavailable(conflicts));
            }
            Err(err) => self.verify_after_failure(&records, err).await?,
        }

        let event = TicketsReservedEvent {
            session_id: session.id(),
            numbers: session.chosen(),
            reserved_at: now,
        };
        info!(
            owner = %Masked(session.owner_name()),
            event = ?event,
            "Reserved {} tickets",
            records.len()
        );

        session.clear();
        Ok(records)
    }

    /// An append error says nothing about how many rows landed. Read the
    /// store back and check which of our rows are present.
    async fn verify_after_failure(&self, records: &[TicketRecord], err: StoreError) -> CoreResult<()> {
        error!("Append failed, re-reading store to verify: {}", err);

        let rows = self
            .store
            .read_all()
            .await
            .map_err(|e| CoreError::StoreUnavailable(format!("could not verify commit after '{}': {}", err, e)))?;

        let present: HashSet<(TicketNumber, &str, i64)> = rows
            .iter()
            .filter(|r| r.status == TicketStatus::Reserved)
            .map(|r| (r.number, r.owner.as_str(), r.timestamp.timestamp_micros()))
            .collect();

        let landed: Vec<&TicketRecord> = records
            .iter()
            .filter(|r| present.contains(&(r.number, r.owner.as_str(), r.timestamp.timestamp_micros())))
            .collect();

        if landed.len() == records.len() {
            warn!("Append reported '{}' but every row is present; treating as committed", err);
            return Ok(());
        }
        if landed.is_empty() {
            return Err(match err {
                StoreError::Unavailable(msg) => CoreError::StoreUnavailable(msg),
                other => CoreError::StoreError(format!("0 of {} rows written: {}", records.len(), other)),
            });
        }

        // Partial batch: take our rows back out so the same selection can be retried.
        let mut stranded = Vec::new();
        for row in &landed {
            match self.store.release(row.number, row.timestamp).await {
                Ok(true) => {}
                Ok(false) => stranded.push(row.number),
                Err(e) => {
                    error!(number = %row.number, "Could not roll back partial commit: {}", e);
                    stranded.push(row.number);
                }
            }
        }

        let outcome = if stranded.is_empty() {
            "rolled back".to_string()
        } else {
            warn!(?stranded, "Partial commit rows left for the expiry sweeper");
            format!("{} left in store", stranded.len())
        };
        Err(CoreError::StoreError(format!(
            "{} of {} rows written, {}: {}",
            landed.len(),
            records.len(),
            outcome,
            err
        )))
    }
}
