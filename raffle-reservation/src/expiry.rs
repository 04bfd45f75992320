use chrono::{DateTime, Duration, Utc};
use raffle_core::{CoreResult, TicketStore};
use raffle_shared::models::events::ReservationsExpiredEvent;
use std::sync::Arc;
use tracing::{debug, info};

/// Returns stale reservations to the pool.
///
/// Only RESERVED rows older than the threshold are touched, and each one is
/// released by exact match, so a row paid or re-reserved since the scan
/// survives. Safe to run alongside commits.
pub struct ExpirySweeper {
    store: Arc<dyn TicketStore>,
    threshold: Duration,
}

impl ExpirySweeper {
    /// A threshold too large to represent means reservations never expire.
    pub fn new(store: Arc<dyn TicketStore>, threshold_hours: u64) -> Self {
        let threshold = i64::try_from(threshold_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);
        Self { store, threshold }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Release every reservation older than the threshold at `now`.
    /// Returns how many rows this run removed.
    pub async fn sweep(&self, now: DateTime<Utc>) -> CoreResult<usize> {
        let records = self.store.read_all().await?;

        let mut released = Vec::new();
        for record in records.iter().filter(|r| r.is_expired(now, self.threshold)) {
            if self.store.release(record.number, record.timestamp).await? {
                released.push(record.number);
            }
        }

        if released.is_empty() {
            debug!("Sweep found no expired reservations");
        } else {
            let event = ReservationsExpiredEvent {
                numbers: released.clone(),
                swept_at: now,
            };
            info!(event = ?event, "Released {} expired reservations", released.len());
        }

        Ok(released.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raffle_shared::{TicketNumber, TicketRecord, TicketStatus};
    use raffle_store::InMemoryTicketStore;

    #[tokio::test]
    async fn test_sweep_is_idempotent_and_spares_paid() {
        let now = Utc::now();
        let stale = now - Duration::hours(49);
        let fresh = now - Duration::hours(1);

        let mut paid = TicketRecord::reserved("Luis", TicketNumber(3), stale);
        paid.status = TicketStatus::Paid;

        let store = Arc::new(InMemoryTicketStore::new().with_records(vec![
            TicketRecord::reserved("Ana", TicketNumber(1), stale),
            TicketRecord::reserved("Ana", TicketNumber(2), fresh),
            paid,
        ]));
        let sweeper = ExpirySweeper::new(store.clone(), 48);

        assert_eq!(sweeper.sweep(now).await.unwrap(), 1);
        assert_eq!(sweeper.sweep(now).await.unwrap(), 0);

        let remaining: Vec<u32> = store.read_all().await.unwrap().iter().map(|r| r.number.value()).collect();
        assert_eq!(remaining, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_boundary_is_not_expired() {
        let now = Utc::now();
        let store = Arc::new(InMemoryTicketStore::new().with_records(vec![TicketRecord::reserved(
            "Ana",
            TicketNumber(1),
            now - Duration::hours(48),
        )]));
        let sweeper = ExpirySweeper::new(store, 48);
        assert_eq!(sweeper.sweep(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_huge_threshold_never_expires() {
        let now = Utc::now();
        let store = Arc::new(InMemoryTicketStore::new().with_records(vec![TicketRecord::reserved(
            "Ana",
            TicketNumber(1),
            now - Duration::days(3650),
        )]));

        for hours in [1_000_000_000_000, u64::MAX] {
            let sweeper = ExpirySweeper::new(store.clone(), hours);
            assert_eq!(sweeper.sweep(now).await.unwrap(), 0);
        }
        assert_eq!(ExpirySweeper::new(store.clone(), u64::MAX).threshold(), Duration::MAX);
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_outage_surfaces() {
        let store = Arc::new(InMemoryTicketStore::new());
        store.set_unavailable(true).await;
        let sweeper = ExpirySweeper::new(store, 48);
        assert!(matches!(
            sweeper.sweep(Utc::now()).await,
            Err(raffle_core::CoreError::StoreUnavailable(_))
        ));
    }
}
