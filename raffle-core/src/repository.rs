use async_trait::async_trait;
use chrono::{DateTime, Utc};
use raffle_shared::{TicketNumber, TicketRecord, TicketStatus};

use crate::StoreError;

/// Narrow read/write contract over the backing table of ticket rows.
///
/// Implementations give no isolation between concurrent callers unless they
/// advertise [`TicketStore::supports_conditional_append`].
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Full scan of every active record.
    async fn read_all(&self) -> Result<Vec<TicketRecord>, StoreError>;

    /// Append rows in input order. On error, any prefix of `records` may
    /// have been written.
    async fn append_batch(&self, records: &[TicketRecord]) -> Result<(), StoreError>;

    /// Overwrite the status of the active record for `number`.
    /// Returns `false` when no such record exists; never creates one.
    async fn update_status(
        &self,
        number: TicketNumber,
        status: TicketStatus,
    ) -> Result<bool, StoreError>;

    /// Remove the RESERVED record for `number` whose timestamp is exactly
    /// `held_since`. Returns `false` if the row changed or vanished meanwhile.
    async fn release(
        &self,
        number: TicketNumber,
        held_since: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Replace the whole table. Either every row is replaced or none is.
    async fn clear_and_rewrite(&self, records: Vec<TicketRecord>) -> Result<(), StoreError>;

    /// Whether [`TicketStore::append_if_vacant`] is available.
    fn supports_conditional_append(&self) -> bool {
        false
    }

    /// Atomically append `records` only if none of their numbers is occupied.
    /// Returns the occupied numbers; an empty result means the batch was written.
    async fn append_if_vacant(
        &self,
        _records: &[TicketRecord],
    ) -> Result<Vec<TicketNumber>, StoreError> {
        Err(StoreError::Unsupported("append_if_vacant"))
    }
}
