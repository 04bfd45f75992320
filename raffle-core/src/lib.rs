pub mod clock;
pub mod repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use repository::TicketStore;

use raffle_shared::TicketNumber;

/// Failure reported by a ticket store adapter
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached at all; nothing was written.
    #[error("Ticket store unavailable: {0}")]
    Unavailable(String),
    /// A write failed and its extent is unknown.
    #[error("Ticket store write failed: {0}")]
    Write(String),
    #[error("Operation not supported by this store: {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot lower requested count to {requested}: {chosen} numbers already chosen")]
    InvalidTransition {
        requested: u32,
        chosen: usize,
    },

    #[error("Numbers no longer available: {}", format_numbers(.0))]
    NumberUnavailable(Vec<TicketNumber>),

    #[error("Already chose {requested} numbers")]
    CapacityReached {
        requested: u32,
    },

    #[error("Ticket store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Ticket store error: {0}")]
    StoreError(String),
}

impl CoreError {
    /// Recoverable errors leave every piece of state untouched and can be
    /// shown to the participant as-is.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidInput(_)
                | CoreError::InvalidTransition { .. }
                | CoreError::NumberUnavailable(_)
                | CoreError::CapacityReached { .. }
        )
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => CoreError::StoreUnavailable(msg),
            other => CoreError::StoreError(other.to_string()),
        }
    }
}

fn format_numbers(numbers: &[TicketNumber]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err: CoreError = StoreError::Unavailable("timeout".into()).into();
        assert_eq!(err, CoreError::StoreUnavailable("timeout".into()));

        let err: CoreError = StoreError::Write("disk full".into()).into();
        assert!(matches!(err, CoreError::StoreError(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unavailable_message_lists_numbers() {
        let err = CoreError::NumberUnavailable(vec![TicketNumber(121), TicketNumber(1561)]);
        assert_eq!(err.to_string(), "Numbers no longer available: 121, 1561");
        assert!(err.is_recoverable());
    }
}
