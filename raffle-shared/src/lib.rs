pub mod models;
pub mod pii;

pub use models::{TicketNumber, TicketRecord, TicketStatus, ParseStatusError};
pub use pii::Masked;
