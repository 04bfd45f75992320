pub mod ticket;
pub mod events;

pub use ticket::{TicketNumber, TicketRecord, TicketStatus, ParseStatusError};
