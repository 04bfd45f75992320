use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ticket::{TicketNumber, TicketStatus};

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct TicketsReservedEvent {
    pub session_id: Uuid,
    pub numbers: Vec<TicketNumber>,
    pub reserved_at: DateTime<Utc>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationsExpiredEvent {
    pub numbers: Vec<TicketNumber>,
    pub swept_at: DateTime<Utc>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct StatusOverriddenEvent {
    pub numbers: Vec<TicketNumber>,
    pub new_status: TicketStatus,
    pub not_found: Vec<TicketNumber>,
    pub timestamp: DateTime<Utc>,
}
