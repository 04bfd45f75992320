pub mod occupancy;
pub mod session;
pub mod committer;
pub mod expiry;
pub mod admin;
pub mod summary;

pub use occupancy::{Availability, OccupancySnapshot};
pub use session::{SelectionLimits, SelectionSession, ToggleOutcome, MAX_TICKETS_PER_PARTICIPANT};
pub use committer::ReservationCommitter;
pub use expiry::ExpirySweeper;
pub use admin::{parse_number_spec, AdminGate, NumberSpec, OverrideEngine, OverrideOutcome, TokenParse};
pub use summary::SalesSummary;
