use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raffle ticket number, e.g. `1561`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketNumber(pub u32);

impl TicketNumber {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for TicketNumber {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted state of an occupied ticket.
///
/// Written as `RESERVED`/`PAID`; read back in any letter case.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum TicketStatus {
    Reserved,
    Paid,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Reserved => "RESERVED",
            TicketStatus::Paid => "PAID",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown ticket status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for TicketStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RESERVED" => Ok(TicketStatus::Reserved),
            "PAID" => Ok(TicketStatus::Paid),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl TryFrom<String> for TicketStatus {
    type Error = ParseStatusError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// One persisted row: who holds which number, in what state, since when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketRecord {
    pub owner: String,
    pub number: TicketNumber,
    pub status: TicketStatus,
    pub timestamp: DateTime<Utc>,
}

impl TicketRecord {
    /// Create a fresh reservation row
    pub fn reserved(owner: impl Into<String>, number: TicketNumber, timestamp: DateTime<Utc>) -> Self {
        Self {
            owner: owner.into(),
            number,
            status: TicketStatus::Reserved,
            timestamp,
        }
    }

    /// A reservation older than `threshold` at `now`. Paid rows never expire,
    /// and neither does anything when `now - threshold` is out of range.
    pub fn is_expired(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        if self.status != TicketStatus::Reserved {
            return false;
        }
        match now.checked_sub_signed(threshold) {
            Some(cutoff) => self.timestamp < cutoff,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&TicketStatus::Paid).unwrap(), "\"PAID\"");
        let parsed: TicketStatus = serde_json::from_str("\"RESERVED\"").unwrap();
        assert_eq!(parsed, TicketStatus::Reserved);
        let parsed: TicketStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(parsed, TicketStatus::Paid);
        assert!(serde_json::from_str::<TicketStatus>("\"SOLD\"").is_err());
    }

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!("paid".parse::<TicketStatus>().unwrap(), TicketStatus::Paid);
        assert_eq!(" Reserved ".parse::<TicketStatus>().unwrap(), TicketStatus::Reserved);
        assert!("SOLD".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_expiry_only_applies_to_reservations() {
        let now = Utc::now();
        let old = now - Duration::hours(49);

        let mut record = TicketRecord::reserved("Ana", TicketNumber(121), old);
        assert!(record.is_expired(now, Duration::hours(48)));
        assert!(!record.is_expired(now, Duration::hours(72)));

        record.status = TicketStatus::Paid;
        assert!(!record.is_expired(now, Duration::hours(48)));
    }

    #[test]
    fn test_out_of_range_threshold_never_expires() {
        let record = TicketRecord::reserved("Ana", TicketNumber(121), DateTime::<Utc>::MIN_UTC);
        assert!(!record.is_expired(Utc::now(), Duration::MAX));
    }

    #[test]
    fn test_record_wire_shape() {
        let record = TicketRecord::reserved("Ana", TicketNumber(1561), Utc::now());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["number"], 1561);
        assert_eq!(value["status"], "RESERVED");
        assert_eq!(value["owner"], "Ana");
    }
}
