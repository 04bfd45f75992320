use chrono::Utc;
use raffle_core::{CoreResult, TicketStore};
use raffle_shared::models::events::StatusOverriddenEvent;
use raffle_shared::{TicketNumber, TicketStatus};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Widest `a-b` range accepted in one token
pub const MAX_RANGE_SPAN: u32 = 10_000;

/// Result of parsing one comma-separated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenParse {
    Single(TicketNumber),
    Range(TicketNumber, TicketNumber),
    Malformed(String),
}

impl TokenParse {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let malformed = || TokenParse::Malformed(token.to_string());

        match token.split_once('-') {
            Some((a, b)) => match (a.trim().parse::<u32>(), b.trim().parse::<u32>()) {
                (Ok(a), Ok(b)) if a <= b && b - a < MAX_RANGE_SPAN => {
                    TokenParse::Range(TicketNumber(a), TicketNumber(b))
                }
                _ => malformed(),
            },
            None => match token.parse::<u32>() {
                Ok(n) => TokenParse::Single(TicketNumber(n)),
                Err(_) => malformed(),
            },
        }
    }
}

/// Numbers requested by an operator, e.g. `"1577,1579,1600-1605"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NumberSpec {
    pub numbers: BTreeSet<TicketNumber>,
    /// Tokens that did not parse, in input order
    pub rejected: Vec<String>,
}

/// Parse a comma-separated list of numbers and inclusive ranges.
///
/// Malformed tokens are collected in `rejected` and otherwise ignored; empty
/// tokens are skipped silently. The result is not checked against the catalog.
pub fn parse_number_spec(text: &str) -> NumberSpec {
    let mut parsed = NumberSpec::default();

    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match TokenParse::parse(token) {
            TokenParse::Single(n) => {
                parsed.numbers.insert(n);
            }
            TokenParse::Range(a, b) => {
                parsed.numbers.extend((a.value()..=b.value()).map(TicketNumber));
            }
            TokenParse::Malformed(t) => parsed.rejected.push(t),
        }
    }

    parsed
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideOutcome {
    pub updated: usize,
    pub not_found: Vec<TicketNumber>,
}

/// Privileged, direct status changes on persisted rows.
///
/// Bypasses selection and commit entirely; the operator is authoritative.
pub struct OverrideEngine {
    store: Arc<dyn TicketStore>,
}

impl OverrideEngine {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Set `status` on the active record of every number in `numbers`.
    /// Numbers without a record are reported back, never created.
    pub async fn apply_state_transition(
        &self,
        numbers: &BTreeSet<TicketNumber>,
        status: TicketStatus,
    ) -> CoreResult<OverrideOutcome> {
        let mut outcome = OverrideOutcome::default();

        for &number in numbers {
            if self.store.update_status(number, status).await? {
                outcome.updated += 1;
            } else {
                outcome.not_found.push(number);
            }
        }

        if !outcome.not_found.is_empty() {
            warn!(not_found = ?outcome.not_found, "Override skipped numbers with no record");
        }
        let event = StatusOverriddenEvent {
            numbers: numbers.iter().copied().collect(),
            new_status: status,
            not_found: outcome.not_found.clone(),
            timestamp: Utc::now(),
        };
        info!(event = ?event, "Set {} tickets to {}", outcome.updated, status);

        Ok(outcome)
    }
}

/// Single shared-secret check guarding the admin surface
#[derive(Clone)]
pub struct AdminGate {
    secret: String,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// An empty configured secret locks the admin surface
    pub fn verify(&self, candidate: &str) -> bool {
        !self.secret.is_empty() && candidate == self.secret
    }
}
