use std::sync::Arc;
use anyhow::Context;
use raffle_catalog::{Catalog, TicketPricing};
use raffle_core::{Clock, TicketStore};
use raffle_reservation::{AdminGate, ExpirySweeper, OverrideEngine, ReservationCommitter, SelectionLimits};
use raffle_store::app_config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TicketStore>,
    pub catalog: Arc<Catalog>,
    pub pricing: TicketPricing,
    pub limits: SelectionLimits,
    pub expiry_hours: u64,
    pub clock: Arc<dyn Clock>,
    pub admin: AdminGate,
}

impl AppState {
    /// Rejects bad ticket ranges and ticket limits outside `1..=20`.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn TicketStore>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let rules = &config.raffle;
        let catalog = rules.catalog().context("Invalid ticket ranges")?;
        let limits = SelectionLimits::new(rules.min_tickets, rules.max_tickets).context("Invalid ticket limits")?;

        Ok(Self {
            store,
            catalog: Arc::new(catalog),
            pricing: rules.pricing(),
            limits,
            expiry_hours: rules.reservation_expiry_hours,
            clock,
            admin: AdminGate::new(config.admin.shared_secret.clone()),
        })
    }

    pub fn committer(&self) -> ReservationCommitter {
        ReservationCommitter::new(self.store.clone(), self.clock.clone())
    }

    pub fn sweeper(&self) -> ExpirySweeper {
        ExpirySweeper::new(self.store.clone(), self.expiry_hours)
    }

    pub fn override_engine(&self) -> OverrideEngine {
        OverrideEngine::new(self.store.clone())
    }
}
