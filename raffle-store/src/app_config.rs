use raffle_catalog::{Catalog, CatalogError, TicketPricing, TicketRange};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub raffle: RaffleRules,
    pub admin: AdminConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RaffleRules {
    pub ranges: Vec<TicketRange>,
    pub ticket_price: u32,
    #[serde(default = "default_expiry_hours")]
    pub reservation_expiry_hours: u64,
    #[serde(default = "default_min_tickets")]
    pub min_tickets: u32,
    #[serde(default = "default_max_tickets")]
    pub max_tickets: u32,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_expiry_hours() -> u64 { 48 }
fn default_min_tickets() -> u32 { 1 }
fn default_max_tickets() -> u32 { 20 }
fn default_sweep_interval() -> u64 { 300 }

impl RaffleRules {
    pub fn catalog(&self) -> Result<Catalog, CatalogError> {
        Catalog::new(self.ranges.clone())
    }

    pub fn pricing(&self) -> TicketPricing {
        TicketPricing::new(self.ticket_price)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    pub shared_secret: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Memory,
    ConditionalMemory,
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from("config", &run_mode)
    }

    /// Layered load: `{dir}/default`, then `{dir}/{run_mode}` and
    /// `{dir}/local` if present, then `RAFFLE__*` environment variables.
    pub fn load_from(dir: &str, run_mode: &str) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg.. `RAFFLE__ADMIN__SHARED_SECRET=s3cret`
            .add_source(config::Environment::with_prefix("RAFFLE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
