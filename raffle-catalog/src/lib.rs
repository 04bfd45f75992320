pub mod catalog;
pub mod pricing;

pub use catalog::{Catalog, CatalogError, TicketRange};
pub use pricing::TicketPricing;
