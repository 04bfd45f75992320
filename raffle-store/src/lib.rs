pub mod app_config;
pub mod memory;
pub mod file;

pub use memory::InMemoryTicketStore;
pub use file::FlatFileTicketStore;

use std::sync::Arc;
use raffle_core::{StoreError, TicketStore};
use app_config::{StoreConfig, StoreKind};

/// Build the store adapter selected in configuration
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn TicketStore>, StoreError> {
    match config.kind {
        StoreKind::Memory => Ok(Arc::new(InMemoryTicketStore::new())),
        StoreKind::ConditionalMemory => Ok(Arc::new(InMemoryTicketStore::conditional())),
        StoreKind::File => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| StoreError::Unavailable("store.path is required for the file store".into()))?;
            Ok(Arc::new(FlatFileTicketStore::new(path)))
        }
    }
}
