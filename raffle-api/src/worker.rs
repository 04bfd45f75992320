use std::sync::Arc;
use std::time::Duration;
use raffle_core::Clock;
use raffle_reservation::ExpirySweeper;
use tracing::{error, info};

/// Periodically return expired reservations to the pool
pub async fn start_expiry_worker(sweeper: ExpirySweeper, clock: Arc<dyn Clock>, every: Duration) {
    info!(
        "Expiry worker started: sweeping every {:?}, threshold {}h",
        every,
        sweeper.threshold().num_hours()
    );

    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match sweeper.sweep(clock.now()).await {
            Ok(0) => {}
            Ok(released) => info!("Expiry worker released {} reservations", released),
            Err(e) => error!("Expiry sweep failed: {}", e),
        }
    }
}
