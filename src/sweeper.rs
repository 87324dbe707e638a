//! Idle-room expiry sweeper
//!
//! A periodic background task that asks the registry to reap rooms with
//! no connections whose last activity is older than the retention
//! threshold. Runs for the lifetime of the process and stops when the
//! shutdown signal fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::info;

use crate::registry::RoomRegistry;

/// How often the sweep runs
pub const SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// How long an empty room survives before it is reaped
pub const RETENTION: Duration = Duration::from_secs(3600);

/// Run the sweep loop until `shutdown` fires
///
/// Each tick performs one full registry sweep; a tick in progress is not
/// cancelable, so shutdown takes effect at the next loop iteration.
pub async fn run(
    registry: Arc<RoomRegistry>,
    period: Duration,
    retention: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let start = time::Instant::now() + period;
    let mut ticker = time::interval_at(start, period);

    info!("Expiry sweeper started (period {:?}, retention {:?})", period, retention);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                registry.sweep(retention).await;
            }
            _ = shutdown.changed() => break,
        }
    }
    info!("Expiry sweeper stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweeper_reaps_stale_rooms() {
        let registry = Arc::new(RoomRegistry::new());
        let code = registry.create().await;

        let (_tx, rx) = watch::channel(false);
        tokio::spawn(run(
            registry.clone(),
            Duration::from_millis(20),
            Duration::from_millis(1),
            rx,
        ));

        time::sleep(Duration::from_millis(100)).await;
        assert!(!registry.exists(&code).await);
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_shutdown() {
        let registry = Arc::new(RoomRegistry::new());

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run(
            registry,
            Duration::from_secs(60),
            RETENTION,
            rx,
        ));

        tx.send(true).unwrap();
        time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper did not stop on shutdown")
            .unwrap();
    }
}
