use std::sync::Arc;

use tokio::{
    task::JoinHandle,
    time::{interval, Instant},
};

use crate::infrastructure::shutdown::ShutdownListener;

use super::AdmissionController;

pub fn spawn_sweeper(
    controller: Arc<AdmissionController>,
    mut shutdown: ShutdownListener,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(controller.window());
        // first tick completes immediately
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.notified() => break,
            }
            let evicted = controller.sweep(Instant::now().into_std());
            if evicted > 0 {
                tracing::debug!(
                    target: "admission",
                    evicted,
                    tracked = controller.tracked_clients(),
                    "expired admission windows evicted"
                );
            }
        }
        tracing::info!(target: "admission", "admission sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{config::AdmissionConfig, infrastructure::shutdown::Shutdown};

    #[tokio::test(start_paused = true)]
    async fn sweeper_evicts_and_stops_on_shutdown() {
        let controller = Arc::new(AdmissionController::new(&AdmissionConfig {
            window: Duration::from_millis(100),
            max_requests: 1,
        }));
        controller.admit("10.1.1.1", Instant::now().into_std());
        assert_eq!(controller.tracked_clients(), 1);

        let shutdown = Shutdown::new();
        let handle = spawn_sweeper(controller.clone(), shutdown.subscribe());

        tokio::time::sleep(Duration::from_millis(350)).await;
        shutdown.trigger();
        handle.await.unwrap();
        assert_eq!(controller.tracked_clients(), 0);
    }
}
