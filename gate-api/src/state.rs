use gate_core::{BoardingChange, BoardingScheduler};
use gate_store::{app_config::CorsConfig, BoardingNotifier};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<BoardingScheduler>,
    pub notifier: BoardingNotifier,
    pub cors: CorsConfig,
}

impl AppState {
    pub fn new(scheduler: Arc<BoardingScheduler>, notifier: BoardingNotifier, cors: CorsConfig) -> Self {
        Self {
            scheduler,
            notifier,
            cors,
        }
    }

    /// Push the state following `change` to observers.
    pub async fn broadcast(&self, change: &BoardingChange) {
        self.notifier.publish(&self.scheduler, change).await;
    }
}
