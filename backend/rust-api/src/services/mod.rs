use crate::config::Config;
use std::sync::{Mutex, MutexGuard};

use adaptive_service::AdaptiveProblemService;

/// Shared state for the single practice session this process serves.
///
/// Every handler works under the one engine lock, so reads spanning several
/// parts of the history always see a consistent snapshot.
pub struct AppState {
    pub config: Config,
    engine: Mutex<AdaptiveProblemService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let engine = AdaptiveProblemService::new(config.adaptive.clone());

        tracing::info!(
            "Adaptive engine initialized (window={}, min_feedback={}, max_difficulty={})",
            config.adaptive.recent_window,
            config.adaptive.min_feedback,
            config.adaptive.max_difficulty
        );

        Self {
            config,
            engine: Mutex::new(engine),
        }
    }

    pub fn engine(&self) -> anyhow::Result<MutexGuard<'_, AdaptiveProblemService>> {
        self.engine
            .lock()
            .map_err(|_| anyhow::anyhow!("Adaptive engine lock poisoned"))
    }

    /// Starts a fresh session. A poisoned lock is recovered by replacing the
    /// engine outright, so this always succeeds.
    pub fn reset_engine(&self) {
        let mut engine = match self.engine.lock() {
            Ok(engine) => engine,
            Err(poisoned) => {
                tracing::warn!("Recovering poisoned adaptive engine lock");
                self.engine.clear_poison();
                let mut engine = poisoned.into_inner();
                *engine = AdaptiveProblemService::new(self.config.adaptive.clone());
                engine
            }
        };
        engine.reset();
    }
}


pub mod adaptive_service;
pub mod difficulty;
pub mod performance_tracker;
pub mod problem_generator;
