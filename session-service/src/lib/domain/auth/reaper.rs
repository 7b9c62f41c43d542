//! Periodic removal of expired sessions.
//!
//! Authorization already ignores expired sessions, so reaping only bounds the
//! size of the `sessions` collection.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::models::fields;
use crate::domain::store::errors::StoreError;
use crate::domain::store::models::Collection;
use crate::domain::store::models::Filter;
use crate::domain::store::ports::DocumentStore;

/// Deletes sessions whose `expires_at` has passed.
pub struct SessionReaper<DS>
where
    DS: DocumentStore,
{
    store: Arc<DS>,
}

impl<DS> SessionReaper<DS>
where
    DS: DocumentStore,
{
    pub fn new(store: Arc<DS>) -> Self {
        Self { store }
    }

    /// Run one reaping pass.
    ///
    /// # Returns
    /// Number of sessions deleted
    pub async fn run_once(&self) -> Result<u64, StoreError> {
        let filter = Filter::new().lt(fields::EXPIRES_AT, Utc::now());
        self.store.delete_many(Collection::Sessions, &filter).await
    }

    /// Reap every `interval` on a background task until `cancel` fires.
    pub fn spawn(self, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("Session reaper stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match self.run_once().await {
                            Ok(0) => {}
                            Ok(count) => tracing::info!(count, "Reaped expired sessions"),
                            Err(e) => tracing::error!(error = %e, "Session reaping failed"),
                        }
                    }
                }
            }
        })
    }
}
