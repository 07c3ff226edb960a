use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use uuid::Uuid;

use super::client::Ledger;
use super::error::LedgerError;
use super::types::{LedgerAction, LedgerSnapshot, Receipt};
use crate::config::ledger::{MAX_ATTEMPTS, RETRY_DELAY_MS};

/// Retries transient submission failures with a fixed delay between attempts.
pub struct RetryingLedger<L> {
    inner: L,
    max_attempts: u32,
    delay: Duration,
}

impl<L: Ledger> RetryingLedger<L> {
    pub fn new(inner: L) -> Self {
        Self::with_policy(inner, MAX_ATTEMPTS, Duration::from_millis(RETRY_DELAY_MS))
    }

    pub fn with_policy(inner: L, max_attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

#[async_trait]
impl<L: Ledger> Ledger for RetryingLedger<L> {
    async fn submit_action(&self, game_id: Uuid, action: LedgerAction) -> Result<Receipt, LedgerError> {
        let mut attempt = 1;
        loop {
            match self.inner.submit_action(game_id, action.clone()).await {
                Ok(receipt) => return Ok(receipt),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        "[Ledger] Attempt {} of {} failed for {}: {}, retrying in {:?}",
                        attempt,
                        self.max_attempts,
                        action.kind(),
                        e,
                        self.delay
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_game_state(&self, game_id: Uuid) -> Result<LedgerSnapshot, LedgerError> {
        self.inner.get_game_state(game_id).await
    }
}
