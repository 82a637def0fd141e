//! # Bounded Async Sealing
//!
//! Proof-of-work searches are CPU loops with no suspension point. These
//! wrappers move them onto tokio's blocking pool and bound them by the
//! configured `pow_timeout`. On timeout the search's cancel flag is raised
//! and the blocking job is awaited until it stops at its next poll. A job
//! that observes the flag commits nothing, and the caller gets
//! `RuntimeError::ProofOfWorkTimeout`. A job that committed before the flag
//! was raised still returns its artifact.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use aio_05_transaction_ledger::SecureTransaction;
use aio_06_message_chain::{MessageBlock, MessageRequest, SecureMessage};
use aionet_telemetry::{record_pow_timeout, record_seal, HistogramTimer, SEAL_DURATION};

use crate::container::{AionetConfig, SecurityManager};
use crate::error::{Result, RuntimeError};

impl SecurityManager {
    /// Seal a transaction against the ledger tail off the async executor.
    pub async fn seal_transaction(
        &self,
        amount: f64,
        item_name: &str,
        recipient_device_id: Option<&str>,
    ) -> Result<SecureTransaction> {
        let ledger = Arc::clone(&self.ledger);
        let item_name = item_name.to_string();
        let recipient = recipient_device_id.map(str::to_string);

        let tx = self
            .run_bounded("transaction", self.config.transaction_difficulty, move |cancel| {
                Ok(ledger.create_and_append(amount, &item_name, recipient.as_deref(), Some(cancel))?)
            })
            .await?;
        record_seal("transaction", tx.nonce + 1);
        Ok(tx)
    }

    /// Seal a message and queue it, off the async executor.
    pub async fn seal_message(&self, request: MessageRequest) -> Result<SecureMessage> {
        let messages = Arc::clone(&self.messages);

        let msg = self
            .run_bounded("message", self.config.message_difficulty, move |cancel| {
                Ok(messages.seal_message(&request, Some(cancel))?)
            })
            .await?;
        record_seal("message", msg.nonce + 1);
        Ok(msg)
    }

    /// Seal the pending queue into a block, off the async executor.
    ///
    /// On timeout the queue is left intact for a later attempt.
    pub async fn seal_block(&self) -> Result<Option<MessageBlock>> {
        let messages = Arc::clone(&self.messages);

        let block = self
            .run_bounded("block", self.config.block_difficulty, move |cancel| {
                Ok(messages.seal_block(Some(cancel))?)
            })
            .await?;
        if let Some(block) = &block {
            record_seal("block", block.nonce + 1);
        }
        Ok(block)
    }

    async fn run_bounded<T, F>(&self, kind: &'static str, difficulty: usize, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&AtomicBool) -> Result<T> + Send + 'static,
    {
        let _timer = HistogramTimer::new(&SEAL_DURATION.with_label_values(&[kind]));
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let mut handle = tokio::task::spawn_blocking(move || job(&*flag));

        let result = match tokio::time::timeout(self.config.pow_timeout, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                cancel.store(true, Ordering::Relaxed);
                match handle.await {
                    Ok(Ok(artifact)) => {
                        debug!(kind, "Seal committed at the deadline, keeping it");
                        Ok(Ok(artifact))
                    }
                    Ok(Err(e)) if e.is_pow_timeout() => {
                        record_pow_timeout(kind);
                        warn!(
                            kind,
                            difficulty,
                            timeout_ms = AionetConfig::millis(self.config.pow_timeout),
                            "Proof-of-work search timed out"
                        );
                        return Err(RuntimeError::ProofOfWorkTimeout {
                            kind,
                            difficulty,
                            timeout: self.config.pow_timeout,
                        });
                    }
                    other => other,
                }
            }
        };

        match result {
            Ok(Ok(artifact)) => Ok(artifact),
            Ok(Err(e)) => {
                if e.is_pow_timeout() {
                    record_pow_timeout(kind);
                }
                Err(e)
            }
            Err(join) => Err(RuntimeError::TaskFailed(join.to_string())),
        }
    }
}
