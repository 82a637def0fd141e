//! Transaction ledger service.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use aio_01_identity::DeviceIdentity;
use parking_lot::RwLock;
use shared_crypto::{CryptoError, ProofOfWork};
use shared_types::{DeviceId, HashHex, TimeSource};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{verify_transaction, SecureTransaction, TransactionChain, TransactionPayload};
use crate::error::{LedgerError, Result};

/// Proof-of-work difficulty for transactions.
pub const TRANSACTION_DIFFICULTY: usize = 2;

/// Seals transactions for the local device and keeps its chain.
pub struct TransactionLedger {
    identity: Arc<DeviceIdentity>,
    pow: ProofOfWork,
    chain: RwLock<TransactionChain>,
    time: Arc<dyn TimeSource>,
}

impl TransactionLedger {
    pub fn new(identity: Arc<DeviceIdentity>, pow: ProofOfWork, time: Arc<dyn TimeSource>) -> Self {
        info!(
            device_id = identity.device_id(),
            difficulty = pow.difficulty(),
            "Transaction ledger initialized"
        );
        Self {
            identity,
            chain: RwLock::new(TransactionChain::new(pow.difficulty())),
            pow,
            time,
        }
    }

    pub fn difficulty(&self) -> usize {
        self.pow.difficulty()
    }

    /// Hash, sign and seal a transaction. Does not touch the chain.
    pub fn create_secure_transaction(
        &self,
        amount: f64,
        item_name: &str,
        recipient_device_id: Option<&str>,
        previous_hash: Option<&str>,
    ) -> Result<SecureTransaction> {
        self.create_secure_transaction_with_cancel(
            amount,
            item_name,
            recipient_device_id,
            previous_hash,
            None,
        )
    }

    /// As [`Self::create_secure_transaction`], abandoning the nonce search
    /// once `cancel` is raised.
    pub fn create_secure_transaction_with_cancel(
        &self,
        amount: f64,
        item_name: &str,
        recipient_device_id: Option<&str>,
        previous_hash: Option<&str>,
        cancel: Option<&AtomicBool>,
    ) -> Result<SecureTransaction> {
        if !amount.is_finite() {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let id = Uuid::new_v4().to_string();
        let timestamp = self.time.now();
        let payload = TransactionPayload {
            id: &id,
            amount,
            item_name,
            timestamp,
            device_id: self.identity.device_id(),
            public_key: self.identity.public_key(),
            previous_hash,
            recipient_device_id,
        };
        let hash = payload.hash()?;
        let signature = self.identity.keys().sign(&hash)?;
        let seal = self.pow.seal_with_cancel(&hash, cancel)?;

        debug!(
            tx_id = %id,
            nonce = seal.nonce,
            iterations = seal.iterations,
            "Transaction sealed"
        );

        Ok(SecureTransaction {
            id,
            amount,
            item_name: item_name.to_string(),
            timestamp,
            device_id: self.identity.device_id().to_string(),
            public_key: self.identity.public_key().to_string(),
            signature,
            hash,
            previous_hash: previous_hash.map(str::to_string),
            nonce: seal.nonce,
            recipient_device_id: recipient_device_id.map(DeviceId::from),
        })
    }

    /// Check a transaction from `sender_public_key` at this ledger's difficulty.
    pub fn verify_transaction(&self, tx: &SecureTransaction, sender_public_key: &str) -> bool {
        verify_transaction(tx, sender_public_key, self.pow.difficulty())
    }

    /// Seal a transaction against the current tail and append it.
    ///
    /// The chain stays write-locked for the whole seal so the tail cannot move
    /// underneath the search. A seal that completes after `cancel` was raised
    /// is discarded and reported as cancelled.
    pub fn create_and_append(
        &self,
        amount: f64,
        item_name: &str,
        recipient_device_id: Option<&str>,
        cancel: Option<&AtomicBool>,
    ) -> Result<SecureTransaction> {
        let mut chain = self.chain.write();
        let tail = chain.tail_hash().map(str::to_string);
        let tx = self.create_secure_transaction_with_cancel(
            amount,
            item_name,
            recipient_device_id,
            tail.as_deref(),
            cancel,
        )?;
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            debug!(tx_id = %tx.id, "Transaction sealed after cancellation, discarded");
            return Err(CryptoError::ProofOfWorkCancelled {
                iterations: tx.nonce + 1,
            }
            .into());
        }
        chain.append_linked(tx.clone())?;
        Ok(tx)
    }

    /// Append an externally sealed transaction, relinking it to the tail.
    pub fn add_transaction(&self, tx: SecureTransaction) -> SecureTransaction {
        self.chain.write().add_transaction(tx).clone()
    }

    pub fn verify_chain(&self) -> bool {
        self.chain.read().verify_chain()
    }

    pub fn tail_hash(&self) -> Option<HashHex> {
        self.chain.read().tail_hash().map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.chain.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.read().is_empty()
    }

    /// Copy of the chain as it stands.
    pub fn snapshot(&self) -> TransactionChain {
        self.chain.read().clone()
    }
}
