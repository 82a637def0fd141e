//! Hash-linked transaction chain.

use shared_crypto::verify_signature;
use shared_types::HashHex;

use super::SecureTransaction;
use crate::error::{LedgerError, Result};

/// Ordered transactions where each links to its predecessor's hash.
#[derive(Debug, Clone, Default)]
pub struct TransactionChain {
    transactions: Vec<SecureTransaction>,
    difficulty: usize,
}

impl TransactionChain {
    pub fn new(difficulty: usize) -> Self {
        Self {
            transactions: Vec::new(),
            difficulty,
        }
    }

    /// Restore a chain as stored, without relinking. Run
    /// [`Self::verify_chain`] before trusting it.
    pub fn from_transactions(difficulty: usize, transactions: Vec<SecureTransaction>) -> Self {
        Self {
            transactions,
            difficulty,
        }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Hash of the last transaction, if any.
    pub fn tail_hash(&self) -> Option<&str> {
        self.transactions.last().map(|tx| tx.hash.as_str())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SecureTransaction> {
        self.transactions.iter()
    }

    pub fn get(&self, index: usize) -> Option<&SecureTransaction> {
        self.transactions.get(index)
    }

    /// Link `tx` to the current tail and append it.
    ///
    /// Any predecessor the transaction already names is replaced by the tail
    /// hash. The first transaction keeps whatever predecessor it carries.
    pub fn add_transaction(&mut self, mut tx: SecureTransaction) -> &SecureTransaction {
        if let Some(tail) = self.tail_hash() {
            if tx.previous_hash.as_deref() != Some(tail) {
                tracing::debug!(
                    tx_id = %tx.id,
                    from = ?tx.previous_hash,
                    to = %tail,
                    "Relinking transaction to chain tail"
                );
                tx.previous_hash = Some(tail.to_string());
            }
        }
        self.push(tx)
    }

    /// Append `tx` only if it already names the current tail.
    pub fn append_linked(&mut self, tx: SecureTransaction) -> Result<&SecureTransaction> {
        let tail = self.tail_hash();
        if tx.previous_hash.as_deref() != tail {
            return Err(LedgerError::LinkageMismatch {
                expected: tail.map(str::to_string),
                found: tx.previous_hash,
            });
        }
        Ok(self.push(tx))
    }

    fn push(&mut self, tx: SecureTransaction) -> &SecureTransaction {
        tracing::debug!(tx_id = %tx.id, height = self.transactions.len(), "Transaction appended");
        self.transactions.push(tx);
        &self.transactions[self.transactions.len() - 1]
    }

    /// Linkage across the chain plus per-transaction completeness, payload
    /// hash, signature and proof-of-work.
    pub fn verify_chain(&self) -> bool {
        let mut previous: Option<&HashHex> = None;
        for (index, tx) in self.transactions.iter().enumerate() {
            if let Some(prev) = previous {
                if tx.previous_hash.as_ref() != Some(prev) {
                    tracing::warn!(index, tx_id = %tx.id, "Chain linkage broken");
                    return false;
                }
            }
            if !tx.is_structurally_complete()
                || !tx.is_payload_intact()
                || !verify_signature(&tx.hash, &tx.signature, &tx.public_key)
                || !tx.meets_pow(self.difficulty)
            {
                tracing::warn!(index, tx_id = %tx.id, "Chain transaction invalid");
                return false;
            }
            previous = Some(&tx.hash);
        }
        true
    }
}

impl<'a> IntoIterator for &'a TransactionChain {
    type Item = &'a SecureTransaction;
    type IntoIter = std::slice::Iter<'a, SecureTransaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}
