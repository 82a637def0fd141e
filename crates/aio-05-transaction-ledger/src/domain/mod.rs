//! Domain layer for the transaction ledger

pub mod chain;
pub mod entities;
pub mod receipt;

pub use chain::TransactionChain;
pub use entities::{verify_transaction, SecureTransaction, TransactionPayload};
pub use receipt::render_receipt;
