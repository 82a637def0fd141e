//! Domain layer for the message blockchain

pub mod block;
pub mod message;

pub use block::{verify_blocks, BlockHeader, BlockchainStats, MessageBlock};
pub use message::{
    verify_secure_message, BehavioralPatterns, BlockchainProof, DynamicData, LivenessProof,
    MessagePayload, MessageType, SecureMessage, ValidatorSignature, SYNTHETIC_VALIDATOR_COUNT,
};
