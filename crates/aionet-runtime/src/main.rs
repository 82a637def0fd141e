//! # AIONET Node
//!
//! Demo driver for the AIONET security core.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging and metrics from the environment
//! 2. Load and validate `AionetConfig`
//! 3. Build the `SecurityManager` (own device registered as known)
//! 4. Score the interaction telemetry given as the first argument, if any
//! 5. Seal a transaction and a message, then seal them into a block
//! 6. Print the receipt and chain statistics
//!
//! ```text
//! aionet-node [interaction.json]
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use aio_06_message_chain::{MessageRequest, MessageType};
use aionet_runtime::{AionetConfig, SecurityManager};
use aionet_telemetry::TelemetryConfig;
use shared_types::InteractionData;

#[tokio::main]
async fn main() -> Result<()> {
    aionet_telemetry::init_telemetry(&TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = AionetConfig::from_env();
    config.validate().context("Invalid AIONET configuration")?;

    let interaction = match std::env::args().nth(1) {
        Some(path) => Some(load_interaction(Path::new(&path))?),
        None => None,
    };

    let manager = SecurityManager::new(config).context("Failed to build security manager")?;
    let device_id = manager.device_id().to_string();
    info!(device_id = %device_id, "AIONET node started");

    let score = manager.trust_score(&device_id, interaction.as_ref());
    println!(
        "Trust score:      {:.2} ({})",
        score.overall_score, score.risk_level
    );
    println!("Clone resistance: {:.2}", score.clone_resistance_score);

    let verdict = manager.detect_cloning_attempt(&device_id, interaction.as_ref());
    println!(
        "Clone verdict:    cloned={} confidence={:.1} risk={}",
        verdict.is_cloned, verdict.confidence, verdict.risk_level
    );
    if verdict.is_cloned {
        warn!(methods = ?verdict.detection_methods, "Refusing to seal on a suspected clone");
        return Ok(());
    }

    let tx = manager
        .seal_transaction(4.50, "Espresso", Some("nfc-terminal-01"))
        .await
        .context("Failed to seal transaction")?;

    let mut request = MessageRequest::new(
        "nfc-terminal-01",
        format!("paid {}", tx.id),
        MessageType::PaymentConfirmation,
    );
    if let Some(data) = interaction {
        request = request.with_interaction(data);
    }
    manager
        .seal_message(request)
        .await
        .context("Failed to seal message")?;
    manager
        .seal_block()
        .await
        .context("Failed to seal block")?;

    println!();
    println!("{}", manager.generate_secure_receipt(&tx));
    println!();

    let stats = manager.get_blockchain_stats();
    println!(
        "Blocks: {}  Messages: {}  Pending: {}  Known devices: {}",
        stats.total_blocks, stats.total_messages, stats.pending_messages, stats.known_devices
    );
    println!(
        "Chains verify: transactions={} messages={}",
        manager.verify_transaction_chain(),
        manager.verify_message_blockchain()
    );

    Ok(())
}

fn load_interaction(path: &Path) -> Result<InteractionData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read interaction data from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse interaction data in {}", path.display()))
}
