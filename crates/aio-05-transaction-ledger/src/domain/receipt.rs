//! Plain-text transaction receipt.

use chrono::{DateTime, SecondsFormat, Utc};

use super::SecureTransaction;

/// Protocol tag printed on every receipt.
pub const PROTOCOL_TAG: &str = "AIONET v1.2";

/// Render a receipt for display or sharing.
pub fn render_receipt(tx: &SecureTransaction) -> String {
    let issued = DateTime::<Utc>::from_timestamp_millis(tx.timestamp as i64)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| tx.timestamp.to_string());

    let mut lines = vec![
        "AIONET SECURE RECEIPT".to_string(),
        format!("Transaction: {}", tx.id),
        format!("Item: {}", tx.item_name),
        format!("Amount: {:.2}", tx.amount),
        format!("Date: {issued}"),
        format!("From: {}", tx.device_id),
    ];
    if let Some(recipient) = &tx.recipient_device_id {
        lines.push(format!("To: {recipient}"));
    }
    lines.push(format!("Hash: {}", tx.hash));
    if let Some(previous) = &tx.previous_hash {
        lines.push(format!("Previous: {previous}"));
    }
    lines.push(format!("Signature: {}", tx.signature));
    lines.push(format!("Nonce: {}", tx.nonce));
    lines.push(format!("Protocol: {PROTOCOL_TAG}"));
    lines.join("\n")
}
