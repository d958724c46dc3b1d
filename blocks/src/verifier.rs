//! Block verification. Every failing check is reported, in a fixed order.

use crate::serializer::serialize_header;
use crate::{BlockData, BlockVerification, Clock};
use dpos_config::ConfigManager;
use dpos_crypto::{sha256, verify_ecdsa};
use dpos_transactions::Transaction;
use dpos_types::BigNumber;
use std::collections::HashSet;

pub fn verify(
    data: &BlockData,
    transactions: &[Transaction],
    config: &ConfigManager,
    clock: &dyn Clock,
) -> BlockVerification {
    let milestone = config.milestone(data.height);
    let mut errors = Vec::new();

    if data.height != 1 && data.previous_block.is_none() {
        errors.push("Invalid previous block".to_string());
    }

    if data.reward != milestone.reward {
        errors.push(format!(
            "Invalid block reward: {} expected: {}",
            data.reward, milestone.reward
        ));
    }

    if !verify_signature(data, config) {
        errors.push("Failed to verify block signature".to_string());
    }

    if data.version != milestone.block.version {
        errors.push("Invalid block version".to_string());
    }

    let now = clock.now();
    if config.slot_number(data.timestamp, data.height) > config.slot_number(now, data.height) {
        errors.push("Invalid block timestamp".to_string());
    }

    // Participant-signed transactions are checked later, against their wallets.
    let contains_multi_signatures = transactions.iter().any(|tx| tx.has_multi_signatures());
    let unverified: Vec<_> = transactions
        .iter()
        .filter(|tx| !tx.is_verified && !(tx.has_multi_signatures() && tx.data.signature.is_none()))
        .collect();
    if !unverified.is_empty() {
        errors.push("One or more transactions are not verified:".to_string());
        errors.extend(unverified.iter().map(|tx| format!("=> {}", tx.to_hex())));
    }

    if transactions.len() != data.number_of_transactions as usize {
        errors.push("Invalid number of transactions".to_string());
    }

    if transactions.len() > milestone.block.max_transactions && data.height > 1 {
        errors.push("Transactions length is too high".to_string());
    }

    let mut seen = HashSet::with_capacity(transactions.len());
    let mut total_amount = BigNumber::zero();
    let mut total_fee = BigNumber::zero();
    let mut payload = Vec::with_capacity(transactions.len() * 32);
    for tx in transactions {
        if !seen.insert(tx.id) {
            errors.push(format!("Encountered duplicate transaction: {}", tx.id));
        }
        total_amount += &tx.data.amount;
        total_fee += &tx.data.fee;
        payload.extend_from_slice(tx.id.as_bytes());
    }

    if total_amount != data.total_amount {
        errors.push("Invalid total amount".to_string());
    }

    if total_fee != data.total_fee {
        errors.push("Invalid total fee".to_string());
    }

    if payload.len() > milestone.block.max_payload {
        errors.push("Payload is too large".to_string());
    }

    if sha256(&payload) != *data.payload_hash.as_bytes() {
        errors.push("Invalid payload hash".to_string());
    }

    BlockVerification {
        verified: errors.is_empty(),
        errors,
        contains_multi_signatures,
    }
}

/// The generator's ECDSA signature over the unsigned header.
pub fn verify_signature(data: &BlockData, config: &ConfigManager) -> bool {
    let Some(signature) = &data.block_signature else {
        return false;
    };
    let Ok(header) = serialize_header(data, config, false) else {
        return false;
    };
    verify_ecdsa(&sha256(&header), signature.as_bytes(), &data.generator_public_key)
}
