//! Historical patch tables.
//!
//! Where each table is consulted:
//! - `blocks` / `transactions`: the exception bypass of block and transaction checks
//! - `outlookTable`: legacy block id correction after id computation
//! - `transactionIdFixTable`: recipient inclusion in the legacy id bytes
//! - `negativeBalances`: the balance check of the generic wallet checks, and
//!   the exact-match consistency check after a state rebuild

use dpos_types::{BigNumber, BlockId, PublicKey, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exceptions {
    #[serde(default)]
    pub blocks: HashSet<BlockId>,

    #[serde(default)]
    pub transactions: HashSet<TransactionId>,

    /// Raw legacy block id → canonical block id.
    #[serde(default)]
    pub outlook_table: HashMap<String, String>,

    /// Computed id → id the network accepted; only the values are consulted.
    #[serde(default)]
    pub transaction_id_fix_table: HashMap<String, String>,

    /// Sender public key → (sender nonce before apply → balance allowed after apply).
    #[serde(default)]
    pub negative_balances: HashMap<PublicKey, HashMap<String, BigNumber>>,
}

impl Exceptions {
    pub fn is_block_exception(&self, id: &BlockId) -> bool {
        self.blocks.contains(id)
    }

    pub fn is_transaction_exception(&self, id: &TransactionId) -> bool {
        self.transactions.contains(id)
    }

    /// Canonical id for a raw legacy id, only on an exact table match.
    pub fn outlook_replacement(&self, raw_id: &str) -> Option<&str> {
        self.outlook_table.get(raw_id).map(String::as_str)
    }

    pub fn is_id_fixed_transaction(&self, id: &TransactionId) -> bool {
        let id = id.to_string();
        self.transaction_id_fix_table.values().any(|v| *v == id)
    }

    pub fn allowed_negative_balance(
        &self,
        sender: &PublicKey,
        nonce: &BigNumber,
    ) -> Option<&BigNumber> {
        self.negative_balances
            .get(sender)
            .and_then(|by_nonce| by_nonce.get(&nonce.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "blocks": ["13114381566690093367"],
        "transactions": ["608c7aeba0895da4517496590896eb325a0b5d367e1b186b1c07d7651a568b9e"],
        "outlookTable": { "8225244493039935740": "1000044493039935740" },
        "transactionIdFixTable": {
            "ca1ff8e4b5c8b4c9a56a8e7bf8ef3f2e9b5a5b2b4b1c9dc6d3a3e1c4f4d5c6a7":
                "608c7aeba0895da4517496590896eb325a0b5d367e1b186b1c07d7651a568b9e"
        },
        "negativeBalances": {
            "03287bfebba4c7881a0509717e71b34b63f31e40021c321f89ae04f84be6d6ac37": { "7": "-10" }
        }
    }"#;

    #[test]
    fn parses_reference_layout() {
        let exceptions: Exceptions = serde_json::from_str(JSON).unwrap();
        assert!(exceptions.is_block_exception(&BlockId::from("13114381566690093367")));
        let tx: TransactionId =
            "608c7aeba0895da4517496590896eb325a0b5d367e1b186b1c07d7651a568b9e".parse().unwrap();
        assert!(exceptions.is_transaction_exception(&tx));
        assert!(exceptions.is_id_fixed_transaction(&tx));
    }

    #[test]
    fn outlook_requires_exact_match() {
        let exceptions: Exceptions = serde_json::from_str(JSON).unwrap();
        assert_eq!(
            exceptions.outlook_replacement("8225244493039935740"),
            Some("1000044493039935740")
        );
        assert_eq!(exceptions.outlook_replacement("822524449303993574"), None);
    }

    #[test]
    fn negative_balance_lookup_by_nonce() {
        let exceptions: Exceptions = serde_json::from_str(JSON).unwrap();
        let key: PublicKey = "03287bfebba4c7881a0509717e71b34b63f31e40021c321f89ae04f84be6d6ac37"
            .parse()
            .unwrap();
        assert_eq!(
            exceptions.allowed_negative_balance(&key, &BigNumber::from(7u64)),
            Some(&BigNumber::from(-10i64))
        );
        assert_eq!(exceptions.allowed_negative_balance(&key, &BigNumber::from(8u64)), None);
    }
}
