//! Read access to a loaded network configuration.

use crate::milestone::merge_milestones;
use crate::presets;
use crate::{ConfigError, Exceptions, Milestone, NetworkConfig, NetworkParams};
use dpos_types::{BigNumber, BlockId, PublicKey, TransactionId};
use std::collections::HashSet;
use std::path::Path;

/// Immutable view of one network: parameters, merged milestones and exceptions.
///
/// Built once at startup and shared by reference; nothing in the workspace
/// mutates configuration after construction.
#[derive(Clone, Debug)]
pub struct ConfigManager {
    network: NetworkParams,
    milestones: Vec<Milestone>,
    exceptions: Exceptions,
    genesis_block: Option<serde_json::Value>,
    genesis_transactions: HashSet<TransactionId>,
}

impl ConfigManager {
    pub fn new(config: NetworkConfig) -> Result<Self, ConfigError> {
        let milestones = merge_milestones(&config.milestones)?;
        tracing::debug!(
            network = %config.network.name,
            milestones = milestones.len(),
            "network configuration loaded"
        );
        let genesis_transactions = config
            .genesis_block
            .as_ref()
            .and_then(|block| block.get("transactions"))
            .and_then(serde_json::Value::as_array)
            .map(|txs| {
                txs.iter()
                    .filter_map(|tx| tx.get("id")?.as_str()?.parse().ok())
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            network: config.network,
            milestones,
            exceptions: config.exceptions,
            genesis_block: config.genesis_block,
            genesis_transactions,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::new(NetworkConfig::from_json_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::new(NetworkConfig::from_toml_str(s)?)
    }

    /// Load a network document, choosing the format by file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => NetworkConfig::from_toml_file(path)?,
            _ => NetworkConfig::from_json_file(path)?,
        };
        Self::new(config)
    }

    /// The public development network.
    pub fn devnet() -> Self {
        Self::from_json_str(presets::DEVNET).expect("built-in devnet document is valid")
    }

    /// Replace the patch tables, e.g. to layer a node's local exceptions over a preset.
    pub fn with_exceptions(mut self, exceptions: Exceptions) -> Self {
        self.exceptions = exceptions;
        self
    }

    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    pub fn pub_key_hash(&self) -> u8 {
        self.network.pub_key_hash
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// The milestone in force at `height`: the last one whose height is at or
    /// below it, or the first one for heights below every entry.
    pub fn milestone(&self, height: u32) -> &Milestone {
        let idx = self.milestones.partition_point(|m| m.height <= height);
        &self.milestones[idx.saturating_sub(1)]
    }

    pub fn exceptions(&self) -> &Exceptions {
        &self.exceptions
    }

    pub fn genesis_block(&self) -> Option<&serde_json::Value> {
        self.genesis_block.as_ref()
    }

    /// Transactions of the genesis block skip the minimum amount and fee rules.
    pub fn is_genesis_transaction(&self, id: &TransactionId) -> bool {
        self.genesis_transactions.contains(id)
    }

    pub fn is_block_exception(&self, id: &BlockId) -> bool {
        self.exceptions.is_block_exception(id)
    }

    pub fn is_transaction_exception(&self, id: &TransactionId) -> bool {
        self.exceptions.is_transaction_exception(id)
    }

    pub fn allowed_negative_balance(
        &self,
        sender: &PublicKey,
        nonce: &BigNumber,
    ) -> Option<&BigNumber> {
        self.exceptions.allowed_negative_balance(sender, nonce)
    }

    /// Slot index of a network timestamp under the milestone at `height`.
    pub fn slot_number(&self, timestamp: u32, height: u32) -> u32 {
        timestamp / self.milestone(height).blocktime.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devnet_milestone_lookup() {
        let config = ConfigManager::devnet();
        assert_eq!(config.pub_key_hash(), 30);
        assert_eq!(config.milestone(0).height, 1);
        assert_eq!(config.milestone(1).reward, BigNumber::zero());
        assert_eq!(config.milestone(75_599).height, 1);
        assert_eq!(config.milestone(75_600).reward, BigNumber::from(200_000_000u64));
        assert!(!config.milestone(1_999_999).aip11);
        let m = config.milestone(2_000_000);
        assert!(m.aip11 && m.htlc_enabled);
        assert_eq!(m.static_fee("transfer"), Some(10_000_000));
        assert_eq!(m.static_fee("htlcClaim"), Some(0));
    }

    #[test]
    fn slot_number_uses_blocktime() {
        let config = ConfigManager::devnet();
        assert_eq!(config.slot_number(0, 1), 0);
        assert_eq!(config.slot_number(15, 1), 1);
        assert_eq!(config.slot_number(16, 1), 2);
    }
}
