//! Forged block queries.

use crate::StoreError;
use dpos_types::{BigNumber, BlockId, PublicKey};
use serde::{Deserialize, Serialize};

/// Rewards and fees one generator earned over all its blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRewards {
    pub generator_public_key: PublicKey,
    pub rewards: BigNumber,
}

/// Per-generator production totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgedBlocks {
    pub generator_public_key: PublicKey,
    pub total_fees: BigNumber,
    pub total_rewards: BigNumber,
    pub total_produced: u64,
}

/// The most recent block of one generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastForgedBlock {
    pub generator_public_key: PublicKey,
    pub id: BlockId,
    pub height: u32,
    pub timestamp: u32,
}

/// Read access to forged blocks.
pub trait BlockRepository: Send + Sync {
    fn get_block_rewards(&self) -> Result<Vec<BlockRewards>, StoreError>;

    fn get_delegates_forged_blocks(&self) -> Result<Vec<ForgedBlocks>, StoreError>;

    fn get_last_forged_blocks(&self) -> Result<Vec<LastForgedBlock>, StoreError>;
}
