//! Typed wallet attribute domains.
//!
//! Each domain is absent until a handler first sets it. Handlers declare the
//! domains they touch through [`WalletAttribute`].

use dpos_transactions::HtlcExpiration;
use dpos_types::{Address, BigNumber, BlockId, Bytes32, PublicKey, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletExtensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_public_key: Option<PublicKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<DelegateInfo>,

    /// Public key of the delegate this wallet votes for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote: Option<PublicKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_signature: Option<MultiSignatureInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub htlc: Option<HtlcInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs: Option<IpfsInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateInfo {
    pub username: String,
    pub vote_balance: BigNumber,
    pub forged_fees: BigNumber,
    pub forged_rewards: BigNumber,
    pub produced_blocks: u64,
    #[serde(default)]
    pub resigned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_block: Option<LastBlockInfo>,
}

impl DelegateInfo {
    /// A freshly registered delegate with nothing forged yet.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            vote_balance: BigNumber::zero(),
            forged_fees: BigNumber::zero(),
            forged_rewards: BigNumber::zero(),
            produced_blocks: 0,
            resigned: false,
            rank: None,
            last_block: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastBlockInfo {
    pub id: BlockId,
    pub height: u32,
    pub timestamp: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSignatureInfo {
    pub min: u8,
    pub public_keys: Vec<PublicKey>,
    /// Registered through the pre-AIP11 transaction; such wallets can no
    /// longer send.
    #[serde(default)]
    pub legacy: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtlcInfo {
    pub locks: BTreeMap<TransactionId, HtlcLock>,
    pub locked_balance: BigNumber,
}

/// An open hashed time lock, keyed by its lock transaction id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtlcLock {
    pub amount: BigNumber,
    pub recipient_id: Address,
    pub secret_hash: Bytes32,
    pub expiration: HtlcExpiration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_field: Option<String>,
    pub timestamp: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpfsInfo {
    pub hashes: BTreeSet<String>,
}

/// Attribute paths a handler may read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WalletAttribute {
    SecondPublicKey,
    Delegate,
    DelegateUsername,
    DelegateVoteBalance,
    DelegateForgedFees,
    DelegateForgedRewards,
    DelegateProducedBlocks,
    DelegateRank,
    DelegateLastBlock,
    DelegateResigned,
    Vote,
    MultiSignature,
    Htlc,
    HtlcLocks,
    HtlcLockedBalance,
    Ipfs,
    IpfsHashes,
}

impl WalletAttribute {
    /// Dotted path used by the reference network's APIs.
    pub fn path(self) -> &'static str {
        match self {
            Self::SecondPublicKey => "secondPublicKey",
            Self::Delegate => "delegate",
            Self::DelegateUsername => "delegate.username",
            Self::DelegateVoteBalance => "delegate.voteBalance",
            Self::DelegateForgedFees => "delegate.forgedFees",
            Self::DelegateForgedRewards => "delegate.forgedRewards",
            Self::DelegateProducedBlocks => "delegate.producedBlocks",
            Self::DelegateRank => "delegate.rank",
            Self::DelegateLastBlock => "delegate.lastBlock",
            Self::DelegateResigned => "delegate.resigned",
            Self::Vote => "vote",
            Self::MultiSignature => "multiSignature",
            Self::Htlc => "htlc",
            Self::HtlcLocks => "htlc.locks",
            Self::HtlcLockedBalance => "htlc.lockedBalance",
            Self::Ipfs => "ipfs",
            Self::IpfsHashes => "ipfs.hashes",
        }
    }
}

impl fmt::Display for WalletAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
