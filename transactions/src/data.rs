//! The transaction data model.
//!
//! `TransactionData` mirrors the JSON documents the network exchanges
//! (camelCase keys, amounts as decimal strings, keys and signatures as hex), so
//! it can be read from and written to storage and APIs with serde directly.

use crate::types::{CoreType, TypeGroup, TypeKey};
use dpos_types::{Address, BigNumber, BlockId, Bytes32, PublicKey, SignatureBytes, TransactionId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    #[serde(default = "default_version")]
    pub version: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<u8>,

    #[serde(default)]
    pub type_group: TypeGroup,

    #[serde(rename = "type")]
    pub type_id: u16,

    /// Version 2 only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<BigNumber>,

    /// Version 1 only, seconds since the network epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u32>,

    pub sender_public_key: PublicKey,

    pub fee: BigNumber,

    #[serde(default)]
    pub amount: BigNumber,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_field: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<SignatureBytes>,

    #[serde(default, alias = "signSignature", skip_serializing_if = "Option::is_none")]
    pub second_signature: Option<SignatureBytes>,

    /// Version 2: `index:u8 || schnorr:64` per participant.
    /// Version 1: the legacy multi-signature blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<SignatureBytes>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TransactionId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

fn default_version() -> u8 {
    1
}

impl TransactionData {
    /// An unsigned skeleton of the given type.
    pub fn new(type_group: TypeGroup, type_id: u16, version: u8, sender: PublicKey) -> Self {
        Self {
            version,
            network: None,
            type_group,
            type_id,
            nonce: None,
            timestamp: None,
            sender_public_key: sender,
            fee: BigNumber::zero(),
            amount: BigNumber::zero(),
            expiration: None,
            recipient_id: None,
            vendor_field: None,
            asset: None,
            signature: None,
            second_signature: None,
            signatures: None,
            id: None,
            block_id: None,
            sequence: None,
        }
    }

    pub fn type_key(&self) -> TypeKey {
        TypeKey::new(self.type_group, self.type_id, self.version)
    }

    /// The core type, if this transaction belongs to the core group.
    pub fn core_type(&self) -> Option<CoreType> {
        if self.type_group.is_core() {
            CoreType::from_u16(self.type_id)
        } else {
            None
        }
    }

    pub fn is_core(&self, core: CoreType) -> bool {
        self.core_type() == Some(core)
    }

    pub fn nonce_or_zero(&self) -> BigNumber {
        self.nonce.clone().unwrap_or_default()
    }

    pub fn has_multi_signatures(&self) -> bool {
        self.signatures.as_ref().is_some_and(|s| !s.is_empty())
    }

    pub fn second_public_key_asset(&self) -> Option<&PublicKey> {
        match &self.asset {
            Some(Asset::Signature(a)) => Some(&a.public_key),
            _ => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match &self.asset {
            Some(Asset::Delegate(a)) => Some(&a.username),
            _ => None,
        }
    }

    pub fn votes(&self) -> &[Vote] {
        match &self.asset {
            Some(Asset::Votes(v)) => v,
            _ => &[],
        }
    }

    pub fn multi_signature(&self) -> Option<&MultiSignatureAsset> {
        match &self.asset {
            Some(Asset::MultiSignature(a)) => Some(a),
            _ => None,
        }
    }

    pub fn legacy_multi_signature(&self) -> Option<&LegacyMultiSignatureAsset> {
        match &self.asset {
            Some(Asset::MultiSignatureLegacy(a)) => Some(a),
            _ => None,
        }
    }

    pub fn ipfs(&self) -> Option<&str> {
        match &self.asset {
            Some(Asset::Ipfs(h)) => Some(h),
            _ => None,
        }
    }

    pub fn payments(&self) -> &[Payment] {
        match &self.asset {
            Some(Asset::Payments(p)) => p,
            _ => &[],
        }
    }

    pub fn lock(&self) -> Option<&HtlcLockAsset> {
        match &self.asset {
            Some(Asset::Lock(a)) => Some(a),
            _ => None,
        }
    }

    pub fn claim(&self) -> Option<&HtlcClaimAsset> {
        match &self.asset {
            Some(Asset::Claim(a)) => Some(a),
            _ => None,
        }
    }

    pub fn refund(&self) -> Option<&HtlcRefundAsset> {
        match &self.asset {
            Some(Asset::Refund(a)) => Some(a),
            _ => None,
        }
    }
}

// ── Assets ─────────────────────────────────────────────────────────────

/// Type-specific payload. Serialized externally tagged, which gives the
/// network's `{"votes": [...]}`, `{"lock": {...}}` shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Asset {
    Signature(SecondSignatureAsset),
    Delegate(DelegateAsset),
    Votes(Vec<Vote>),
    MultiSignature(MultiSignatureAsset),
    #[serde(alias = "multisignature")]
    MultiSignatureLegacy(LegacyMultiSignatureAsset),
    Ipfs(String),
    Payments(Vec<Payment>),
    Lock(HtlcLockAsset),
    Claim(HtlcClaimAsset),
    Refund(HtlcRefundAsset),
    /// Payload of a type registered outside the core group.
    Custom(serde_json::Value),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondSignatureAsset {
    pub public_key: PublicKey,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateAsset {
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiSignatureAsset {
    pub min: u8,
    pub public_keys: Vec<PublicKey>,
}

/// Pre-AIP11 registration. Keys carry a `+` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMultiSignatureAsset {
    pub min: u8,
    pub lifetime: u8,
    pub keysgroup: Vec<String>,
}

impl LegacyMultiSignatureAsset {
    /// Participant keys with the `+` prefix stripped; unparsable entries are skipped.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.keysgroup
            .iter()
            .filter_map(|k| k.strip_prefix('+').unwrap_or(k).parse().ok())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub amount: BigNumber,
    pub recipient_id: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtlcLockAsset {
    pub secret_hash: Bytes32,
    pub expiration: HtlcExpiration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtlcExpiration {
    #[serde(rename = "type")]
    pub expiration_type: HtlcExpirationType,
    pub value: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HtlcExpirationType {
    EpochTimestamp = 1,
    BlockHeight = 2,
}

impl TryFrom<u8> for HtlcExpirationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::EpochTimestamp),
            2 => Ok(Self::BlockHeight),
            other => Err(format!("unknown htlc expiration type {other}")),
        }
    }
}

impl From<HtlcExpirationType> for u8 {
    fn from(value: HtlcExpirationType) -> Self {
        value as u8
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtlcClaimAsset {
    pub lock_transaction_id: TransactionId,
    pub unlock_secret: Bytes32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtlcRefundAsset {
    pub lock_transaction_id: TransactionId,
}

// ── Votes ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoteAction {
    Vote,
    Unvote,
}

/// One entry of a vote asset, `+<delegate key>` or `-<delegate key>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vote {
    pub action: VoteAction,
    pub delegate: PublicKey,
}

impl Vote {
    pub fn vote(delegate: PublicKey) -> Self {
        Self { action: VoteAction::Vote, delegate }
    }

    pub fn unvote(delegate: PublicKey) -> Self {
        Self { action: VoteAction::Unvote, delegate }
    }

    pub fn is_vote(&self) -> bool {
        self.action == VoteAction::Vote
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.action {
            VoteAction::Vote => '+',
            VoteAction::Unvote => '-',
        };
        write!(f, "{sign}{}", self.delegate)
    }
}

impl FromStr for Vote {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.chars().next() {
            Some('+') => VoteAction::Vote,
            Some('-') => VoteAction::Unvote,
            _ => return Err(format!("vote must start with + or -: {s}")),
        };
        let delegate = s[1..].parse().map_err(|e| format!("invalid vote {s}: {e}"))?;
        Ok(Self { action, delegate })
    }
}

impl Serialize for Vote {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Vote {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
