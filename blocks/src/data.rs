use dpos_transactions::TransactionData;
use dpos_types::{BigNumber, BlockId, Bytes32, PublicKey, SignatureBytes};
use serde::{Deserialize, Serialize};

/// A block document: the header fields plus, when complete, its transactions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,

    pub version: u32,
    pub timestamp: u32,
    pub height: u32,

    /// Absent only for the genesis block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_block: Option<BlockId>,

    pub number_of_transactions: u32,
    pub total_amount: BigNumber,
    pub total_fee: BigNumber,
    pub reward: BigNumber,
    pub payload_length: u32,
    pub payload_hash: Bytes32,
    pub generator_public_key: PublicKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_signature: Option<SignatureBytes>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<TransactionData>,
}

/// Outcome of [`crate::verifier::verify`]. `errors` holds every failed check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockVerification {
    pub verified: bool,
    pub errors: Vec<String>,
    /// Some transactions are signed by multi-signature participants and still
    /// need checking against their sender wallets.
    pub contains_multi_signatures: bool,
}
