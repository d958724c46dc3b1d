use crate::{BlockData, BlockError};
use dpos_config::ConfigManager;
use dpos_transactions::bytes::ByteReader;
use dpos_types::{BigNumber, BlockId, Bytes32, PublicKey, SignatureBytes};

/// A decoded block whose transaction bodies are still raw, in wire order.
#[derive(Clone, Debug, PartialEq)]
pub struct DeserializedBlock {
    pub data: BlockData,
    pub transactions: Vec<Vec<u8>>,
}

pub fn deserialize(
    bytes: &[u8],
    config: &ConfigManager,
    header_only: bool,
) -> Result<DeserializedBlock, BlockError> {
    let mut r = ByteReader::new(bytes);

    let version = r.read_u32()?;
    let timestamp = r.read_u32()?;
    let height = r.read_u32()?;
    let full_sha256 = config.milestone(height).block.id_full_sha256;
    let previous_block = if full_sha256 {
        let raw: [u8; 32] = r.read_array()?;
        (raw != [0u8; 32]).then(|| BlockId::new(hex::encode(raw)))
    } else {
        let raw = u64::from_be_bytes(r.read_array()?);
        (raw != 0).then(|| BlockId::new(raw.to_string()))
    };

    let number_of_transactions = r.read_u32()?;
    let total_amount = BigNumber::from(r.read_u64()?);
    let total_fee = BigNumber::from(r.read_u64()?);
    let reward = BigNumber::from(r.read_u64()?);
    let payload_length = r.read_u32()?;
    let payload_hash = Bytes32(r.read_array()?);
    let generator_public_key = PublicKey(r.read_array()?);

    let block_signature = if r.has_remaining() {
        let len = r.peek(1)? as usize + 2;
        Some(SignatureBytes(r.read_bytes(len)?.to_vec()))
    } else {
        None
    };

    let mut transactions = Vec::new();
    if !header_only {
        let count = number_of_transactions as usize;
        let mut lengths = Vec::with_capacity(count.min(r.remaining() / 4));
        for _ in 0..count {
            lengths.push(r.read_u32()? as usize);
        }
        // Positions pair lengths with bodies; nothing is keyed by id here.
        transactions.reserve(lengths.len());
        for len in lengths {
            transactions.push(r.read_bytes(len)?.to_vec());
        }
        if r.has_remaining() {
            return Err(BlockError::Malformed(format!(
                "{} trailing bytes after the last transaction",
                r.remaining()
            )));
        }
    }

    Ok(DeserializedBlock {
        data: BlockData {
            id: None,
            version,
            timestamp,
            height,
            previous_block,
            number_of_transactions,
            total_amount,
            total_fee,
            reward,
            payload_length,
            payload_hash,
            generator_public_key,
            block_signature,
            transactions: Vec::new(),
        },
        transactions,
    })
}
