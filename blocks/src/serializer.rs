use crate::{BlockData, BlockError};
use dpos_config::ConfigManager;
use dpos_transactions::bytes::ByteWriter;
use dpos_transactions::serializer::serialize;
use dpos_transactions::{SerializeOptions, TypeRegistry};
use dpos_types::BlockId;

/// Header bytes, with or without the block signature.
pub fn serialize_header(
    data: &BlockData,
    config: &ConfigManager,
    include_signature: bool,
) -> Result<Vec<u8>, BlockError> {
    let milestone = config.milestone(data.height);
    let mut w = ByteWriter::with_capacity(256);

    w.write_u32(data.version);
    w.write_u32(data.timestamp);
    w.write_u32(data.height);
    w.write_bytes(&previous_block_bytes(
        data.previous_block.as_ref(),
        milestone.block.id_full_sha256,
    )?);
    w.write_u32(data.number_of_transactions);
    w.write_u64(data.total_amount.to_u64()?);
    w.write_u64(data.total_fee.to_u64()?);
    w.write_u64(data.reward.to_u64()?);
    w.write_u32(data.payload_length);
    w.write_bytes(data.payload_hash.as_bytes());
    w.write_bytes(data.generator_public_key.as_bytes());

    if include_signature {
        if let Some(signature) = &data.block_signature {
            w.write_bytes(signature.as_bytes());
        }
    }
    Ok(w.into_inner())
}

/// Header, then the length table, then the transaction bodies of `data.transactions`.
pub fn serialize_full(
    data: &BlockData,
    types: &TypeRegistry,
    config: &ConfigManager,
) -> Result<Vec<u8>, BlockError> {
    let bodies = data
        .transactions
        .iter()
        .map(|tx| serialize(tx, types, SerializeOptions::default()))
        .collect::<Result<Vec<_>, _>>()?;
    serialize_with_bodies(data, &bodies, config)
}

/// Full form from already encoded transactions, kept in the given order.
pub fn serialize_with_bodies<B: AsRef<[u8]>>(
    data: &BlockData,
    bodies: &[B],
    config: &ConfigManager,
) -> Result<Vec<u8>, BlockError> {
    let mut out = serialize_header(data, config, true)?;
    let mut w = ByteWriter::with_capacity(bodies.iter().map(|b| b.as_ref().len() + 4).sum());
    for body in bodies {
        let len = u32::try_from(body.as_ref().len())
            .map_err(|_| BlockError::Malformed("transaction larger than 4 GiB".into()))?;
        w.write_u32(len);
    }
    for body in bodies {
        w.write_bytes(body.as_ref());
    }
    out.extend(w.into_inner());
    Ok(out)
}

/// The previous id as 8 big-endian bytes of its decimal value, or 32 raw
/// bytes on full SHA-256 networks. Missing ids encode as zeros.
fn previous_block_bytes(id: Option<&BlockId>, full_sha256: bool) -> Result<Vec<u8>, BlockError> {
    let invalid = || BlockError::InvalidPreviousBlock(id.map(|i| i.to_string()).unwrap_or_default());
    match (id, full_sha256) {
        (None, true) => Ok(vec![0u8; 32]),
        (None, false) => Ok(vec![0u8; 8]),
        (Some(id), true) => {
            let bytes = hex::decode(id.as_str()).map_err(|_| invalid())?;
            if bytes.len() != 32 {
                return Err(invalid());
            }
            Ok(bytes)
        }
        (Some(id), false) => {
            let value: u64 = id.as_str().parse().map_err(|_| invalid())?;
            Ok(value.to_be_bytes().to_vec())
        }
    }
}
