//! Block ids.
//!
//! Legacy networks use the first eight bytes of the header hash, read as a
//! little-endian `u64` and printed in decimal. Networks with
//! `block.idFullSha256` use the whole digest in hex.

use crate::serializer::serialize_header;
use crate::{BlockData, BlockError};
use dpos_config::ConfigManager;
use dpos_crypto::sha256;
use dpos_types::BlockId;

/// The id as computed from the header, before any outlook fix.
pub fn raw_id(data: &BlockData, config: &ConfigManager) -> Result<BlockId, BlockError> {
    let hash = sha256(&serialize_header(data, config, true)?);
    if config.milestone(data.height).block.id_full_sha256 {
        return Ok(BlockId::new(hex::encode(hash)));
    }
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash[..8]);
    Ok(BlockId::new(u64::from_le_bytes(prefix).to_string()))
}

/// The canonical id: [`raw_id`] with the network's outlook table applied.
pub fn compute_id(data: &BlockData, config: &ConfigManager) -> Result<BlockId, BlockError> {
    let raw = raw_id(data, config)?;
    match config.exceptions().outlook_replacement(raw.as_str()) {
        Some(fixed) => {
            tracing::debug!(raw = %raw, fixed, height = data.height, "outlook table id fix");
            Ok(BlockId::new(fixed))
        }
        None => Ok(raw),
    }
}

/// 16 hex digits of a decimal id, the form legacy storage indexes by.
pub fn id_hex(id: &BlockId) -> Option<String> {
    id.as_str().parse::<u64>().ok().map(|v| format!("{v:016x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_hex_pads_to_sixteen_digits() {
        assert_eq!(id_hex(&BlockId::new("1")).as_deref(), Some("0000000000000001"));
        assert_eq!(
            id_hex(&BlockId::new("17605317082329008056")).as_deref(),
            Some("f452a69c025647b8")
        );
        assert_eq!(id_hex(&BlockId::new("ab".repeat(32))), None);
    }
}
