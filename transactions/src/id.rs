//! Transaction ids and signing hashes.

use crate::legacy::legacy_bytes;
use crate::registry::TypeRegistry;
use crate::serializer::{serialize, SerializeOptions};
use crate::{CodecError, TransactionData};
use dpos_config::Exceptions;
use dpos_crypto::sha256;
use dpos_types::TransactionId;

/// Bytes a hash is taken over: the legacy form for version 1, the wire form
/// otherwise.
pub fn hash_input(
    data: &TransactionData,
    types: &TypeRegistry,
    exceptions: &Exceptions,
    options: SerializeOptions,
) -> Result<Vec<u8>, CodecError> {
    if data.version == 1 {
        legacy_bytes(data, exceptions, options)
    } else {
        serialize(data, types, options)
    }
}

pub fn signing_hash(
    data: &TransactionData,
    types: &TypeRegistry,
    exceptions: &Exceptions,
    options: SerializeOptions,
) -> Result<[u8; 32], CodecError> {
    Ok(sha256(&hash_input(data, types, exceptions, options)?))
}

pub fn compute_id(
    data: &TransactionData,
    types: &TypeRegistry,
    exceptions: &Exceptions,
) -> Result<TransactionId, CodecError> {
    signing_hash(data, types, exceptions, SerializeOptions::default()).map(TransactionId::new)
}
