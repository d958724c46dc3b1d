//! Signature verification.
//!
//! Version 1 transactions carry DER ECDSA signatures over the legacy byte
//! form; version 2 transactions carry either ECDSA or BIP340 Schnorr over the
//! wire form, told apart by length.

use crate::data::MultiSignatureAsset;
use crate::id::signing_hash;
use crate::registry::TypeRegistry;
use crate::serializer::SerializeOptions;
use crate::types::CoreType;
use crate::{CodecError, TransactionData};
use dpos_config::{ConfigManager, Exceptions};
use dpos_crypto::{verify_ecdsa, verify_schnorr, verify_signature};
use dpos_types::{PublicKey, SignatureBytes};
use std::collections::HashSet;

/// Whether `data` is acceptable as signed by its sender at `height`.
///
/// Multi-signature senders carry no primary signature and verify `false`
/// here; their participants are checked against the wallet's registration.
pub fn verify(
    data: &TransactionData,
    types: &TypeRegistry,
    config: &ConfigManager,
    height: u32,
) -> bool {
    if data
        .id
        .as_ref()
        .is_some_and(|id| config.is_transaction_exception(id))
    {
        return true;
    }

    if data.version == 1 && data.is_core(CoreType::MultiSignature) {
        return false;
    }

    let aip11 = config.milestone(height).aip11;
    if (aip11 && data.version == 1) || (!aip11 && data.version >= 2) {
        return false;
    }

    verify_hash(data, types, config.exceptions())
}

/// Check the primary signature against the sender public key.
pub fn verify_hash(data: &TransactionData, types: &TypeRegistry, exceptions: &Exceptions) -> bool {
    let Some(signature) = &data.signature else {
        return false;
    };
    let Ok(hash) = signing_hash(data, types, exceptions, SerializeOptions::for_signature()) else {
        return false;
    };
    check(data.version, &hash, signature, &data.sender_public_key)
}

/// Check the second signature against a registered second public key.
pub fn verify_second_signature(
    data: &TransactionData,
    types: &TypeRegistry,
    exceptions: &Exceptions,
    public_key: &PublicKey,
) -> bool {
    let Some(signature) = &data.second_signature else {
        return false;
    };
    let Ok(hash) = signing_hash(data, types, exceptions, SerializeOptions::for_second_signature())
    else {
        return false;
    };
    check(data.version, &hash, signature, public_key)
}

/// Check participant signatures against a multi-signature asset.
///
/// Returns `true` as soon as `min` distinct participants have signed validly.
/// A participant index used twice is an error rather than a failed check.
pub fn verify_signatures(
    data: &TransactionData,
    types: &TypeRegistry,
    exceptions: &Exceptions,
    multi_signature: &MultiSignatureAsset,
) -> Result<bool, CodecError> {
    let Some(signatures) = data.signatures.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(false);
    };
    let hash = signing_hash(data, types, exceptions, SerializeOptions::for_participants())?;

    let min = usize::from(multi_signature.min);
    let keys = &multi_signature.public_keys;
    let mut seen = HashSet::with_capacity(signatures.len());
    let mut valid = 0usize;

    for entry in signatures {
        let Some((&index, signature)) = entry.as_bytes().split_first() else {
            continue;
        };
        if !seen.insert(index) {
            return Err(CodecError::DuplicateParticipantInMultiSignature);
        }
        let Some(key) = keys.get(usize::from(index)) else {
            continue;
        };
        if verify_schnorr(&hash, signature, key) {
            valid += 1;
            if valid == min {
                return Ok(true);
            }
        }
    }
    Ok(valid >= min && min > 0)
}

fn check(version: u8, hash: &[u8; 32], signature: &SignatureBytes, key: &PublicKey) -> bool {
    if version == 1 {
        verify_ecdsa(hash, signature.as_bytes(), key)
    } else {
        verify_signature(hash, signature, key)
    }
}
