//! Wire decoding, the inverse of [`crate::serializer::serialize`].

use crate::bytes::ByteReader;
use crate::data::{Asset, TransactionData};
use crate::registry::TypeRegistry;
use crate::types::{CoreType, TypeGroup};
use crate::CodecError;
use dpos_crypto::address_from_public_key;
use dpos_types::{BigNumber, PublicKey, SignatureBytes};
use std::collections::HashSet;

/// Length of a BIP340 signature.
const SCHNORR_LEN: usize = 64;
/// Participant index byte plus a Schnorr signature.
const PARTICIPANT_LEN: usize = 65;

pub fn deserialize(bytes: &[u8], types: &TypeRegistry) -> Result<TransactionData, CodecError> {
    let mut r = ByteReader::new(bytes);

    let marker = r.read_u8()?;
    if marker != 0xff {
        return Err(CodecError::MalformedTransactionBytes(format!(
            "expected 0xff marker, found {marker:#04x}"
        )));
    }
    let version = r.read_u8()?;
    if !(1..=2).contains(&version) {
        return Err(CodecError::TransactionVersion(version));
    }
    let network = r.read_u8()?;

    let mut data = if version == 1 {
        let type_id = r.read_u8()? as u16;
        let timestamp = r.read_u32()?;
        let sender = PublicKey(r.read_array()?);
        let mut data = TransactionData::new(TypeGroup::CORE, type_id, version, sender);
        data.timestamp = Some(timestamp);
        data
    } else {
        let type_group = TypeGroup(r.read_u32()?);
        let type_id = r.read_u16()?;
        let nonce = r.read_u64()?;
        let sender = PublicKey(r.read_array()?);
        let mut data = TransactionData::new(type_group, type_id, version, sender);
        data.nonce = Some(BigNumber::from(nonce));
        data
    };
    data.network = Some(network);
    data.fee = BigNumber::from(r.read_u64()?);

    let kind = types.get(data.type_key())?;

    let vendor_field_len = r.read_u8()? as usize;
    if vendor_field_len > 0 {
        let raw = r.read_bytes(vendor_field_len)?;
        if kind.has_vendor_field() {
            // Invalid sequences decode to U+FFFD rather than failing the transaction.
            data.vendor_field = Some(String::from_utf8_lossy(raw).into_owned());
        }
    }

    kind.read_asset(&mut data, &mut r)?;

    if version == 1 || !is_schnorr_layout(r.remaining()) {
        read_ecdsa_signatures(&mut data, &mut r)?;
    } else {
        read_schnorr_signatures(&mut data, &mut r)?;
    }

    if version == 1 {
        apply_v1_compatibility(&mut data);
    }
    Ok(data)
}

/// Remaining lengths that can only be Schnorr signatures, optionally followed
/// by participant signatures.
fn is_schnorr_layout(remaining: usize) -> bool {
    let multiple = |n: Option<usize>| n.is_some_and(|n| n % PARTICIPANT_LEN == 0);
    remaining == SCHNORR_LEN
        || remaining == 2 * SCHNORR_LEN
        || multiple(Some(remaining))
        || multiple(remaining.checked_sub(SCHNORR_LEN))
        || multiple(remaining.checked_sub(2 * SCHNORR_LEN))
}

fn read_ecdsa_signatures(
    data: &mut TransactionData,
    r: &mut ByteReader<'_>,
) -> Result<(), CodecError> {
    // DER: 0x30, body length, body.
    let der_len = |r: &ByteReader<'_>| -> Result<usize, CodecError> { Ok(r.peek(1)? as usize + 2) };
    let at_multi_signature = |r: &ByteReader<'_>| r.peek(0).is_ok_and(|b| b == 0xff);

    if r.has_remaining() {
        let len = der_len(r)?;
        data.signature = Some(SignatureBytes(r.read_bytes(len)?.to_vec()));
    }
    if r.has_remaining() && !at_multi_signature(r) {
        let len = der_len(r)?;
        data.second_signature = Some(SignatureBytes(r.read_bytes(len)?.to_vec()));
    }
    if r.has_remaining() && at_multi_signature(r) {
        r.skip(1)?;
        data.signatures = Some(vec![SignatureBytes(r.read_rest().to_vec())]);
    }
    if r.has_remaining() {
        return Err(CodecError::InvalidTransactionBytes(
            "signature buffer not exhausted".into(),
        ));
    }
    Ok(())
}

fn read_schnorr_signatures(
    data: &mut TransactionData,
    r: &mut ByteReader<'_>,
) -> Result<(), CodecError> {
    let single_follows = |rem: usize| rem > 0 && (rem % SCHNORR_LEN == 0 || rem % PARTICIPANT_LEN != 0);

    if single_follows(r.remaining()) {
        data.signature = Some(SignatureBytes(r.read_bytes(SCHNORR_LEN)?.to_vec()));
    }
    if single_follows(r.remaining()) {
        data.second_signature = Some(SignatureBytes(r.read_bytes(SCHNORR_LEN)?.to_vec()));
    }
    if r.has_remaining() {
        if r.remaining() % PARTICIPANT_LEN != 0 {
            return Err(CodecError::InvalidTransactionBytes(
                "signature buffer not exhausted".into(),
            ));
        }
        let mut seen = HashSet::new();
        let mut signatures = Vec::with_capacity(r.remaining() / PARTICIPANT_LEN);
        while r.has_remaining() {
            let part = r.read_bytes(PARTICIPANT_LEN)?;
            if !seen.insert(part[0]) {
                return Err(CodecError::DuplicateParticipantInMultiSignature);
            }
            signatures.push(SignatureBytes(part.to_vec()));
        }
        data.signatures = Some(signatures);
    }
    Ok(())
}

/// Fill the fields version 1 documents carry implicitly.
pub fn apply_v1_compatibility(data: &mut TransactionData) {
    data.type_group = TypeGroup::CORE;

    if data.is_core(CoreType::Vote) {
        if let Some(network) = data.network {
            data.recipient_id = Some(address_from_public_key(&data.sender_public_key, network));
        }
    } else if let Some(Asset::MultiSignatureLegacy(asset)) = &mut data.asset {
        for key in &mut asset.keysgroup {
            if !key.starts_with('+') {
                key.insert(0, '+');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schnorr_layout_detection() {
        assert!(is_schnorr_layout(0));
        assert!(is_schnorr_layout(64));
        assert!(is_schnorr_layout(128));
        assert!(is_schnorr_layout(65 * 3));
        assert!(is_schnorr_layout(64 + 65 * 2));
        assert!(is_schnorr_layout(128 + 65));
        assert!(!is_schnorr_layout(71));
        assert!(!is_schnorr_layout(72));
        assert!(!is_schnorr_layout(70 + 71));
    }

    #[test]
    fn rejects_bad_marker_and_version() {
        let types = TypeRegistry::new();
        assert!(matches!(
            deserialize(&[0x00, 0x01], &types),
            Err(CodecError::MalformedTransactionBytes(_))
        ));
        assert_eq!(
            deserialize(&[0xff, 0x03, 0x1e], &types),
            Err(CodecError::TransactionVersion(3))
        );
        assert!(matches!(
            deserialize(&[0xff, 0x02], &types),
            Err(CodecError::MalformedTransactionBytes(_))
        ));
    }
}
