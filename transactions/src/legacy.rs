//! The version 1 byte form that version 1 ids and signatures are computed over.
//!
//! Unlike the wire form it carries a fixed 21-byte recipient slot, a vendor
//! field padded to 64 bytes, signed 64-bit amounts and textual assets.

use crate::bytes::ByteWriter;
use crate::data::Asset;
use crate::serializer::SerializeOptions;
use crate::types::CoreType;
use crate::{CodecError, TransactionData};
use dpos_config::Exceptions;
use dpos_crypto::{address_from_public_key, decode_address};

pub fn legacy_bytes(
    data: &TransactionData,
    exceptions: &Exceptions,
    options: SerializeOptions,
) -> Result<Vec<u8>, CodecError> {
    let mut w = ByteWriter::with_capacity(256);

    let type_id = u8::try_from(data.type_id)
        .map_err(|_| CodecError::schema("version 1 type must fit in one byte"))?;
    w.write_u8(type_id);
    w.write_i32(data.timestamp.unwrap_or(0) as i32);
    w.write_bytes(&data.sender_public_key.0);

    // Some historical type 1 and 4 ids were computed with a recipient.
    let id_fixed = data
        .id
        .as_ref()
        .is_some_and(|id| exceptions.is_id_fixed_transaction(id));
    let recipient_slot = !matches!(
        data.core_type(),
        Some(CoreType::SecondSignature | CoreType::MultiSignature)
    );
    if id_fixed || (data.recipient_id.is_some() && recipient_slot) {
        let recipient = match &data.recipient_id {
            Some(recipient) => recipient.clone(),
            None => {
                let network = data
                    .network
                    .ok_or_else(|| CodecError::schema("network byte is required"))?;
                address_from_public_key(&data.sender_public_key, network)
            }
        };
        w.write_bytes(&decode_address(&recipient)?);
    } else {
        w.write_bytes(&[0u8; 21]);
    }

    let vendor_field = data.vendor_field.as_deref().unwrap_or_default();
    w.write_padded(vendor_field.as_bytes(), 64);

    w.write_i64(data.amount.to_i64()?);
    w.write_i64(data.fee.to_i64()?);

    match &data.asset {
        Some(Asset::Signature(asset)) => w.write_bytes(&asset.public_key.0),
        Some(Asset::Delegate(asset)) => w.write_bytes(asset.username.as_bytes()),
        Some(Asset::Votes(votes)) => {
            for vote in votes {
                w.write_bytes(vote.to_string().as_bytes());
            }
        }
        Some(Asset::MultiSignatureLegacy(asset)) => {
            w.write_u8(asset.min);
            w.write_u8(asset.lifetime);
            for key in &asset.keysgroup {
                w.write_bytes(key.as_bytes());
            }
        }
        _ => {}
    }

    if let (Some(signature), false) = (&data.signature, options.exclude_signature) {
        w.write_bytes(signature.as_bytes());
    }
    if let (Some(second), false) = (&data.second_signature, options.exclude_second_signature) {
        w.write_bytes(second.as_bytes());
    }
    Ok(w.into_inner())
}
