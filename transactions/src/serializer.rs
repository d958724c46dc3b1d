//! Canonical wire encoding.
//!
//! Layout: common header, vendor field, type asset, signatures. Version 1 and 2
//! differ only in the header; see [`write_header`].

use crate::bytes::ByteWriter;
use crate::registry::TypeRegistry;
use crate::{CodecError, TransactionData};

/// Which signatures to leave out, for computing signing hashes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    pub exclude_signature: bool,
    pub exclude_second_signature: bool,
    pub exclude_multi_signature: bool,
}

impl SerializeOptions {
    /// Input to the sender's primary signature.
    pub fn for_signature() -> Self {
        Self {
            exclude_signature: true,
            exclude_second_signature: true,
            exclude_multi_signature: false,
        }
    }

    /// Input to the second signature: everything but itself.
    pub fn for_second_signature() -> Self {
        Self {
            exclude_second_signature: true,
            ..Self::default()
        }
    }

    /// Input to multi-signature participants: no signatures at all.
    pub fn for_participants() -> Self {
        Self {
            exclude_signature: true,
            exclude_second_signature: true,
            exclude_multi_signature: true,
        }
    }
}

pub fn serialize(
    data: &TransactionData,
    types: &TypeRegistry,
    options: SerializeOptions,
) -> Result<Vec<u8>, CodecError> {
    let kind = types.get(data.type_key())?;
    let mut w = ByteWriter::with_capacity(256);

    write_header(data, &mut w)?;

    match &data.vendor_field {
        Some(vendor_field) if kind.has_vendor_field() => {
            let len = u8::try_from(vendor_field.len())
                .map_err(|_| CodecError::schema("vendorField is longer than 255 bytes"))?;
            w.write_u8(len);
            w.write_bytes(vendor_field.as_bytes());
        }
        _ => w.write_u8(0),
    }

    kind.write_asset(data, &mut w)?;

    write_signatures(data, &mut w, options);
    Ok(w.into_inner())
}

fn write_header(data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
    let network = data
        .network
        .ok_or_else(|| CodecError::schema("network byte is required to serialize"))?;

    w.write_u8(0xff);
    w.write_u8(data.version);
    w.write_u8(network);

    match data.version {
        1 => {
            let type_id = u8::try_from(data.type_id)
                .map_err(|_| CodecError::schema("version 1 type must fit in one byte"))?;
            w.write_u8(type_id);
            w.write_u32(data.timestamp.unwrap_or(0));
        }
        2 => {
            w.write_u32(data.type_group.0);
            w.write_u16(data.type_id);
            w.write_u64(data.nonce_or_zero().to_u64()?);
        }
        other => return Err(CodecError::TransactionVersion(other)),
    }

    w.write_bytes(&data.sender_public_key.0);
    w.write_u64(data.fee.to_u64()?);
    Ok(())
}

fn write_signatures(data: &TransactionData, w: &mut ByteWriter, options: SerializeOptions) {
    if let (Some(signature), false) = (&data.signature, options.exclude_signature) {
        w.write_bytes(signature.as_bytes());
    }
    if let (Some(second), false) = (&data.second_signature, options.exclude_second_signature) {
        w.write_bytes(second.as_bytes());
    }
    let Some(signatures) = data.signatures.as_ref().filter(|s| !s.is_empty()) else {
        return;
    };
    if data.version == 1 {
        // The legacy blob always travels behind its marker.
        w.write_u8(0xff);
        for signature in signatures {
            w.write_bytes(signature.as_bytes());
        }
    } else if !options.exclude_multi_signature {
        for signature in signatures {
            w.write_bytes(signature.as_bytes());
        }
    }
}
