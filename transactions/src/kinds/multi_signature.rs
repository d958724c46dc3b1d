use super::{missing_asset, TransactionKind};
use crate::bytes::{ByteReader, ByteWriter};
use crate::data::{Asset, LegacyMultiSignatureAsset, MultiSignatureAsset};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};
use dpos_types::PublicKey;
use std::collections::HashSet;

/// Maximum number of participants in a multi-signature group.
pub const MAX_PARTICIPANTS: usize = 16;

/// Version 2 registration: `min:u8, count:u8, keys:33*n`
#[derive(Debug, Default)]
pub struct MultiSignatureKind;

impl TransactionKind for MultiSignatureKind {
    fn type_id(&self) -> u16 {
        CoreType::MultiSignature.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        CoreType::MultiSignature.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let asset = data.multi_signature().ok_or_else(|| missing_asset(self.key()))?;
        let count = u8::try_from(asset.public_keys.len())
            .map_err(|_| CodecError::schema("too many participants"))?;
        w.write_u8(asset.min);
        w.write_u8(count);
        for key in &asset.public_keys {
            w.write_bytes(&key.0);
        }
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let min = r.read_u8()?;
        let count = r.read_u8()?;
        let public_keys = (0..count)
            .map(|_| r.read_array().map(PublicKey))
            .collect::<Result<Vec<_>, _>>()?;
        data.asset = Some(Asset::MultiSignature(MultiSignatureAsset { min, public_keys }));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        let asset = data.multi_signature().ok_or_else(|| missing_asset(self.key()))?;
        let n = asset.public_keys.len();
        if n == 0 || n > MAX_PARTICIPANTS {
            return Err(CodecError::schema(format!(
                "multiSignature requires 1 to {MAX_PARTICIPANTS} public keys, got {n}"
            )));
        }
        if asset.min < 1 || asset.min as usize > n {
            return Err(CodecError::schema(format!(
                "multiSignature min must be between 1 and {n}, got {}",
                asset.min
            )));
        }
        let unique: HashSet<_> = asset.public_keys.iter().collect();
        if unique.len() != n {
            return Err(CodecError::schema("multiSignature public keys must be unique"));
        }
        if ctx.require_signature {
            let signed = data.signatures.as_ref().map_or(0, Vec::len);
            if signed < asset.min as usize || signed > n {
                return Err(CodecError::schema(format!(
                    "multiSignature registration requires between {} and {n} signatures, got {signed}",
                    asset.min
                )));
            }
        }
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}

/// Version 1 registration: `min:u8, count:u8, lifetime:u8, keys:33*n`
#[derive(Debug, Default)]
pub struct LegacyMultiSignatureKind;

impl TransactionKind for LegacyMultiSignatureKind {
    fn type_id(&self) -> u16 {
        CoreType::MultiSignature.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[1]
    }

    fn key(&self) -> &'static str {
        CoreType::MultiSignature.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let asset = data
            .legacy_multi_signature()
            .ok_or_else(|| missing_asset(self.key()))?;
        let count = u8::try_from(asset.keysgroup.len())
            .map_err(|_| CodecError::schema("too many participants"))?;
        w.write_u8(asset.min);
        w.write_u8(count);
        w.write_u8(asset.lifetime);
        for key in &asset.keysgroup {
            let key: PublicKey = key.strip_prefix('+').unwrap_or(key).parse()?;
            w.write_bytes(&key.0);
        }
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let min = r.read_u8()?;
        let count = r.read_u8()?;
        let lifetime = r.read_u8()?;
        let keysgroup = (0..count)
            .map(|_| r.read_array().map(|k| format!("+{}", PublicKey(k))))
            .collect::<Result<Vec<_>, _>>()?;
        data.asset = Some(Asset::MultiSignatureLegacy(LegacyMultiSignatureAsset {
            min,
            lifetime,
            keysgroup,
        }));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        let asset = data
            .legacy_multi_signature()
            .ok_or_else(|| missing_asset(self.key()))?;
        let n = asset.keysgroup.len();
        if n == 0 || n > MAX_PARTICIPANTS {
            return Err(CodecError::schema(format!(
                "keysgroup requires 1 to {MAX_PARTICIPANTS} keys, got {n}"
            )));
        }
        if asset.min < 1 || asset.min as usize > n {
            return Err(CodecError::schema("keysgroup min out of range"));
        }
        if !(1..=72).contains(&asset.lifetime) {
            return Err(CodecError::schema("lifetime must be between 1 and 72"));
        }
        if asset.keysgroup.iter().any(|k| k.len() != 67) {
            return Err(CodecError::schema("keysgroup entries must be 67 characters"));
        }
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}
