use super::{missing_asset, TransactionKind};
use crate::bytes::{ByteReader, ByteWriter};
use crate::data::Asset;
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};

/// Raw multihash: `hashFunction:u8, digestLength:u8, digest`. Carried as base58.
#[derive(Debug, Default)]
pub struct IpfsKind;

impl TransactionKind for IpfsKind {
    fn type_id(&self) -> u16 {
        CoreType::Ipfs.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        CoreType::Ipfs.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let hash = data.ipfs().ok_or_else(|| missing_asset(self.key()))?;
        let raw = bs58::decode(hash)
            .into_vec()
            .map_err(|e| CodecError::schema(format!("ipfs hash is not base58: {e}")))?;
        w.write_bytes(&raw);
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let hash_function = r.read_u8()?;
        let len = r.read_u8()?;
        let digest = r.read_bytes(len as usize)?;
        let mut raw = Vec::with_capacity(digest.len() + 2);
        raw.push(hash_function);
        raw.push(len);
        raw.extend_from_slice(digest);
        data.asset = Some(Asset::Ipfs(bs58::encode(raw).into_string()));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        let hash = data.ipfs().ok_or_else(|| missing_asset(self.key()))?;
        if !(2..=90).contains(&hash.len()) {
            return Err(CodecError::schema("ipfs hash must be 2 to 90 characters"));
        }
        let raw = bs58::decode(hash)
            .into_vec()
            .map_err(|e| CodecError::schema(format!("ipfs hash is not base58: {e}")))?;
        if raw.len() < 2 || raw[1] as usize != raw.len() - 2 {
            return Err(CodecError::schema("ipfs hash is not a multihash"));
        }
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}
