use super::{missing_asset, TransactionKind};
use crate::bytes::{ByteReader, ByteWriter};
use crate::data::{Asset, SecondSignatureAsset};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};
use dpos_types::PublicKey;

/// `publicKey:33`
#[derive(Debug, Default)]
pub struct SecondSignatureKind;

impl TransactionKind for SecondSignatureKind {
    fn type_id(&self) -> u16 {
        CoreType::SecondSignature.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[1, 2]
    }

    fn key(&self) -> &'static str {
        CoreType::SecondSignature.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let key = data
            .second_public_key_asset()
            .ok_or_else(|| missing_asset(self.key()))?;
        w.write_bytes(&key.0);
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let public_key = PublicKey(r.read_array()?);
        data.asset = Some(Asset::Signature(SecondSignatureAsset { public_key }));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        if data.second_public_key_asset().is_none() {
            return Err(missing_asset(self.key()));
        }
        if data.second_signature.is_some() {
            return Err(CodecError::schema(
                "secondSignature registration cannot itself carry a second signature",
            ));
        }
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}
