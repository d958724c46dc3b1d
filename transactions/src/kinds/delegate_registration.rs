use super::{missing_asset, TransactionKind};
use crate::bytes::{ByteReader, ByteWriter};
use crate::data::{Asset, DelegateAsset};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};

/// `len:u8, username`
#[derive(Debug, Default)]
pub struct DelegateRegistrationKind;

impl TransactionKind for DelegateRegistrationKind {
    fn type_id(&self) -> u16 {
        CoreType::DelegateRegistration.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[1, 2]
    }

    fn key(&self) -> &'static str {
        CoreType::DelegateRegistration.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let username = data.username().ok_or_else(|| missing_asset(self.key()))?;
        let len = u8::try_from(username.len())
            .map_err(|_| CodecError::schema("username is longer than 255 bytes"))?;
        w.write_u8(len);
        w.write_bytes(username.as_bytes());
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let len = r.read_u8()? as usize;
        let username = std::str::from_utf8(r.read_bytes(len)?)
            .map_err(|_| CodecError::InvalidTransactionBytes("username is not UTF-8".into()))?
            .to_string();
        data.asset = Some(Asset::Delegate(DelegateAsset { username }));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        let username = data.username().ok_or_else(|| missing_asset(self.key()))?;
        schema::delegate_username(username)?;
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}
