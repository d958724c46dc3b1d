use super::{read_address, read_amount, write_address, write_amount, TransactionKind};
use crate::bytes::{ByteReader, ByteWriter};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};

/// `amount:u64, expiration:u32, recipient:21`
#[derive(Debug, Default)]
pub struct TransferKind;

impl TransactionKind for TransferKind {
    fn type_id(&self) -> u16 {
        CoreType::Transfer.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[1, 2]
    }

    fn key(&self) -> &'static str {
        CoreType::Transfer.key()
    }

    fn has_vendor_field(&self) -> bool {
        true
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let recipient = data
            .recipient_id
            .as_ref()
            .ok_or_else(|| CodecError::schema("transfer requires recipientId"))?;
        write_amount(w, &data.amount)?;
        w.write_u32(data.expiration.unwrap_or(0));
        write_address(w, recipient)
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        data.amount = read_amount(r)?;
        data.expiration = Some(r.read_u32()?).filter(|e| *e != 0);
        data.recipient_id = Some(read_address(r)?);
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        schema::require_recipient(data, ctx)?;
        schema::min_amount(data, 1, ctx)?;
        schema::min_fee(data, 1, ctx)
    }
}
