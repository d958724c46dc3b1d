use super::TransactionKind;
use crate::bytes::{ByteReader, ByteWriter};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};

/// No asset.
#[derive(Debug, Default)]
pub struct DelegateResignationKind;

impl TransactionKind for DelegateResignationKind {
    fn type_id(&self) -> u16 {
        CoreType::DelegateResignation.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        CoreType::DelegateResignation.key()
    }

    fn write_asset(&self, _data: &TransactionData, _w: &mut ByteWriter) -> Result<(), CodecError> {
        Ok(())
    }

    fn read_asset(
        &self,
        _data: &mut TransactionData,
        _r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}
