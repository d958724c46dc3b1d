use super::{read_address, read_amount, write_address, write_amount, TransactionKind};
use crate::bytes::{ByteReader, ByteWriter};
use crate::data::{Asset, Payment};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};

/// `count:u16`, then `amount:u64, recipient:21` per payment.
#[derive(Debug, Default)]
pub struct MultiPaymentKind;

impl TransactionKind for MultiPaymentKind {
    fn type_id(&self) -> u16 {
        CoreType::MultiPayment.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        CoreType::MultiPayment.key()
    }

    fn has_vendor_field(&self) -> bool {
        true
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let Some(Asset::Payments(payments)) = &data.asset else {
            return Err(super::missing_asset(self.key()));
        };
        let count =
            u16::try_from(payments.len()).map_err(|_| CodecError::schema("too many payments"))?;
        w.write_u16(count);
        for payment in payments {
            write_amount(w, &payment.amount)?;
            write_address(w, &payment.recipient_id)?;
        }
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let count = r.read_u16()?;
        let mut payments = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let amount = read_amount(r)?;
            let recipient_id = read_address(r)?;
            payments.push(Payment { amount, recipient_id });
        }
        data.asset = Some(Asset::Payments(payments));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        let Some(Asset::Payments(payments)) = &data.asset else {
            return Err(super::missing_asset(self.key()));
        };
        let limit = ctx.milestone.multi_payment_limit;
        if payments.len() < 2 || payments.len() > limit {
            return Err(CodecError::schema(format!(
                "multiPayment requires 2 to {limit} payments, got {}",
                payments.len()
            )));
        }
        for payment in payments {
            if payment.amount < 1u64.into() {
                return Err(CodecError::schema("payment amount must be at least 1"));
            }
            schema::address(&payment.recipient_id, ctx)?;
        }
        schema::zero_amount(data)?;
        schema::min_fee(data, 1, ctx)
    }
}
