use super::{
    missing_asset, read_address, read_amount, write_address, write_amount, TransactionKind,
};
use crate::bytes::{ByteReader, ByteWriter};
use crate::data::{
    Asset, HtlcClaimAsset, HtlcExpiration, HtlcExpirationType, HtlcLockAsset, HtlcRefundAsset,
};
use crate::schema::{self, SchemaContext};
use crate::types::CoreType;
use crate::{CodecError, TransactionData};
use dpos_types::{Bytes32, TransactionId};

/// `amount:u64, secretHash:32, expirationType:u8, expirationValue:u32, recipient:21`
#[derive(Debug, Default)]
pub struct HtlcLockKind;

impl TransactionKind for HtlcLockKind {
    fn type_id(&self) -> u16 {
        CoreType::HtlcLock.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        CoreType::HtlcLock.key()
    }

    fn has_vendor_field(&self) -> bool {
        true
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let lock = data.lock().ok_or_else(|| missing_asset(self.key()))?;
        let recipient = data
            .recipient_id
            .as_ref()
            .ok_or_else(|| CodecError::schema("htlcLock requires recipientId"))?;
        write_amount(w, &data.amount)?;
        w.write_bytes(lock.secret_hash.as_bytes());
        w.write_u8(lock.expiration.expiration_type.into());
        w.write_u32(lock.expiration.value);
        write_address(w, recipient)
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        data.amount = read_amount(r)?;
        let secret_hash = Bytes32(r.read_array()?);
        let expiration_type = HtlcExpirationType::try_from(r.read_u8()?)
            .map_err(CodecError::InvalidTransactionBytes)?;
        let value = r.read_u32()?;
        data.recipient_id = Some(read_address(r)?);
        data.asset = Some(Asset::Lock(HtlcLockAsset {
            secret_hash,
            expiration: HtlcExpiration { expiration_type, value },
        }));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        if data.lock().is_none() {
            return Err(missing_asset(self.key()));
        }
        schema::require_recipient(data, ctx)?;
        schema::min_amount(data, 1, ctx)?;
        schema::min_fee(data, 1, ctx)
    }
}

/// `lockTransactionId:32, unlockSecret:32`
#[derive(Debug, Default)]
pub struct HtlcClaimKind;

impl TransactionKind for HtlcClaimKind {
    fn type_id(&self) -> u16 {
        CoreType::HtlcClaim.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        CoreType::HtlcClaim.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let claim = data.claim().ok_or_else(|| missing_asset(self.key()))?;
        w.write_bytes(claim.lock_transaction_id.as_bytes());
        w.write_bytes(claim.unlock_secret.as_bytes());
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let lock_transaction_id = TransactionId::new(r.read_array()?);
        let unlock_secret = Bytes32(r.read_array()?);
        data.asset = Some(Asset::Claim(HtlcClaimAsset {
            lock_transaction_id,
            unlock_secret,
        }));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, _ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        if data.claim().is_none() {
            return Err(missing_asset(self.key()));
        }
        schema::zero_amount(data)?;
        schema::zero_fee(data)
    }
}

/// `lockTransactionId:32`
#[derive(Debug, Default)]
pub struct HtlcRefundKind;

impl TransactionKind for HtlcRefundKind {
    fn type_id(&self) -> u16 {
        CoreType::HtlcRefund.as_u16()
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        CoreType::HtlcRefund.key()
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let refund = data.refund().ok_or_else(|| missing_asset(self.key()))?;
        w.write_bytes(refund.lock_transaction_id.as_bytes());
        Ok(())
    }

    fn read_asset(
        &self,
        data: &mut TransactionData,
        r: &mut ByteReader<'_>,
    ) -> Result<(), CodecError> {
        let lock_transaction_id = TransactionId::new(r.read_array()?);
        data.asset = Some(Asset::Refund(HtlcRefundAsset { lock_transaction_id }));
        Ok(())
    }

    fn validate(&self, data: &TransactionData, _ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        if data.refund().is_none() {
            return Err(missing_asset(self.key()));
        }
        schema::zero_amount(data)?;
        schema::zero_fee(data)
    }
}
