//! Per-type asset layouts and schema rules.
//!
//! Every transaction structure the codec understands is a [`TransactionKind`].
//! The eleven core kinds live in this module; other type groups plug in their
//! own implementations through [`crate::TypeRegistry::register`].

mod delegate_registration;
mod delegate_resignation;
mod htlc;
mod ipfs;
mod multi_payment;
mod multi_signature;
mod second_signature;
mod transfer;
mod vote;

pub use delegate_registration::DelegateRegistrationKind;
pub use delegate_resignation::DelegateResignationKind;
pub use htlc::{HtlcClaimKind, HtlcLockKind, HtlcRefundKind};
pub use ipfs::IpfsKind;
pub use multi_payment::MultiPaymentKind;
pub use multi_signature::{LegacyMultiSignatureKind, MultiSignatureKind};
pub use second_signature::SecondSignatureKind;
pub use transfer::TransferKind;
pub use vote::VoteKind;

use crate::bytes::{ByteReader, ByteWriter};
use crate::schema::SchemaContext;
use crate::types::TypeGroup;
use crate::{CodecError, TransactionData};
use dpos_crypto::{decode_address, encode_address};
use dpos_types::{Address, BigNumber};
use std::sync::Arc;

/// Wire layout and schema of one transaction structure.
pub trait TransactionKind: Send + Sync {
    fn type_group(&self) -> TypeGroup {
        TypeGroup::CORE
    }

    fn type_id(&self) -> u16;

    /// Transaction versions this structure is registered for.
    fn versions(&self) -> &'static [u8];

    /// Name used in the static fee table and in messages.
    fn key(&self) -> &'static str;

    fn has_vendor_field(&self) -> bool {
        false
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError>;

    fn read_asset(&self, data: &mut TransactionData, r: &mut ByteReader<'_>)
        -> Result<(), CodecError>;

    /// Type-specific schema rules, run after the common ones.
    fn validate(&self, _data: &TransactionData, _ctx: &SchemaContext<'_>) -> Result<(), CodecError> {
        Ok(())
    }
}

/// The core kinds, one entry per structure.
pub fn core_kinds() -> Vec<Arc<dyn TransactionKind>> {
    vec![
        Arc::new(TransferKind),
        Arc::new(SecondSignatureKind),
        Arc::new(DelegateRegistrationKind),
        Arc::new(VoteKind),
        Arc::new(LegacyMultiSignatureKind),
        Arc::new(MultiSignatureKind),
        Arc::new(IpfsKind),
        Arc::new(MultiPaymentKind),
        Arc::new(DelegateResignationKind),
        Arc::new(HtlcLockKind),
        Arc::new(HtlcClaimKind),
        Arc::new(HtlcRefundKind),
    ]
}

// ── Shared field codecs ────────────────────────────────────────────────

pub(crate) fn write_amount(w: &mut ByteWriter, amount: &BigNumber) -> Result<(), CodecError> {
    w.write_u64(amount.to_u64()?);
    Ok(())
}

pub(crate) fn read_amount(r: &mut ByteReader<'_>) -> Result<BigNumber, CodecError> {
    Ok(BigNumber::from(r.read_u64()?))
}

pub(crate) fn write_address(w: &mut ByteWriter, address: &Address) -> Result<(), CodecError> {
    w.write_bytes(&decode_address(address)?);
    Ok(())
}

pub(crate) fn read_address(r: &mut ByteReader<'_>) -> Result<Address, CodecError> {
    Ok(encode_address(&r.read_array()?))
}

pub(crate) fn missing_asset(key: &str) -> CodecError {
    CodecError::schema(format!("{key} transaction requires an asset"))
}
