//! The core handlers.
//!
//! Types that exist in both generations get one struct parameterised by
//! [`HandlerVersion`]; the rules differ only where a generation says so.

mod delegate_registration;
mod delegate_resignation;
mod htlc;
mod ipfs;
mod multi_payment;
mod multi_signature;
mod second_signature;
mod transfer;
mod vote;

pub use delegate_registration::DelegateRegistrationHandler;
pub use delegate_resignation::DelegateResignationHandler;
pub use htlc::{HtlcClaimHandler, HtlcLockHandler, HtlcRefundHandler};
pub use ipfs::IpfsHandler;
pub use multi_payment::MultiPaymentHandler;
pub use multi_signature::{LegacyMultiSignatureHandler, MultiSignatureHandler};
pub use second_signature::SecondSignatureHandler;
pub use transfer::TransferHandler;
pub use vote::VoteHandler;

use crate::handler::{HandlerVersion, TransactionHandler};
use std::sync::Arc;

/// Every core handler, in registration order.
pub fn core_handlers() -> Vec<Arc<dyn TransactionHandler>> {
    use HandlerVersion::{V1, V2};
    vec![
        Arc::new(TransferHandler::new(V1)),
        Arc::new(SecondSignatureHandler::new(V1)),
        Arc::new(DelegateRegistrationHandler::new(V1)),
        Arc::new(VoteHandler::new(V1)),
        Arc::new(LegacyMultiSignatureHandler),
        Arc::new(TransferHandler::new(V2)),
        Arc::new(SecondSignatureHandler::new(V2)),
        Arc::new(DelegateRegistrationHandler::new(V2)),
        Arc::new(VoteHandler::new(V2)),
        Arc::new(MultiSignatureHandler),
        Arc::new(IpfsHandler),
        Arc::new(MultiPaymentHandler),
        Arc::new(DelegateResignationHandler),
        Arc::new(HtlcLockHandler),
        Arc::new(HtlcClaimHandler),
        Arc::new(HtlcRefundHandler),
    ]
}
