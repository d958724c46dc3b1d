//! Transaction history queries.

use crate::StoreError;
use dpos_transactions::{TransactionData, TypeGroup};
use dpos_types::{Address, BigNumber, PublicKey, TransactionId};
use serde::{Deserialize, Serialize};

/// A confirmed transaction together with the block it was forged in.
///
/// Version 2 transactions carry no timestamp of their own; `timestamp` is the
/// block timestamp for them and the transaction timestamp for version 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub data: TransactionData,
    pub block_height: u32,
    pub timestamp: u32,
}

impl TransactionRow {
    pub fn id(&self) -> Option<&TransactionId> {
        self.data.id.as_ref()
    }
}

/// Everything one sender has spent, summed over all its transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentTransactions {
    pub sender_public_key: PublicKey,
    pub amount: BigNumber,
    pub fee: BigNumber,
    /// Nonce of the sender's latest transaction; the transaction count for
    /// senders that only ever used version 1.
    pub nonce: BigNumber,
}

/// Transfer amounts received by one address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedTransactions {
    pub recipient_id: Address,
    pub amount: BigNumber,
}

/// Lock amounts claimed by one recipient, net of claim fees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimedLockBalance {
    pub recipient_id: Address,
    pub claimed_balance: BigNumber,
}

/// Lock amounts refunded to one lock sender, net of refund fees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundedLockBalance {
    pub sender_public_key: PublicKey,
    pub refunded_balance: BigNumber,
}

/// Read access to confirmed transactions.
pub trait TransactionRepository: Send + Sync {
    /// Transactions of one type in every version, in chain order.
    fn find_by_type(
        &self,
        type_group: TypeGroup,
        type_id: u16,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TransactionRow>, StoreError>;

    /// Transactions with the given ids. Unknown ids are left out.
    fn find_by_ids(&self, ids: &[TransactionId]) -> Result<Vec<TransactionRow>, StoreError>;

    /// Lock transactions that were neither claimed nor refunded.
    fn get_open_htlc_locks(&self) -> Result<Vec<TransactionRow>, StoreError>;

    fn get_claimed_htlc_lock_balances(&self) -> Result<Vec<ClaimedLockBalance>, StoreError>;

    fn get_refunded_htlc_lock_balances(&self) -> Result<Vec<RefundedLockBalance>, StoreError>;

    fn get_sent_transactions(&self) -> Result<Vec<SentTransactions>, StoreError>;

    fn get_received_transactions(&self) -> Result<Vec<ReceivedTransactions>, StoreError>;
}
