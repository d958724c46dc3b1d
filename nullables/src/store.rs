//! Nullable stores: in-memory confirmed history for testing.
//!
//! Rows are kept in the order they were pushed, which stands in for chain
//! order. The aggregate queries are computed on every call.

use dpos_blocks::BlockData;
use dpos_store::{
    BlockRepository, BlockRewards, ClaimedLockBalance, ForgedBlocks, LastForgedBlock,
    ReceivedTransactions, RefundedLockBalance, SentTransactions, StoreError, TransactionRepository,
    TransactionRow,
};
use dpos_transactions::{CoreType, TransactionData, TypeGroup};
use dpos_types::{Address, BigNumber, PublicKey, TransactionId};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Backend("null store lock poisoned".to_string())
}

// ── Transactions ─────────────────────────────────────────────────────────

#[derive(Default)]
pub struct NullTransactionStore {
    rows: Mutex<Vec<TransactionRow>>,
}

impl NullTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, row: TransactionRow) {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
    }

    /// Record `data` as forged at `block_height`, timestamped `timestamp`.
    pub fn confirm(&self, data: TransactionData, block_height: u32, timestamp: u32) {
        self.push(TransactionRow {
            data,
            block_height,
            timestamp,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> Result<MutexGuard<'_, Vec<TransactionRow>>, StoreError> {
        self.rows.lock().map_err(poisoned)
    }

    /// Lock ids referenced by a confirmed claim or refund, mapped to the closing row.
    fn closings(rows: &[TransactionRow], core: CoreType) -> Vec<(&TransactionId, &TransactionRow)> {
        rows.iter()
            .filter(|row| row.data.is_core(core))
            .filter_map(|row| {
                let lock_id = match core {
                    CoreType::HtlcClaim => row.data.claim().map(|c| &c.lock_transaction_id),
                    CoreType::HtlcRefund => row.data.refund().map(|r| &r.lock_transaction_id),
                    _ => None,
                }?;
                Some((lock_id, row))
            })
            .collect()
    }

    fn find_lock<'r>(rows: &'r [TransactionRow], id: &TransactionId) -> Option<&'r TransactionRow> {
        rows.iter()
            .find(|row| row.data.is_core(CoreType::HtlcLock) && row.id() == Some(id))
    }
}

impl TransactionRepository for NullTransactionStore {
    fn find_by_type(
        &self,
        type_group: TypeGroup,
        type_id: u16,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TransactionRow>, StoreError> {
        Ok(self
            .rows()?
            .iter()
            .filter(|row| row.data.type_group == type_group && row.data.type_id == type_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn find_by_ids(&self, ids: &[TransactionId]) -> Result<Vec<TransactionRow>, StoreError> {
        Ok(self
            .rows()?
            .iter()
            .filter(|row| row.id().is_some_and(|id| ids.contains(id)))
            .cloned()
            .collect())
    }

    fn get_open_htlc_locks(&self) -> Result<Vec<TransactionRow>, StoreError> {
        let rows = self.rows()?;
        let closed: HashSet<&TransactionId> = Self::closings(&rows, CoreType::HtlcClaim)
            .into_iter()
            .chain(Self::closings(&rows, CoreType::HtlcRefund))
            .map(|(lock_id, _)| lock_id)
            .collect();
        Ok(rows
            .iter()
            .filter(|row| row.data.is_core(CoreType::HtlcLock))
            .filter(|row| !row.id().is_some_and(|id| closed.contains(id)))
            .cloned()
            .collect())
    }

    fn get_claimed_htlc_lock_balances(&self) -> Result<Vec<ClaimedLockBalance>, StoreError> {
        let rows = self.rows()?;
        let mut totals: BTreeMap<Address, BigNumber> = BTreeMap::new();
        for (lock_id, claim) in Self::closings(&rows, CoreType::HtlcClaim) {
            let Some(lock) = Self::find_lock(&rows, lock_id) else {
                continue;
            };
            let Some(recipient) = lock.data.recipient_id.clone() else {
                continue;
            };
            *totals.entry(recipient).or_default() += &(&lock.data.amount - &claim.data.fee);
        }
        Ok(totals
            .into_iter()
            .map(|(recipient_id, claimed_balance)| ClaimedLockBalance {
                recipient_id,
                claimed_balance,
            })
            .collect())
    }

    fn get_refunded_htlc_lock_balances(&self) -> Result<Vec<RefundedLockBalance>, StoreError> {
        let rows = self.rows()?;
        let mut totals: BTreeMap<PublicKey, BigNumber> = BTreeMap::new();
        for (lock_id, refund) in Self::closings(&rows, CoreType::HtlcRefund) {
            let Some(lock) = Self::find_lock(&rows, lock_id) else {
                continue;
            };
            *totals.entry(lock.data.sender_public_key).or_default() +=
                &(&lock.data.amount - &refund.data.fee);
        }
        Ok(totals
            .into_iter()
            .map(|(sender_public_key, refunded_balance)| RefundedLockBalance {
                sender_public_key,
                refunded_balance,
            })
            .collect())
    }

    fn get_sent_transactions(&self) -> Result<Vec<SentTransactions>, StoreError> {
        #[derive(Default)]
        struct Totals {
            amount: BigNumber,
            fee: BigNumber,
            max_nonce: Option<BigNumber>,
            count: u64,
        }

        let rows = self.rows()?;
        let mut totals: BTreeMap<PublicKey, Totals> = BTreeMap::new();
        for row in rows.iter() {
            let entry = totals.entry(row.data.sender_public_key).or_default();
            entry.amount += &row.data.amount;
            entry.fee += &row.data.fee;
            entry.count += 1;
            if let Some(nonce) = &row.data.nonce {
                if entry.max_nonce.as_ref().is_none_or(|max| nonce > max) {
                    entry.max_nonce = Some(nonce.clone());
                }
            }
        }
        Ok(totals
            .into_iter()
            .map(|(sender_public_key, t)| SentTransactions {
                sender_public_key,
                amount: t.amount,
                fee: t.fee,
                nonce: t.max_nonce.unwrap_or_else(|| BigNumber::from(t.count)),
            })
            .collect())
    }

    fn get_received_transactions(&self) -> Result<Vec<ReceivedTransactions>, StoreError> {
        let rows = self.rows()?;
        let mut totals: BTreeMap<Address, BigNumber> = BTreeMap::new();
        for row in rows.iter().filter(|row| row.data.is_core(CoreType::Transfer)) {
            let Some(recipient) = row.data.recipient_id.clone() else {
                continue;
            };
            *totals.entry(recipient).or_default() += &row.data.amount;
        }
        Ok(totals
            .into_iter()
            .map(|(recipient_id, amount)| ReceivedTransactions {
                recipient_id,
                amount,
            })
            .collect())
    }
}

// ── Blocks ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct NullBlockStore {
    blocks: Mutex<Vec<BlockData>>,
}

impl NullBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, block: BlockData) {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(block);
    }

    fn blocks(&self) -> Result<MutexGuard<'_, Vec<BlockData>>, StoreError> {
        self.blocks.lock().map_err(poisoned)
    }
}

impl BlockRepository for NullBlockStore {
    fn get_block_rewards(&self) -> Result<Vec<BlockRewards>, StoreError> {
        let mut totals: BTreeMap<PublicKey, BigNumber> = BTreeMap::new();
        for block in self.blocks()?.iter() {
            *totals.entry(block.generator_public_key).or_default() +=
                &(&block.reward + &block.total_fee);
        }
        Ok(totals
            .into_iter()
            .map(|(generator_public_key, rewards)| BlockRewards {
                generator_public_key,
                rewards,
            })
            .collect())
    }

    fn get_delegates_forged_blocks(&self) -> Result<Vec<ForgedBlocks>, StoreError> {
        let mut totals: BTreeMap<PublicKey, ForgedBlocks> = BTreeMap::new();
        for block in self.blocks()?.iter() {
            let entry = totals
                .entry(block.generator_public_key)
                .or_insert_with(|| ForgedBlocks {
                    generator_public_key: block.generator_public_key,
                    total_fees: BigNumber::zero(),
                    total_rewards: BigNumber::zero(),
                    total_produced: 0,
                });
            entry.total_fees += &block.total_fee;
            entry.total_rewards += &block.reward;
            entry.total_produced += 1;
        }
        Ok(totals.into_values().collect())
    }

    fn get_last_forged_blocks(&self) -> Result<Vec<LastForgedBlock>, StoreError> {
        let mut last: BTreeMap<PublicKey, LastForgedBlock> = BTreeMap::new();
        for block in self.blocks()?.iter() {
            let Some(id) = block.id.clone() else {
                continue;
            };
            let newer = last
                .get(&block.generator_public_key)
                .is_none_or(|seen| block.height > seen.height);
            if newer {
                last.insert(
                    block.generator_public_key,
                    LastForgedBlock {
                        generator_public_key: block.generator_public_key,
                        id,
                        height: block.height,
                        timestamp: block.timestamp,
                    },
                );
            }
        }
        Ok(last.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_transactions::{Asset, HtlcClaimAsset, HtlcExpiration, HtlcExpirationType, HtlcLockAsset};
    use dpos_types::Bytes32;

    fn key(byte: u8) -> PublicKey {
        let mut bytes = [byte; 33];
        bytes[0] = 0x02;
        PublicKey(bytes)
    }

    fn transfer(sender: u8, nonce: u64, amount: u64, recipient: &str) -> TransactionData {
        let mut data = TransactionData::new(TypeGroup::CORE, CoreType::Transfer.as_u16(), 2, key(sender));
        data.nonce = Some(BigNumber::from(nonce));
        data.amount = BigNumber::from(amount);
        data.fee = BigNumber::from(10u64);
        data.recipient_id = Some(Address::new(recipient));
        data.id = Some(TransactionId::new([sender.wrapping_add(nonce as u8); 32]));
        data
    }

    #[test]
    fn sent_totals_take_the_highest_nonce() {
        let store = NullTransactionStore::new();
        store.confirm(transfer(1, 1, 100, "DA"), 2, 0);
        store.confirm(transfer(1, 2, 50, "DB"), 3, 0);
        store.confirm(transfer(2, 1, 7, "DA"), 3, 0);

        let sent = store.get_sent_transactions().unwrap();
        let first = sent.iter().find(|s| s.sender_public_key == key(1)).unwrap();
        assert_eq!(first.amount, BigNumber::from(150u64));
        assert_eq!(first.fee, BigNumber::from(20u64));
        assert_eq!(first.nonce, BigNumber::from(2u64));

        let received = store.get_received_transactions().unwrap();
        let da = received.iter().find(|r| r.recipient_id.as_str() == "DA").unwrap();
        assert_eq!(da.amount, BigNumber::from(107u64));
    }

    #[test]
    fn find_by_type_pages() {
        let store = NullTransactionStore::new();
        for nonce in 1..=5 {
            store.confirm(transfer(1, nonce, 1, "DA"), 2, 0);
        }
        let page = store
            .find_by_type(TypeGroup::CORE, CoreType::Transfer.as_u16(), 2, 3)
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].data.nonce, Some(BigNumber::from(4u64)));
        assert!(store.find_by_type(TypeGroup::CORE, 7, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn claimed_locks_are_no_longer_open() {
        let store = NullTransactionStore::new();
        let lock_id = TransactionId::new([9; 32]);
        let mut lock = TransactionData::new(TypeGroup::CORE, CoreType::HtlcLock.as_u16(), 2, key(1));
        lock.id = Some(lock_id);
        lock.amount = BigNumber::from(1_000u64);
        lock.recipient_id = Some(Address::new("DR"));
        lock.asset = Some(Asset::Lock(HtlcLockAsset {
            secret_hash: Bytes32([1; 32]),
            expiration: HtlcExpiration {
                expiration_type: HtlcExpirationType::BlockHeight,
                value: 100,
            },
        }));
        store.confirm(lock, 5, 40);
        assert_eq!(store.get_open_htlc_locks().unwrap().len(), 1);

        let mut claim = TransactionData::new(TypeGroup::CORE, CoreType::HtlcClaim.as_u16(), 2, key(2));
        claim.id = Some(TransactionId::new([10; 32]));
        claim.fee = BigNumber::from(0u64);
        claim.asset = Some(Asset::Claim(HtlcClaimAsset {
            lock_transaction_id: lock_id,
            unlock_secret: Bytes32([2; 32]),
        }));
        store.confirm(claim, 6, 48);

        assert!(store.get_open_htlc_locks().unwrap().is_empty());
        let claimed = store.get_claimed_htlc_lock_balances().unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].claimed_balance, BigNumber::from(1_000u64));
        assert!(store.get_refunded_htlc_lock_balances().unwrap().is_empty());
    }
}
