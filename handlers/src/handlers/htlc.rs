//! Hashed time-locked transfers.
//!
//! A lock moves `amount` out of the sender's spendable balance into a lock
//! record keyed by the lock transaction id. Before it expires the recipient
//! can claim it by revealing the secret; after it expires the sender can take
//! it back. Either way the lock amount less the closing fee is credited.

use crate::context::{HandlerContext, LastBlock};
use crate::events::{EventDispatcher, TransactionEvent};
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{PoolError, PoolErrorCode, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_crypto::sha256;
use dpos_state::{HtlcLock, Wallet, WalletAttribute, WalletRepository};
use dpos_store::TransactionRow;
use dpos_transactions::kinds::{HtlcClaimKind, HtlcLockKind, HtlcRefundKind};
use dpos_transactions::{
    CoreType, HtlcExpiration, HtlcExpirationType, Transaction, TransactionData, TransactionKind,
    TypeKey,
};
use dpos_types::{Address, BigNumber, TransactionId};
use std::sync::Arc;

const ATTRIBUTES: &[WalletAttribute] = &[
    WalletAttribute::Htlc,
    WalletAttribute::HtlcLocks,
    WalletAttribute::HtlcLockedBalance,
];

fn htlc_active(milestone: &Milestone) -> bool {
    HandlerVersion::V2.is_active(milestone) && milestone.htlc_enabled
}

/// Whether a lock with `expiration` is already too close to the tip to be created.
fn expires_too_soon(expiration: &HtlcExpiration, last: LastBlock, milestone: &Milestone) -> bool {
    match expiration.expiration_type {
        HtlcExpirationType::EpochTimestamp => {
            let margin = milestone.blocktime.saturating_mul(milestone.active_delegates);
            expiration.value <= last.timestamp.saturating_add(margin)
        }
        HtlcExpirationType::BlockHeight => {
            expiration.value <= last.height.saturating_add(milestone.active_delegates)
        }
    }
}

fn is_expired(expiration: &HtlcExpiration, last: LastBlock) -> bool {
    match expiration.expiration_type {
        HtlcExpirationType::EpochTimestamp => expiration.value <= last.timestamp,
        HtlcExpirationType::BlockHeight => expiration.value <= last.height,
    }
}

/// The lock record a confirmed lock transaction created.
fn lock_record(data: &TransactionData, timestamp: u32) -> Result<HtlcLock, TransactionError> {
    let asset = data.lock().ok_or(TransactionError::MissingAsset("lock"))?;
    let recipient_id = data
        .recipient_id
        .clone()
        .ok_or(TransactionError::MissingAsset("recipient"))?;
    Ok(HtlcLock {
        amount: data.amount.clone(),
        recipient_id,
        secret_hash: asset.secret_hash,
        expiration: asset.expiration,
        vendor_field: data.vendor_field.clone(),
        timestamp,
    })
}

fn add_lock(wallet: &mut Wallet, id: TransactionId, lock: HtlcLock) {
    let htlc = wallet.attributes.htlc.get_or_insert_with(Default::default);
    htlc.locked_balance += &lock.amount;
    htlc.locks.insert(id, lock);
}

/// Drop the lock record and collapse the domain once nothing is locked.
fn remove_lock(wallet: &mut Wallet, id: &TransactionId) -> Option<HtlcLock> {
    let htlc = wallet.attributes.htlc.as_mut()?;
    let lock = htlc.locks.remove(id)?;
    htlc.locked_balance -= &lock.amount;
    if htlc.locks.is_empty() && htlc.locked_balance.is_zero() {
        wallet.attributes.htlc = None;
    }
    Some(lock)
}

/// The wallet holding open lock `id`, and the lock itself.
fn open_lock(
    wallets: &WalletRepository,
    id: &TransactionId,
) -> Result<(Address, HtlcLock), TransactionError> {
    let wallet = wallets
        .find_by_lock(id)
        .ok_or(TransactionError::HtlcLockTransactionNotFound)?;
    let lock = wallet
        .htlc()
        .and_then(|htlc| htlc.locks.get(id))
        .ok_or(TransactionError::HtlcLockTransactionNotFound)?;
    Ok((wallet.address.clone(), lock.clone()))
}

/// The confirmed lock transaction, for reinstating its lock on revert.
fn lock_transaction(ctx: &HandlerContext<'_>, id: &TransactionId) -> Result<TransactionRow, TransactionError> {
    ctx.transactions
        .find_by_ids(&[*id])?
        .into_iter()
        .find(|row| row.id() == Some(id))
        .ok_or(TransactionError::HtlcLockTransactionNotFound)
}

/// Time a lock is recorded at: its block, then its own timestamp, then the
/// current tip. Apply and reinstatement both go through here.
fn lock_timestamp(block_timestamp: Option<u32>, data: &TransactionData, ctx: &HandlerContext<'_>) -> u32 {
    block_timestamp
        .or(data.timestamp)
        .unwrap_or(ctx.last_block.timestamp)
}

fn reinstate(
    wallets: &mut WalletRepository,
    id: TransactionId,
    row: &TransactionRow,
    ctx: &HandlerContext<'_>,
) -> Result<(), TransactionError> {
    let lock = lock_record(&row.data, lock_timestamp(Some(row.timestamp), &row.data, ctx))?;
    let wallet = wallets.find_by_public_key(&row.data.sender_public_key);
    add_lock(wallet, id, lock);
    let address = wallet.address.clone();
    wallets.reindex(&address);
    Ok(())
}

fn close_lock(wallets: &mut WalletRepository, holder: &Address, id: &TransactionId) {
    if let Some(wallet) = wallets.get_by_address_mut(holder) {
        remove_lock(wallet, id);
    }
    wallets.reindex(holder);
}

fn lock_not_found(id: &TransactionId) -> PoolError {
    PoolError::new(
        PoolErrorCode::HtlcLockNotFound,
        format!("The associated lock transaction id \"{id}\" was not found"),
    )
}

fn no_dynamic_fee() -> BigNumber {
    BigNumber::zero()
}

// ── Lock ─────────────────────────────────────────────────────────────────

pub struct HtlcLockHandler;

impl TransactionHandler for HtlcLockHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::HtlcLock, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(HtlcLockKind)
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        ATTRIBUTES
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        htlc_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for row in ctx.transactions.get_open_htlc_locks()? {
            let Some(id) = row.id().copied() else {
                tracing::warn!(sender = %row.data.sender_public_key, "open lock without an id skipped");
                continue;
            };
            reinstate(wallets, id, &row, ctx)?;
        }
        Ok(())
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        _sender: &Wallet,
        _wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let asset = tx.data.lock().ok_or(TransactionError::MissingAsset("lock"))?;
        if expires_too_soon(&asset.expiration, ctx.last_block, ctx.milestone()) {
            return Err(TransactionError::HtlcLockExpired);
        }
        Ok(())
    }

    fn emit_events(&self, tx: &Transaction, _wallets: &WalletRepository, events: &dyn EventDispatcher) {
        if let Some(recipient) = &tx.data.recipient_id {
            events.dispatch(TransactionEvent::HtlcLocked {
                lock_id: tx.id,
                sender: *tx.sender_public_key(),
                recipient: recipient.clone(),
                amount: tx.data.amount.clone(),
            });
        }
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let lock = lock_record(&tx.data, lock_timestamp(tx.block_timestamp, &tx.data, ctx))?;
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        let sender = wallets.find_by_public_key(tx.sender_public_key());
        add_lock(sender, tx.id, lock);
        let address = sender.address.clone();
        wallets.reindex(&address);
        Ok(())
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        generic::revert_for_sender(tx, wallets)?;
        let address = wallets.address_of(tx.sender_public_key());
        close_lock(wallets, &address, &tx.id);
        Ok(())
    }

    fn apply_to_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }

    fn revert_for_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }
}

// ── Claim ────────────────────────────────────────────────────────────────

pub struct HtlcClaimHandler;

fn claimed_lock_id(tx: &Transaction) -> Result<TransactionId, TransactionError> {
    tx.data
        .claim()
        .map(|claim| claim.lock_transaction_id)
        .ok_or(TransactionError::MissingAsset("claim"))
}

impl TransactionHandler for HtlcClaimHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::HtlcClaim, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(HtlcClaimKind)
    }

    fn dependencies(&self) -> Vec<TypeKey> {
        vec![TypeKey::core(CoreType::HtlcLock, 2)]
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        ATTRIBUTES
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        htlc_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for claimed in ctx.transactions.get_claimed_htlc_lock_balances()? {
            wallets
                .find_by_address(&claimed.recipient_id)
                .increase_balance(&claimed.claimed_balance);
        }
        Ok(())
    }

    /// Claims are free and usually sent by a wallet that holds nothing yet,
    /// so the cold wallet rule does not apply.
    fn throw_if_cannot_be_applied(
        &self,
        tx: &Transaction,
        sender: &Wallet,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        if ctx.is_exception(tx) {
            return Ok(());
        }
        self.check_type_rules(tx, sender, wallets, ctx)?;
        generic::perform_wallet_checks(tx, sender, wallets, ctx)
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        _sender: &Wallet,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let claim = tx.data.claim().ok_or(TransactionError::MissingAsset("claim"))?;
        let (_, lock) = open_lock(wallets, &claim.lock_transaction_id)?;
        if is_expired(&lock.expiration, ctx.last_block) {
            return Err(TransactionError::HtlcLockExpired);
        }
        if sha256(claim.unlock_secret.as_bytes()) != lock.secret_hash.0 {
            return Err(TransactionError::HtlcSecretHashMismatch);
        }
        Ok(())
    }

    fn throw_if_cannot_enter_pool(
        &self,
        tx: &Transaction,
        pool: &dyn PoolQuery,
        wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        let Some(claim) = tx.data.claim() else {
            return Ok(());
        };
        let lock_id = claim.lock_transaction_id;
        if open_lock(wallets, &lock_id).is_err() {
            return Err(lock_not_found(&lock_id));
        }
        let pending = pool.all_of_kind(tx).any(|other| {
            other.id != tx.id
                && other.data.claim().map(|c| c.lock_transaction_id) == Some(lock_id)
        });
        if pending {
            return Err(PoolError::new(
                PoolErrorCode::Pending,
                format!("HtlcClaim for \"{lock_id}\" already in the pool"),
            ));
        }
        Ok(())
    }

    fn dynamic_fee(&self, _tx: &Transaction, _addon_bytes: u64, _satoshi_per_byte: u64) -> BigNumber {
        no_dynamic_fee()
    }

    fn emit_events(&self, tx: &Transaction, _wallets: &WalletRepository, events: &dyn EventDispatcher) {
        if let Ok(lock_id) = claimed_lock_id(tx) {
            events.dispatch(TransactionEvent::HtlcClaimed {
                lock_id,
                claimer: *tx.sender_public_key(),
            });
        }
    }

    /// Credits the lock recipient with the lock amount less the claim fee.
    /// The claiming sender only advances its nonce.
    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let lock_id = claimed_lock_id(tx)?;
        let (holder, lock) = open_lock(wallets, &lock_id)?;
        generic::advance_sender(self, tx, wallets, ctx)?;

        let recipient = wallets.find_by_address(&lock.recipient_id);
        recipient.increase_balance(&(&lock.amount - &tx.data.fee));
        let recipient = recipient.address.clone();

        close_lock(wallets, &holder, &lock_id);
        wallets.reindex(&recipient);
        Ok(())
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let lock_id = claimed_lock_id(tx)?;
        let row = lock_transaction(ctx, &lock_id)?;
        let recipient = row
            .data
            .recipient_id
            .as_ref()
            .ok_or(TransactionError::MissingAsset("recipient"))?;
        generic::rewind_sender(tx, wallets)?;

        wallets
            .find_by_address(recipient)
            .decrease_balance(&(&row.data.amount - &tx.data.fee));
        reinstate(wallets, lock_id, &row, ctx)?;
        wallets.reindex(recipient);
        Ok(())
    }

    fn apply_to_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }

    fn revert_for_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }
}

// ── Refund ───────────────────────────────────────────────────────────────

pub struct HtlcRefundHandler;

fn refunded_lock_id(tx: &Transaction) -> Result<TransactionId, TransactionError> {
    tx.data
        .refund()
        .map(|refund| refund.lock_transaction_id)
        .ok_or(TransactionError::MissingAsset("refund"))
}

impl TransactionHandler for HtlcRefundHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::HtlcRefund, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(HtlcRefundKind)
    }

    fn dependencies(&self) -> Vec<TypeKey> {
        vec![TypeKey::core(CoreType::HtlcLock, 2)]
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        ATTRIBUTES
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        htlc_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for refunded in ctx.transactions.get_refunded_htlc_lock_balances()? {
            wallets
                .find_by_public_key(&refunded.sender_public_key)
                .increase_balance(&refunded.refunded_balance);
        }
        Ok(())
    }

    fn throw_if_cannot_be_applied(
        &self,
        tx: &Transaction,
        sender: &Wallet,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        if ctx.is_exception(tx) {
            return Ok(());
        }
        self.check_type_rules(tx, sender, wallets, ctx)?;
        generic::perform_wallet_checks(tx, sender, wallets, ctx)
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        _sender: &Wallet,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let (_, lock) = open_lock(wallets, &refunded_lock_id(tx)?)?;
        if !is_expired(&lock.expiration, ctx.last_block) {
            return Err(TransactionError::HtlcLockNotExpired);
        }
        Ok(())
    }

    fn throw_if_cannot_enter_pool(
        &self,
        tx: &Transaction,
        pool: &dyn PoolQuery,
        wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        let Some(refund) = tx.data.refund() else {
            return Ok(());
        };
        let lock_id = refund.lock_transaction_id;
        if open_lock(wallets, &lock_id).is_err() {
            return Err(lock_not_found(&lock_id));
        }
        let pending = pool.all_of_kind(tx).any(|other| {
            other.id != tx.id
                && other.data.refund().map(|r| r.lock_transaction_id) == Some(lock_id)
        });
        if pending {
            return Err(PoolError::new(
                PoolErrorCode::Pending,
                format!("HtlcRefund for \"{lock_id}\" already in the pool"),
            ));
        }
        Ok(())
    }

    fn dynamic_fee(&self, _tx: &Transaction, _addon_bytes: u64, _satoshi_per_byte: u64) -> BigNumber {
        no_dynamic_fee()
    }

    fn emit_events(&self, tx: &Transaction, _wallets: &WalletRepository, events: &dyn EventDispatcher) {
        if let Ok(lock_id) = refunded_lock_id(tx) {
            events.dispatch(TransactionEvent::HtlcRefunded {
                lock_id,
                sender: *tx.sender_public_key(),
            });
        }
    }

    /// Returns the lock amount less the refund fee to the wallet that locked it.
    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let lock_id = refunded_lock_id(tx)?;
        let (holder, lock) = open_lock(wallets, &lock_id)?;
        generic::advance_sender(self, tx, wallets, ctx)?;

        wallets
            .find_by_address(&holder)
            .increase_balance(&(&lock.amount - &tx.data.fee));
        close_lock(wallets, &holder, &lock_id);
        Ok(())
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let lock_id = refunded_lock_id(tx)?;
        let row = lock_transaction(ctx, &lock_id)?;
        generic::rewind_sender(tx, wallets)?;

        wallets
            .find_by_public_key(&row.data.sender_public_key)
            .decrease_balance(&(&row.data.amount - &tx.data.fee));
        reinstate(wallets, lock_id, &row, ctx)
    }

    fn apply_to_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }

    fn revert_for_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone() -> Milestone {
        dpos_config::ConfigManager::devnet().milestone(2_000_000).clone()
    }

    #[test]
    fn lock_must_outlive_one_round() {
        let last = LastBlock { height: 100, timestamp: 1_000 };
        let m = milestone();
        let round = m.active_delegates;
        let by_height = |value| HtlcExpiration {
            expiration_type: HtlcExpirationType::BlockHeight,
            value,
        };
        assert!(expires_too_soon(&by_height(100 + round), last, &m));
        assert!(!expires_too_soon(&by_height(101 + round), last, &m));

        let seconds = m.blocktime * m.active_delegates;
        let by_time = |value| HtlcExpiration {
            expiration_type: HtlcExpirationType::EpochTimestamp,
            value,
        };
        assert!(expires_too_soon(&by_time(1_000 + seconds), last, &m));
        assert!(!expires_too_soon(&by_time(1_001 + seconds), last, &m));
    }

    #[test]
    fn expiry_is_inclusive() {
        let last = LastBlock { height: 50, timestamp: 400 };
        let at = |expiration_type, value| HtlcExpiration { expiration_type, value };
        assert!(is_expired(&at(HtlcExpirationType::BlockHeight, 50), last));
        assert!(!is_expired(&at(HtlcExpirationType::BlockHeight, 51), last));
        assert!(is_expired(&at(HtlcExpirationType::EpochTimestamp, 400), last));
        assert!(!is_expired(&at(HtlcExpirationType::EpochTimestamp, 401), last));
    }
}
