//! The handler contract.

use crate::context::HandlerContext;
use crate::events::EventDispatcher;
use crate::generic;
use crate::pool::{PoolError, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_state::{Wallet, WalletAttribute, WalletRepository};
use dpos_transactions::{Transaction, TransactionKind, TypeKey};
use dpos_types::BigNumber;
use std::sync::Arc;

/// Which generation of a core type a handler serves.
///
/// `V1` handles legacy transactions without nonces and is active until AIP11
/// replaces it; `V2` handles nonce based transactions and needs AIP11.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerVersion {
    V1,
    V2,
}

impl HandlerVersion {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
        }
    }

    /// Whether this generation may run under `milestone`.
    pub fn is_active(self, milestone: &Milestone) -> bool {
        match self {
            Self::V1 => true,
            Self::V2 => milestone.aip11,
        }
    }
}

/// Validation and state transition logic for one transaction structure.
///
/// `apply` and `revert` are exact inverses on wallet state: applying a
/// transaction and reverting it leaves every wallet as it was.
pub trait TransactionHandler: Send + Sync {
    fn type_key(&self) -> TypeKey;

    /// Wire layout of the transactions this handler serves.
    fn descriptor(&self) -> Arc<dyn TransactionKind>;

    /// Handlers that must be registered (and bootstrapped) before this one.
    fn dependencies(&self) -> Vec<TypeKey> {
        Vec::new()
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[]
    }

    fn is_activated(&self, milestone: &Milestone) -> bool;

    /// Rebuild this handler's share of wallet state from confirmed history.
    fn bootstrap(
        &self,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }

    /// Whether `tx` may be applied with `sender` as its sending wallet.
    ///
    /// Exceptions pass unconditionally. Otherwise the type-specific rules of
    /// [`Self::check_type_rules`] run first, then the cold wallet rule and
    /// the generic wallet checks.
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
        generic::throw_if_cold_wallet(tx, sender, wallets, ctx)?;
        generic::perform_wallet_checks(tx, sender, wallets, ctx)
    }

    fn check_type_rules(
        &self,
        _tx: &Transaction,
        _sender: &Wallet,
        _wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }

    /// Reject `tx` from the pool when it conflicts with what is already waiting.
    fn throw_if_cannot_enter_pool(
        &self,
        _tx: &Transaction,
        _pool: &dyn PoolQuery,
        _wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        Ok(())
    }

    fn can_enter_pool(
        &self,
        tx: &Transaction,
        pool: &dyn PoolQuery,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> bool {
        self.throw_if_cannot_enter_pool(tx, pool, wallets, ctx).is_ok()
    }

    /// Signature check against the sender's registered keys.
    fn verify(
        &self,
        tx: &Transaction,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<bool, TransactionError> {
        generic::verify(tx, wallets, ctx)
    }

    /// Minimum fee at `satoshi_per_byte` for the serialized size plus `addon_bytes`.
    fn dynamic_fee(&self, tx: &Transaction, addon_bytes: u64, satoshi_per_byte: u64) -> BigNumber {
        let size = addon_bytes + tx.serialized.len() as u64;
        BigNumber::from(size) * BigNumber::from(satoshi_per_byte)
    }

    fn emit_events(
        &self,
        _tx: &Transaction,
        _wallets: &WalletRepository,
        _events: &dyn EventDispatcher,
    ) {
    }

    fn apply(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        self.apply_to_sender(tx, wallets, ctx)?;
        self.apply_to_recipient(tx, wallets, ctx)
    }

    fn revert(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        self.revert_for_sender(tx, wallets, ctx)?;
        self.revert_for_recipient(tx, wallets, ctx)
    }

    /// Check `tx`, advance the sender nonce and debit amount plus fee.
    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        generic::apply_to_sender(self, tx, wallets, ctx)
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        generic::revert_for_sender(tx, wallets)
    }

    fn apply_to_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError>;

    fn revert_for_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError>;
}
