//! Payments to several recipients in one transaction.

use crate::context::HandlerContext;
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{PoolError, PoolErrorCode, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_crypto::validate_address;
use dpos_state::{Wallet, WalletRepository};
use dpos_transactions::kinds::MultiPaymentKind;
use dpos_transactions::{CoreType, Payment, Transaction, TransactionKind, TypeKey};
use dpos_types::BigNumber;
use std::sync::Arc;

/// One sender paying many recipients in a single transaction.
pub struct MultiPaymentHandler;

fn payments(tx: &Transaction) -> Result<&[Payment], TransactionError> {
    match tx.data.payments() {
        [] => Err(TransactionError::MissingAsset("payments")),
        payments => Ok(payments),
    }
}

fn total(payments: &[Payment]) -> BigNumber {
    payments.iter().map(|payment| &payment.amount).sum()
}

impl TransactionHandler for MultiPaymentHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::MultiPayment, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(MultiPaymentKind)
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        HandlerVersion::V2.is_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for row in generic::history_of(ctx, CoreType::MultiPayment)? {
            for payment in row.data.payments() {
                wallets
                    .find_by_address(&payment.recipient_id)
                    .increase_balance(&payment.amount);
                wallets
                    .find_by_public_key(&row.data.sender_public_key)
                    .decrease_balance(&payment.amount);
            }
        }
        Ok(())
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        sender: &Wallet,
        _wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let spent = total(payments(tx)?) + tx.data.fee.clone();
        generic::throw_if_insufficient_balance(tx, sender, &spent, ctx)
    }

    fn throw_if_cannot_enter_pool(
        &self,
        tx: &Transaction,
        _pool: &dyn PoolQuery,
        _wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        let network = ctx.config.pub_key_hash();
        match tx
            .data
            .payments()
            .iter()
            .find(|payment| !validate_address(&payment.recipient_id, network))
        {
            Some(payment) => Err(PoolError::new(
                PoolErrorCode::InvalidRecipient,
                format!(
                    "Recipient {} is not on the same network: {network}",
                    payment.recipient_id
                ),
            )),
            None => Ok(()),
        }
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let total = total(payments(tx)?);
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        wallets
            .find_by_public_key(tx.sender_public_key())
            .decrease_balance(&total);
        Ok(())
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let total = total(payments(tx)?);
        generic::revert_for_sender(tx, wallets)?;
        wallets
            .find_by_public_key(tx.sender_public_key())
            .increase_balance(&total);
        Ok(())
    }

    fn apply_to_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for payment in payments(tx)? {
            wallets
                .find_by_address(&payment.recipient_id)
                .increase_balance(&payment.amount);
        }
        Ok(())
    }

    fn revert_for_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for payment in payments(tx)? {
            wallets
                .find_by_address(&payment.recipient_id)
                .decrease_balance(&payment.amount);
        }
        Ok(())
    }
}
