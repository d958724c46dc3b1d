//! Delegate resignation.

use crate::context::HandlerContext;
use crate::events::{EventDispatcher, TransactionEvent};
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{sender_has_pending, PoolError, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_state::{Wallet, WalletAttribute, WalletRepository};
use dpos_transactions::kinds::DelegateResignationKind;
use dpos_transactions::{CoreType, Transaction, TransactionKind, TypeKey};
use dpos_types::PublicKey;
use std::sync::Arc;

pub struct DelegateResignationHandler;

fn set_resigned(
    sender: &PublicKey,
    wallets: &mut WalletRepository,
    resigned: bool,
) -> Result<(), TransactionError> {
    let wallet = wallets.find_by_public_key(sender);
    let delegate = wallet
        .delegate_mut()
        .ok_or(TransactionError::WalletNotADelegate)?;
    delegate.resigned = resigned;
    let address = wallet.address.clone();
    wallets.reindex(&address);
    Ok(())
}

impl TransactionHandler for DelegateResignationHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::DelegateResignation, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(DelegateResignationKind)
    }

    fn dependencies(&self) -> Vec<TypeKey> {
        vec![TypeKey::core(CoreType::DelegateRegistration, 2)]
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[WalletAttribute::DelegateResigned]
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        HandlerVersion::V2.is_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for row in generic::history_of(ctx, CoreType::DelegateResignation)? {
            set_resigned(&row.data.sender_public_key, wallets, true)?;
        }
        Ok(())
    }

    fn check_type_rules(
        &self,
        _tx: &Transaction,
        sender: &Wallet,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let delegate = sender
            .delegate()
            .ok_or(TransactionError::WalletNotADelegate)?;
        if delegate.resigned {
            return Err(TransactionError::WalletAlreadyResigned);
        }

        let active = wallets
            .all_by_username()
            .filter(|wallet| !wallet.is_resigned_delegate())
            .count();
        let required = ctx.milestone().active_delegates as usize;
        if active.saturating_sub(1) < required {
            return Err(TransactionError::NotEnoughDelegates);
        }
        Ok(())
    }

    fn throw_if_cannot_enter_pool(
        &self,
        tx: &Transaction,
        pool: &dyn PoolQuery,
        _wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        if sender_has_pending(pool, tx) {
            return Err(PoolError::pending_of_type(tx));
        }
        Ok(())
    }

    fn emit_events(&self, tx: &Transaction, wallets: &WalletRepository, events: &dyn EventDispatcher) {
        let Some(wallet) = wallets.get_by_public_key(tx.sender_public_key()) else {
            return;
        };
        if let Some(delegate) = wallet.delegate() {
            events.dispatch(TransactionEvent::DelegateResigned {
                address: wallet.address.clone(),
                username: delegate.username.clone(),
            });
        }
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        set_resigned(tx.sender_public_key(), wallets, true)
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        generic::revert_for_sender(tx, wallets)?;
        set_resigned(tx.sender_public_key(), wallets, false)
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
