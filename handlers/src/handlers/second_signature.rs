use crate::context::HandlerContext;
use crate::events::{EventDispatcher, TransactionEvent};
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{sender_has_pending, PoolError, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_state::{Wallet, WalletAttribute, WalletRepository};
use dpos_transactions::kinds::SecondSignatureKind;
use dpos_transactions::{CoreType, Transaction, TransactionKind, TypeKey};
use dpos_types::PublicKey;
use std::sync::Arc;

pub struct SecondSignatureHandler {
    version: HandlerVersion,
}

impl SecondSignatureHandler {
    pub fn new(version: HandlerVersion) -> Self {
        Self { version }
    }
}

fn second_public_key(tx: &Transaction) -> Result<PublicKey, TransactionError> {
    tx.data
        .second_public_key_asset()
        .copied()
        .ok_or(TransactionError::MissingAsset("signature"))
}

impl TransactionHandler for SecondSignatureHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::SecondSignature, self.version.as_u8())
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(SecondSignatureKind)
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[WalletAttribute::SecondPublicKey]
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        self.version.is_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        if self.version != HandlerVersion::V1 {
            return Ok(());
        }
        for row in generic::history_of(ctx, CoreType::SecondSignature)? {
            let key = row
                .data
                .second_public_key_asset()
                .copied()
                .ok_or(TransactionError::MissingAsset("signature"))?;
            wallets
                .find_by_public_key(&row.data.sender_public_key)
                .attributes
                .second_public_key = Some(key);
        }
        Ok(())
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        sender: &Wallet,
        _wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        second_public_key(tx)?;
        if sender.has_second_signature() {
            return Err(TransactionError::SecondSignatureAlreadyRegistered);
        }
        if sender.has_multi_signature() {
            return Err(TransactionError::NotSupportedForMultiSignatureWallet);
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

    fn emit_events(&self, tx: &Transaction, _wallets: &WalletRepository, events: &dyn EventDispatcher) {
        events.dispatch(TransactionEvent::SecondSignatureRegistered {
            sender: *tx.sender_public_key(),
        });
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let key = second_public_key(tx)?;
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        wallets
            .find_by_public_key(tx.sender_public_key())
            .attributes
            .second_public_key = Some(key);
        Ok(())
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        generic::revert_for_sender(tx, wallets)?;
        wallets
            .find_by_public_key(tx.sender_public_key())
            .attributes
            .second_public_key = None;
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
