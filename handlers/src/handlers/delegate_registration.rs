use crate::context::HandlerContext;
use crate::events::{EventDispatcher, TransactionEvent};
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{sender_has_pending, PoolError, PoolErrorCode, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_state::{DelegateInfo, LastBlockInfo, Wallet, WalletAttribute, WalletRepository};
use dpos_transactions::kinds::DelegateRegistrationKind;
use dpos_transactions::{CoreType, Transaction, TransactionKind, TypeKey};
use std::sync::Arc;

pub struct DelegateRegistrationHandler {
    version: HandlerVersion,
}

impl DelegateRegistrationHandler {
    pub fn new(version: HandlerVersion) -> Self {
        Self { version }
    }
}

fn username(tx: &Transaction) -> Result<&str, TransactionError> {
    tx.data
        .username()
        .ok_or(TransactionError::MissingAsset("delegate"))
}

impl TransactionHandler for DelegateRegistrationHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::DelegateRegistration, self.version.as_u8())
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(DelegateRegistrationKind)
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[
            WalletAttribute::Delegate,
            WalletAttribute::DelegateUsername,
            WalletAttribute::DelegateVoteBalance,
            WalletAttribute::DelegateForgedFees,
            WalletAttribute::DelegateForgedRewards,
            WalletAttribute::DelegateProducedBlocks,
            WalletAttribute::DelegateRank,
            WalletAttribute::DelegateLastBlock,
        ]
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        self.version.is_active(milestone)
    }

    /// Replays registrations, then folds in what each delegate forged.
    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        if self.version != HandlerVersion::V1 {
            return Ok(());
        }

        let rows = generic::history_of(ctx, CoreType::DelegateRegistration)?;
        for row in &rows {
            let username = row
                .data
                .username()
                .ok_or(TransactionError::MissingAsset("delegate"))?;
            let wallet = wallets.find_by_public_key(&row.data.sender_public_key);
            wallet.attributes.delegate = Some(DelegateInfo::new(username));
            let address = wallet.address.clone();
            wallets.reindex(&address);
        }

        // Genesis wallets forge without being registered delegates.
        for forged in ctx.blocks.get_delegates_forged_blocks()? {
            let Some(delegate) = wallets
                .get_by_public_key_mut(&forged.generator_public_key)
                .and_then(Wallet::delegate_mut)
            else {
                continue;
            };
            delegate.forged_fees += &forged.total_fees;
            delegate.forged_rewards += &forged.total_rewards;
            delegate.produced_blocks += forged.total_produced;
        }

        for last in ctx.blocks.get_last_forged_blocks()? {
            let Some(delegate) = wallets
                .get_by_public_key_mut(&last.generator_public_key)
                .and_then(Wallet::delegate_mut)
            else {
                continue;
            };
            delegate.last_block = Some(LastBlockInfo {
                id: last.id,
                height: last.height,
                timestamp: last.timestamp,
            });
        }

        tracing::debug!(delegates = rows.len(), "delegate registrations restored");
        Ok(())
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        sender: &Wallet,
        wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let username = username(tx)?;
        if username.is_empty() {
            return Err(TransactionError::WalletUsernameEmpty);
        }
        if sender.is_delegate() {
            return Err(TransactionError::WalletIsAlreadyDelegate);
        }
        if wallets.has_by_username(username) {
            return Err(TransactionError::WalletUsernameAlreadyRegistered(
                username.to_string(),
            ));
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
        let Some(username) = tx.data.username() else {
            return Ok(());
        };
        let taken = pool
            .all_of_kind(tx)
            .any(|other| other.id != tx.id && other.data.username() == Some(username));
        if taken {
            return Err(PoolError::new(
                PoolErrorCode::Pending,
                format!("Delegate registration for \"{username}\" already in the pool"),
            ));
        }
        Ok(())
    }

    fn emit_events(&self, tx: &Transaction, wallets: &WalletRepository, events: &dyn EventDispatcher) {
        if let Some(username) = tx.data.username() {
            events.dispatch(TransactionEvent::DelegateRegistered {
                address: wallets.address_of(tx.sender_public_key()),
                username: username.to_string(),
            });
        }
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let username = username(tx)?;
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        let sender = wallets.find_by_public_key(tx.sender_public_key());
        sender.attributes.delegate = Some(DelegateInfo::new(username));
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
        let sender = wallets.find_by_public_key(tx.sender_public_key());
        sender.attributes.delegate = None;
        let address = sender.address.clone();
        wallets.reindex(&address);
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
