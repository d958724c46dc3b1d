use crate::context::HandlerContext;
use crate::events::{EventDispatcher, TransactionEvent};
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{PoolError, PoolErrorCode, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_state::{Wallet, WalletAttribute, WalletIndexKind, WalletRepository};
use dpos_transactions::kinds::IpfsKind;
use dpos_transactions::{CoreType, Transaction, TransactionKind, TypeKey};
use dpos_types::PublicKey;
use std::sync::Arc;

pub struct IpfsHandler;

fn hash(tx: &Transaction) -> Result<&str, TransactionError> {
    tx.data.ipfs().ok_or(TransactionError::MissingAsset("ipfs"))
}

fn record(wallets: &mut WalletRepository, sender: &PublicKey, hash: &str) {
    let wallet = wallets.find_by_public_key(sender);
    wallet
        .attributes
        .ipfs
        .get_or_insert_with(Default::default)
        .hashes
        .insert(hash.to_string());
    let address = wallet.address.clone();
    wallets.reindex(&address);
}

fn forget(wallets: &mut WalletRepository, sender: &PublicKey, hash: &str) {
    let wallet = wallets.find_by_public_key(sender);
    if let Some(ipfs) = wallet.attributes.ipfs.as_mut() {
        ipfs.hashes.remove(hash);
        if ipfs.hashes.is_empty() {
            wallet.attributes.ipfs = None;
        }
    }
    let address = wallet.address.clone();
    wallets.reindex(&address);
}

impl TransactionHandler for IpfsHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::Ipfs, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(IpfsKind)
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[WalletAttribute::Ipfs, WalletAttribute::IpfsHashes]
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        HandlerVersion::V2.is_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        for row in generic::history_of(ctx, CoreType::Ipfs)? {
            let hash = row.data.ipfs().ok_or(TransactionError::MissingAsset("ipfs"))?;
            record(wallets, &row.data.sender_public_key, hash);
        }
        Ok(())
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        _sender: &Wallet,
        wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        if wallets.has_by_index(WalletIndexKind::Ipfs, hash(tx)?) {
            return Err(TransactionError::IpfsHashAlreadyExists);
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
        let Some(hash) = tx.data.ipfs() else {
            return Ok(());
        };
        let pending = pool
            .all_of_kind(tx)
            .any(|other| other.id != tx.id && other.data.ipfs() == Some(hash));
        if pending {
            return Err(PoolError::new(
                PoolErrorCode::Pending,
                format!("Ipfs transaction for \"{hash}\" already in the pool"),
            ));
        }
        Ok(())
    }

    fn emit_events(&self, tx: &Transaction, _wallets: &WalletRepository, events: &dyn EventDispatcher) {
        if let Some(hash) = tx.data.ipfs() {
            events.dispatch(TransactionEvent::IpfsRegistered {
                sender: *tx.sender_public_key(),
                hash: hash.to_string(),
            });
        }
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let hash = hash(tx)?;
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        record(wallets, tx.sender_public_key(), hash);
        Ok(())
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let hash = hash(tx)?;
        generic::revert_for_sender(tx, wallets)?;
        forget(wallets, tx.sender_public_key(), hash);
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
