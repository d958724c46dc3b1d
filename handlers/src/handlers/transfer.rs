use crate::context::HandlerContext;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{PoolError, PoolErrorCode, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_crypto::validate_address;
use dpos_state::WalletRepository;
use dpos_transactions::kinds::TransferKind;
use dpos_transactions::{CoreType, Transaction, TransactionKind, TypeKey};
use dpos_types::Address;
use std::sync::Arc;

pub struct TransferHandler {
    version: HandlerVersion,
}

impl TransferHandler {
    pub fn new(version: HandlerVersion) -> Self {
        Self { version }
    }
}

fn recipient(tx: &Transaction) -> Result<&Address, TransactionError> {
    tx.data
        .recipient_id
        .as_ref()
        .ok_or(TransactionError::MissingAsset("recipient"))
}

impl TransactionHandler for TransferHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::Transfer, self.version.as_u8())
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(TransferKind)
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        self.version.is_active(milestone)
    }

    /// Credits every recipient with what it received. Both generations are
    /// returned by the history query, so only the first one replays them.
    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        if self.version != HandlerVersion::V1 {
            return Ok(());
        }
        for received in ctx.transactions.get_received_transactions()? {
            wallets
                .find_by_address(&received.recipient_id)
                .increase_balance(&received.amount);
        }
        Ok(())
    }

    fn throw_if_cannot_enter_pool(
        &self,
        tx: &Transaction,
        _pool: &dyn PoolQuery,
        _wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        let network = ctx.config.pub_key_hash();
        match &tx.data.recipient_id {
            Some(recipient) if validate_address(recipient, network) => Ok(()),
            recipient => Err(PoolError::new(
                PoolErrorCode::InvalidRecipient,
                format!(
                    "Recipient {} is not on the same network: {network}",
                    recipient.as_ref().map(Address::as_str).unwrap_or_default()
                ),
            )),
        }
    }

    fn apply_to_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let recipient = recipient(tx)?;
        wallets.find_by_address(recipient).increase_balance(&tx.data.amount);
        Ok(())
    }

    fn revert_for_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let recipient = recipient(tx)?;
        wallets.find_by_address(recipient).decrease_balance(&tx.data.amount);
        Ok(())
    }
}
