//! Multi-signature registration, current and legacy.
//!
//! The legacy type is only replayed from history; applying it is refused.

use crate::context::HandlerContext;
use crate::events::{EventDispatcher, TransactionEvent};
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{sender_has_pending, PoolError, PoolErrorCode, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_crypto::multi_signature_public_key;
use dpos_state::{MultiSignatureInfo, Wallet, WalletAttribute, WalletRepository};
use dpos_transactions::kinds::{LegacyMultiSignatureKind, MultiSignatureKind};
use dpos_transactions::verifier::verify_signatures;
use dpos_transactions::{
    CoreType, MultiSignatureAsset, Transaction, TransactionData, TransactionKind, TypeKey,
};
use dpos_types::PublicKey;
use std::sync::Arc;

/// Most participants a registration may name.
const MAX_PARTICIPANTS: usize = 16;

fn asset(tx: &Transaction) -> Result<&MultiSignatureAsset, TransactionError> {
    tx.data
        .multi_signature()
        .ok_or(TransactionError::MissingAsset("multiSignature"))
}

/// Public key of the wallet a registration creates.
fn registered_key(asset: &MultiSignatureAsset) -> Result<PublicKey, TransactionError> {
    Ok(multi_signature_public_key(asset.min, &asset.public_keys)?)
}

/// Registration of an `m`-of-`n` Schnorr multi-signature wallet.
///
/// The new wallet lives at the address of the aggregated participant key; the
/// registering sender only pays the fee.
pub struct MultiSignatureHandler;

impl TransactionHandler for MultiSignatureHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::MultiSignature, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(MultiSignatureKind)
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[WalletAttribute::MultiSignature]
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        HandlerVersion::V2.is_active(milestone)
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let rows = generic::history_of(ctx, CoreType::MultiSignature)?;
        for row in rows.iter().filter(|row| row.data.version >= 2) {
            let asset = row
                .data
                .multi_signature()
                .ok_or(TransactionError::MissingAsset("multiSignature"))?;
            let wallet = wallets.find_by_public_key(&registered_key(asset)?);
            if wallet.has_multi_signature() {
                return Err(TransactionError::MultiSignatureAlreadyRegistered);
            }
            wallet.attributes.multi_signature = Some(MultiSignatureInfo {
                min: asset.min,
                public_keys: asset.public_keys.clone(),
                legacy: false,
            });
        }
        Ok(())
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        _sender: &Wallet,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let asset = asset(tx)?;
        let participants = asset.public_keys.len();
        let min = usize::from(asset.min);
        if min < 1 || min > participants || participants > MAX_PARTICIPANTS {
            return Err(TransactionError::MultiSignatureMinimumKeys);
        }

        let signatures = tx.data.signatures.as_ref().map_or(0, Vec::len);
        if signatures != participants {
            return Err(TransactionError::MultiSignatureKeyCountMismatch);
        }

        let address = wallets.address_of(&registered_key(asset)?);
        if wallets
            .get_by_address(&address)
            .is_some_and(Wallet::has_multi_signature)
        {
            return Err(TransactionError::MultiSignatureAlreadyRegistered);
        }

        if !verify_signatures(&tx.data, ctx.types, ctx.config.exceptions(), asset)? {
            return Err(TransactionError::InvalidMultiSignature);
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
        let Ok(asset) = asset(tx) else {
            return;
        };
        if let Ok(key) = registered_key(asset) {
            events.dispatch(TransactionEvent::MultiSignatureRegistered {
                address: wallets.address_of(&key),
                min: asset.min,
            });
        }
    }

    fn apply_to_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let asset = asset(tx)?;
        let wallet = wallets.find_by_public_key(&registered_key(asset)?);
        wallet.attributes.multi_signature = Some(MultiSignatureInfo {
            min: asset.min,
            public_keys: asset.public_keys.clone(),
            legacy: false,
        });
        Ok(())
    }

    fn revert_for_recipient(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let asset = asset(tx)?;
        wallets
            .find_by_public_key(&registered_key(asset)?)
            .attributes
            .multi_signature = None;
        Ok(())
    }
}

/// The pre-AIP11 multi-signature registration.
///
/// New registrations are refused; the handler exists to restore historical
/// ones, which are flagged `legacy` and can no longer send.
pub struct LegacyMultiSignatureHandler;

fn legacy_info(data: &TransactionData) -> Result<MultiSignatureInfo, TransactionError> {
    let asset = data
        .legacy_multi_signature()
        .ok_or(TransactionError::MissingAsset("multiSignatureLegacy"))?;
    Ok(MultiSignatureInfo {
        min: asset.min,
        public_keys: asset.public_keys(),
        legacy: true,
    })
}

impl TransactionHandler for LegacyMultiSignatureHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::MultiSignature, 1)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(LegacyMultiSignatureKind)
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[WalletAttribute::MultiSignature]
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        !milestone.aip11
    }

    fn bootstrap(
        &self,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let rows = generic::history_of(ctx, CoreType::MultiSignature)?;
        for row in rows.iter().filter(|row| row.data.version == 1) {
            let info = legacy_info(&row.data)?;
            let wallet = wallets.find_by_public_key(&row.data.sender_public_key);
            if wallet.has_multi_signature() {
                return Err(TransactionError::MultiSignatureAlreadyRegistered);
            }
            wallet.attributes.multi_signature = Some(info);
        }
        Ok(())
    }

    fn throw_if_cannot_be_applied(
        &self,
        tx: &Transaction,
        _sender: &Wallet,
        _wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        if ctx.is_exception(tx) {
            return Ok(());
        }
        Err(TransactionError::LegacyMultiSignature)
    }

    fn throw_if_cannot_enter_pool(
        &self,
        _tx: &Transaction,
        _pool: &dyn PoolQuery,
        _wallets: &WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        Err(PoolError::new(
            PoolErrorCode::Deprecated,
            "Legacy multi signature registrations are no longer accepted",
        ))
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let info = legacy_info(&tx.data)?;
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        wallets
            .find_by_public_key(tx.sender_public_key())
            .attributes
            .multi_signature = Some(info);
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
            .multi_signature = None;
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
