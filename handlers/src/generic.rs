//! Checks and wallet mutations every handler shares.

use crate::context::HandlerContext;
use crate::handler::TransactionHandler;
use crate::TransactionError;
use dpos_state::{Wallet, WalletRepository};
use dpos_store::TransactionRow;
use dpos_transactions::verifier::{verify_second_signature, verify_signatures};
use dpos_transactions::{CoreType, MultiSignatureAsset, Transaction, TypeGroup};
use dpos_types::BigNumber;

/// Rows fetched per history query during bootstrap.
const PAGE_SIZE: usize = 10_000;

/// A sender that never revealed its key and holds nothing in confirmed state
/// cannot spend.
pub fn throw_if_cold_wallet(
    tx: &Transaction,
    sender: &Wallet,
    wallets: &WalletRepository,
    ctx: &HandlerContext<'_>,
) -> Result<(), TransactionError> {
    let db = ctx.canonical_or(wallets);
    let known = db.has_by_public_key(tx.sender_public_key());
    let funded = db
        .get_by_address(&sender.address)
        .is_some_and(|wallet| !wallet.balance.is_zero());
    if !known && !funded {
        return Err(TransactionError::ColdWallet);
    }
    Ok(())
}

/// Nonce, balance, sender identity, second signature and multi-signature rules.
///
/// The first failing rule is reported. Exceptions skip every rule.
pub fn perform_wallet_checks(
    tx: &Transaction,
    sender: &Wallet,
    wallets: &WalletRepository,
    ctx: &HandlerContext<'_>,
) -> Result<(), TransactionError> {
    if ctx.is_exception(tx) {
        return Ok(());
    }
    let data = &tx.data;

    sender.verify_transaction_nonce_apply(data)?;

    let spent = &data.amount + &data.fee;
    throw_if_insufficient_balance(tx, sender, &spent, ctx)?;

    if sender.public_key.as_ref() != Some(&data.sender_public_key) {
        return Err(TransactionError::SenderWalletMismatch);
    }

    let db_sender = ctx.canonical_or(wallets).get_by_address(&sender.address);
    let milestone = ctx.milestone();
    let exceptions = ctx.config.exceptions();

    if sender.has_second_signature() {
        let second = db_sender
            .and_then(|wallet| wallet.attributes.second_public_key)
            .ok_or(TransactionError::UnexpectedSecondSignature)?;
        if !verify_second_signature(data, ctx.types, exceptions, &second) {
            return Err(TransactionError::InvalidSecondSignature);
        }
    } else if data.second_signature.is_some() && !milestone.ignore_invalid_second_signature_field {
        return Err(TransactionError::UnexpectedSecondSignature);
    }

    let is_registration = data.is_core(CoreType::MultiSignature);
    if is_registration && !milestone.aip11 {
        return Err(TransactionError::UnexpectedMultiSignature);
    }

    if sender.has_multi_signature() {
        let registered = db_sender
            .and_then(|wallet| wallet.multi_signature())
            .ok_or(TransactionError::UnexpectedMultiSignature)?;
        if registered.legacy {
            return Err(TransactionError::LegacyMultiSignature);
        }
        let asset = MultiSignatureAsset {
            min: registered.min,
            public_keys: registered.public_keys.clone(),
        };
        if !verify_signatures(data, ctx.types, exceptions, &asset)? {
            return Err(TransactionError::InvalidMultiSignature);
        }
    } else if data.signatures.is_some() && !is_registration {
        return Err(TransactionError::UnexpectedMultiSignature);
    }

    Ok(())
}

/// `sender.balance - spent` must stay non-negative, unless the negative
/// balance table allows the sender to reach that balance at this nonce.
pub fn throw_if_insufficient_balance(
    tx: &Transaction,
    sender: &Wallet,
    spent: &BigNumber,
    ctx: &HandlerContext<'_>,
) -> Result<(), TransactionError> {
    let remaining = &sender.balance - spent;
    if !remaining.is_negative() {
        return Ok(());
    }
    let nonce = if tx.version() > 1 {
        tx.data.nonce_or_zero()
    } else {
        &sender.nonce + &BigNumber::one()
    };
    let allowed = ctx
        .config
        .allowed_negative_balance(tx.sender_public_key(), &nonce)
        .is_some_and(|floor| remaining >= *floor);
    if allowed {
        Ok(())
    } else {
        Err(TransactionError::InsufficientBalance)
    }
}

/// Signature check against the sender's registered keys.
///
/// Multi-signature senders are checked against the registration on their
/// wallet; everyone else against the result recorded when the transaction
/// was built.
pub fn verify(
    tx: &Transaction,
    wallets: &WalletRepository,
    ctx: &HandlerContext<'_>,
) -> Result<bool, TransactionError> {
    let registered = wallets
        .get_by_public_key(tx.sender_public_key())
        .and_then(|wallet| wallet.multi_signature());
    match registered {
        Some(registered) => {
            let asset = MultiSignatureAsset {
                min: registered.min,
                public_keys: registered.public_keys.clone(),
            };
            Ok(verify_signatures(
                &tx.data,
                ctx.types,
                ctx.config.exceptions(),
                &asset,
            )?)
        }
        None => Ok(tx.is_verified),
    }
}

/// Run `handler`'s checks and move the sender nonce past `tx`.
///
/// Balances are left to the caller. Exceptions are applied without checks.
pub fn advance_sender<H: TransactionHandler + ?Sized>(
    handler: &H,
    tx: &Transaction,
    wallets: &mut WalletRepository,
    ctx: &HandlerContext<'_>,
) -> Result<(), TransactionError> {
    let public_key = tx.sender_public_key();
    if ctx.is_exception(tx) {
        tracing::warn!(id = %tx.id, "transaction forcibly applied as an exception");
    } else {
        let view: &WalletRepository = wallets;
        let sender = view.sender_view(public_key);
        handler.throw_if_cannot_be_applied(tx, &sender, view, ctx)?;
    }

    let sender = wallets.find_by_public_key(public_key);
    sender.verify_transaction_nonce_apply(&tx.data)?;
    sender.apply_nonce(&tx.data);
    let address = sender.address.clone();
    wallets.reindex(&address);
    Ok(())
}

/// Undo [`advance_sender`].
pub fn rewind_sender(tx: &Transaction, wallets: &mut WalletRepository) -> Result<(), TransactionError> {
    let sender = wallets.find_by_public_key(tx.sender_public_key());
    sender.verify_transaction_nonce_revert(&tx.data)?;
    sender.decrease_nonce();
    Ok(())
}

pub fn apply_to_sender<H: TransactionHandler + ?Sized>(
    handler: &H,
    tx: &Transaction,
    wallets: &mut WalletRepository,
    ctx: &HandlerContext<'_>,
) -> Result<(), TransactionError> {
    advance_sender(handler, tx, wallets, ctx)?;
    let spent = &tx.data.amount + &tx.data.fee;
    wallets
        .find_by_public_key(tx.sender_public_key())
        .decrease_balance(&spent);
    Ok(())
}

pub fn revert_for_sender(
    tx: &Transaction,
    wallets: &mut WalletRepository,
) -> Result<(), TransactionError> {
    rewind_sender(tx, wallets)?;
    let spent = &tx.data.amount + &tx.data.fee;
    wallets
        .find_by_public_key(tx.sender_public_key())
        .increase_balance(&spent);
    Ok(())
}

/// Every confirmed transaction of a core type, all versions, in chain order.
pub fn history_of(
    ctx: &HandlerContext<'_>,
    core: CoreType,
) -> Result<Vec<TransactionRow>, TransactionError> {
    let mut rows = Vec::new();
    loop {
        let page = ctx
            .transactions
            .find_by_type(TypeGroup::CORE, core.as_u16(), PAGE_SIZE, rows.len())?;
        let done = page.len() < PAGE_SIZE;
        rows.extend(page);
        if done {
            return Ok(rows);
        }
    }
}
