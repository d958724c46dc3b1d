//! Votes and unvotes.
//!
//! A wallet votes for at most one delegate at a time. Each vote in the asset is
//! stepped against the sender's current vote, so an unvote must name the
//! delegate currently voted for.

use crate::context::HandlerContext;
use crate::events::{EventDispatcher, TransactionEvent};
use crate::generic;
use crate::handler::{HandlerVersion, TransactionHandler};
use crate::pool::{sender_has_pending, PoolError, PoolErrorCode, PoolQuery};
use crate::TransactionError;
use dpos_config::Milestone;
use dpos_state::{Wallet, WalletAttribute, WalletRepository};
use dpos_transactions::kinds::VoteKind;
use dpos_transactions::{CoreType, Transaction, TransactionKind, TypeKey, Vote, VoteAction};
use dpos_types::PublicKey;
use std::sync::Arc;

/// Votes and unvotes.
///
/// A wallet votes for at most one delegate. Version 1 transactions may carry
/// several votes (an unvote followed by a vote) once AIP37 is active;
/// version 2 transactions carry exactly one.
pub struct VoteHandler {
    version: HandlerVersion,
}

impl VoteHandler {
    pub fn new(version: HandlerVersion) -> Self {
        Self { version }
    }

    fn allows_multiple_votes(&self, milestone: &Milestone) -> bool {
        self.version == HandlerVersion::V1 && milestone.aip37
    }
}

/// The vote a wallet holds after `vote`, starting from `current`.
fn step(current: Option<PublicKey>, vote: &Vote) -> Result<Option<PublicKey>, TransactionError> {
    match vote.action {
        VoteAction::Vote => match current {
            Some(_) => Err(TransactionError::AlreadyVoted),
            None => Ok(Some(vote.delegate)),
        },
        VoteAction::Unvote => match current {
            None => Err(TransactionError::NoVote),
            Some(voted) if voted != vote.delegate => Err(TransactionError::UnvoteMismatch),
            Some(_) => Ok(None),
        },
    }
}

fn delegate_wallet<'w>(wallets: &'w WalletRepository, key: &PublicKey) -> Option<&'w Wallet> {
    wallets
        .get_by_public_key(key)
        .or_else(|| wallets.get_by_address(&wallets.address_of(key)))
}

fn votes(tx: &Transaction) -> Result<&[Vote], TransactionError> {
    match tx.data.votes() {
        [] => Err(TransactionError::MissingAsset("votes")),
        votes => Ok(votes),
    }
}

impl TransactionHandler for VoteHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::core(CoreType::Vote, self.version.as_u8())
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(VoteKind)
    }

    fn dependencies(&self) -> Vec<TypeKey> {
        vec![TypeKey::core(CoreType::DelegateRegistration, self.version.as_u8())]
    }

    fn wallet_attributes(&self) -> &'static [WalletAttribute] {
        &[WalletAttribute::Vote]
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
        for row in generic::history_of(ctx, CoreType::Vote)? {
            let wallet = wallets.find_by_public_key(&row.data.sender_public_key);
            for vote in row.data.votes() {
                wallet.attributes.vote = step(wallet.attributes.vote, vote)?;
            }
        }
        Ok(())
    }

    fn check_type_rules(
        &self,
        tx: &Transaction,
        sender: &Wallet,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let votes = votes(tx)?;
        if votes.len() > 1 && !self.allows_multiple_votes(ctx.milestone()) {
            return Err(TransactionError::TooManyVotes(votes.len()));
        }

        let mut current = sender.attributes.vote;
        for vote in votes {
            current = step(current, vote)?;
            let delegate = delegate_wallet(wallets, &vote.delegate).and_then(Wallet::delegate);
            match delegate {
                None => return Err(TransactionError::VotedForNonDelegate(vote.to_string())),
                Some(delegate) if vote.is_vote() && delegate.resigned => {
                    return Err(TransactionError::VotedForResignedDelegate(vote.to_string()));
                }
                Some(_) => {}
            }
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
        if sender_has_pending(pool, tx) {
            return Err(PoolError::pending_of_type(tx));
        }
        for vote in tx.data.votes().iter().filter(|v| v.is_vote()) {
            let is_delegate = delegate_wallet(wallets, &vote.delegate).is_some_and(Wallet::is_delegate);
            if !is_delegate {
                return Err(PoolError::new(
                    PoolErrorCode::Conflict,
                    format!("Vote for {}, which is not a delegate", vote.delegate),
                ));
            }
        }
        Ok(())
    }

    fn emit_events(&self, tx: &Transaction, wallets: &WalletRepository, events: &dyn EventDispatcher) {
        let voter = wallets.address_of(tx.sender_public_key());
        for vote in tx.data.votes() {
            let event = match vote.action {
                VoteAction::Vote => TransactionEvent::Vote {
                    voter: voter.clone(),
                    delegate: vote.delegate,
                },
                VoteAction::Unvote => TransactionEvent::Unvote {
                    voter: voter.clone(),
                    delegate: vote.delegate,
                },
            };
            events.dispatch(event);
        }
    }

    fn apply_to_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let votes = votes(tx)?;
        generic::apply_to_sender(self, tx, wallets, ctx)?;
        let sender = wallets.find_by_public_key(tx.sender_public_key());
        for vote in votes {
            sender.attributes.vote = vote.is_vote().then_some(vote.delegate);
        }
        Ok(())
    }

    fn revert_for_sender(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        let votes = votes(tx)?;
        generic::revert_for_sender(tx, wallets)?;
        let sender = wallets.find_by_public_key(tx.sender_public_key());
        for vote in votes.iter().rev() {
            sender.attributes.vote = (!vote.is_vote()).then_some(vote.delegate);
        }
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
