//! Rebuilds wallet state from confirmed history at startup.

use crate::context::HandlerContext;
use crate::registry::TransactionHandlerRegistry;
use crate::TransactionError;
use dpos_state::WalletRepository;
use dpos_types::{Address, BigNumber, PublicKey};
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of a rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateBuildReport {
    pub handlers_bootstrapped: usize,
    pub wallets: usize,
    /// Non-genesis wallets left below zero without an exception naming that
    /// exact balance at their nonce.
    pub negative_balances: Vec<(Address, BigNumber)>,
    /// Delegates whose vote balance went below zero.
    pub negative_vote_balances: Vec<(Address, BigNumber)>,
}

impl StateBuildReport {
    pub fn is_clean(&self) -> bool {
        self.negative_balances.is_empty() && self.negative_vote_balances.is_empty()
    }
}

/// Drives a full rebuild: forging rewards, spending by every sender, then each
/// handler's bootstrap in registration order.
pub struct StateBuilder<'a> {
    registry: &'a TransactionHandlerRegistry,
    ctx: HandlerContext<'a>,
}

impl<'a> StateBuilder<'a> {
    pub fn new(registry: &'a TransactionHandlerRegistry, ctx: HandlerContext<'a>) -> Self {
        Self { registry, ctx }
    }

    pub fn run(&self, wallets: &mut WalletRepository) -> Result<StateBuildReport, TransactionError> {
        let handlers: Vec<_> = self.registry.registered_handlers().collect();
        let steps = handlers.len() + 2;

        tracing::info!(step = 1, steps, "state generation: block rewards");
        for reward in self.ctx.blocks.get_block_rewards()? {
            wallets
                .find_by_public_key(&reward.generator_public_key)
                .increase_balance(&reward.rewards);
        }

        tracing::info!(step = 2, steps, "state generation: fees and nonces");
        for sent in self.ctx.transactions.get_sent_transactions()? {
            let wallet = wallets.find_by_public_key(&sent.sender_public_key);
            wallet.nonce = sent.nonce;
            wallet.decrease_balance(&(&sent.amount + &sent.fee));
        }

        for (i, handler) in handlers.iter().enumerate() {
            tracing::info!(step = i + 3, steps, handler = %handler.type_key(), "state generation: bootstrap");
            handler.bootstrap(wallets, &self.ctx)?;
        }

        let negative_balances = self.negative_balances(wallets);
        let negative_vote_balances = negative_vote_balances(wallets);
        tracing::info!(wallets = wallets.len(), "state generation complete");

        Ok(StateBuildReport {
            handlers_bootstrapped: handlers.len(),
            wallets: wallets.len(),
            negative_balances,
            negative_vote_balances,
        })
    }

    fn negative_balances(&self, wallets: &WalletRepository) -> Vec<(Address, BigNumber)> {
        let genesis = genesis_senders(self.ctx.config.genesis_block());
        let mut found: Vec<(Address, BigNumber)> = wallets
            .all_by_address()
            .filter(|wallet| wallet.balance.is_negative())
            .filter(|wallet| !wallet.public_key.is_some_and(|pk| genesis.contains(&pk)))
            .filter(|wallet| {
                let allowed = wallet.public_key.and_then(|pk| {
                    self.ctx
                        .config
                        .allowed_negative_balance(&pk, &wallet.nonce)
                        .cloned()
                });
                allowed.as_ref() != Some(&wallet.balance)
            })
            .map(|wallet| (wallet.address.clone(), wallet.balance.clone()))
            .collect();
        found.sort();

        for (address, balance) in &found {
            tracing::error!(%address, %balance, "Wallet {address} has a negative balance of '{balance}'");
        }
        found
    }
}

fn negative_vote_balances(wallets: &WalletRepository) -> Vec<(Address, BigNumber)> {
    let mut found: Vec<(Address, BigNumber)> = wallets
        .all_by_address()
        .filter_map(|wallet| {
            let delegate = wallet.delegate()?;
            delegate
                .vote_balance
                .is_negative()
                .then(|| (wallet.address.clone(), delegate.vote_balance.clone()))
        })
        .collect();
    found.sort();

    for (address, balance) in &found {
        tracing::error!(%address, %balance, "Wallet {address} has a negative vote balance of '{balance}'");
    }
    found
}

fn genesis_senders(genesis: Option<&Value>) -> HashSet<PublicKey> {
    genesis
        .and_then(|block| block.get("transactions"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|tx| tx.get("senderPublicKey").and_then(Value::as_str))
        .filter_map(|key| key.parse().ok())
        .collect()
}
