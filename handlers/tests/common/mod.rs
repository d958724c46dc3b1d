#![allow(dead_code)]

use dpos_config::ConfigManager;
use dpos_crypto::public_from_passphrase;
use dpos_handlers::{HandlerContext, TransactionHandler, TransactionHandlerRegistry};
use dpos_nullables::{NullBlockStore, NullTransactionStore};
use dpos_state::{DelegateInfo, WalletRepository};
use dpos_transactions::{Transaction, TypeRegistry};
use dpos_types::{Address, BigNumber, PublicKey};
use dpos_utils::logging::{try_init_logging, LogFormat};
use std::sync::Arc;

pub const AIP11_HEIGHT: u32 = 2_000_000;
pub const NETWORK: u8 = 30;
pub const TIP_TIMESTAMP: u32 = 100_000;

pub const SENDER: &str = "sender passphrase";
pub const SECOND: &str = "second passphrase";
pub const RECIPIENT: &str = "recipient passphrase";

pub struct Fixture {
    pub config: ConfigManager,
    pub types: TypeRegistry,
    pub registry: TransactionHandlerRegistry,
    pub transactions: NullTransactionStore,
    pub blocks: NullBlockStore,
    pub height: u32,
}

impl Fixture {
    pub fn new() -> Self {
        Self::at_height(AIP11_HEIGHT)
    }

    pub fn at_height(height: u32) -> Self {
        let _ = try_init_logging(LogFormat::Human, "warn");
        let config = ConfigManager::devnet();
        let mut types = TypeRegistry::new();
        let registry = TransactionHandlerRegistry::with_core_handlers(&mut types).unwrap();
        Self {
            config,
            types,
            registry,
            transactions: NullTransactionStore::new(),
            blocks: NullBlockStore::new(),
            height,
        }
    }

    pub fn ctx(&self) -> HandlerContext<'_> {
        HandlerContext::new(&self.config, &self.types, &self.transactions, &self.blocks)
            .at_height(self.height)
            .with_last_block(self.height, TIP_TIMESTAMP)
    }

    pub fn handler(&self, tx: &Transaction) -> Arc<dyn TransactionHandler> {
        self.registry
            .get(tx.type_key(), self.config.milestone(self.height))
            .unwrap()
            .clone()
    }

    pub fn apply(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
    ) -> Result<(), dpos_handlers::TransactionError> {
        self.handler(tx).apply(tx, wallets, &self.ctx())
    }

    pub fn revert(
        &self,
        tx: &Transaction,
        wallets: &mut WalletRepository,
    ) -> Result<(), dpos_handlers::TransactionError> {
        self.handler(tx).revert(tx, wallets, &self.ctx())
    }
}

pub fn key(passphrase: &str) -> PublicKey {
    public_from_passphrase(passphrase).unwrap()
}

pub fn address(wallets: &WalletRepository, passphrase: &str) -> Address {
    wallets.address_of(&key(passphrase))
}

pub fn amount(value: u64) -> BigNumber {
    BigNumber::from(value)
}

/// A repository where `passphrase` holds `balance` and has revealed its key.
pub fn funded(passphrase: &str, balance: u64) -> WalletRepository {
    let mut wallets = WalletRepository::new(NETWORK);
    fund(&mut wallets, passphrase, balance);
    wallets
}

pub fn fund(wallets: &mut WalletRepository, passphrase: &str, balance: u64) {
    let wallet = wallets.find_by_public_key(&key(passphrase));
    wallet.balance = BigNumber::from(balance);
}

/// Register `passphrase` as delegate `username` directly in wallet state.
pub fn seed_delegate(wallets: &mut WalletRepository, passphrase: &str, username: &str) -> PublicKey {
    let public_key = key(passphrase);
    let wallet = wallets.find_by_public_key(&public_key);
    wallet.attributes.delegate = Some(DelegateInfo::new(username));
    let address = wallet.address.clone();
    wallets.reindex(&address);
    public_key
}
