//! Everything a handler reads besides the wallets it mutates.

use dpos_config::{ConfigManager, Milestone};
use dpos_state::WalletRepository;
use dpos_store::{BlockRepository, TransactionRepository};
use dpos_transactions::{Transaction, TypeRegistry};

/// Height and timestamp of the chain tip that lock expirations are measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LastBlock {
    pub height: u32,
    pub timestamp: u32,
}

/// Read-only collaborators of a handler call.
///
/// `height` selects the milestone. `canonical` is the confirmed wallet state
/// when the caller mutates a scratch copy (pool validation, forging); second
/// signatures, multi-signature registrations and cold wallets are judged
/// against it. Without one the working repository is canonical.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    pub config: &'a ConfigManager,
    pub types: &'a TypeRegistry,
    pub transactions: &'a dyn TransactionRepository,
    pub blocks: &'a dyn BlockRepository,
    pub height: u32,
    pub last_block: LastBlock,
    pub canonical: Option<&'a WalletRepository>,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        transactions: &'a dyn TransactionRepository,
        blocks: &'a dyn BlockRepository,
    ) -> Self {
        Self {
            config,
            types,
            transactions,
            blocks,
            height: 1,
            last_block: LastBlock::default(),
            canonical: None,
        }
    }

    pub fn at_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn with_last_block(mut self, height: u32, timestamp: u32) -> Self {
        self.last_block = LastBlock { height, timestamp };
        self
    }

    pub fn with_canonical(mut self, wallets: &'a WalletRepository) -> Self {
        self.canonical = Some(wallets);
        self
    }

    pub fn milestone(&self) -> &'a Milestone {
        self.config.milestone(self.height)
    }

    pub fn is_exception(&self, tx: &Transaction) -> bool {
        self.config.is_transaction_exception(&tx.id)
    }

    /// The confirmed repository, or `working` when none was supplied.
    pub fn canonical_or<'w>(&self, working: &'w WalletRepository) -> &'w WalletRepository
    where
        'a: 'w,
    {
        self.canonical.unwrap_or(working)
    }
}
