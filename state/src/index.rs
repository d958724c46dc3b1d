//! Secondary wallet indexes.

use crate::Wallet;
use dpos_types::Address;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The lookups handlers resolve wallets by, besides address and public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WalletIndexKind {
    Usernames,
    Resignations,
    Locks,
    Ipfs,
}

impl WalletIndexKind {
    pub const ALL: [WalletIndexKind; 4] = [Self::Usernames, Self::Resignations, Self::Locks, Self::Ipfs];

    pub fn name(self) -> &'static str {
        match self {
            Self::Usernames => "usernames",
            Self::Resignations => "resignations",
            Self::Locks => "locks",
            Self::Ipfs => "ipfs",
        }
    }

    /// Keys `wallet` should currently be reachable under.
    pub(crate) fn keys_of(self, wallet: &Wallet) -> Vec<String> {
        match self {
            Self::Usernames => wallet
                .delegate()
                .map(|d| vec![d.username.clone()])
                .unwrap_or_default(),
            Self::Resignations => wallet
                .delegate()
                .filter(|d| d.resigned)
                .map(|d| vec![d.username.clone()])
                .unwrap_or_default(),
            Self::Locks => wallet
                .htlc()
                .map(|h| h.locks.keys().map(ToString::to_string).collect())
                .unwrap_or_default(),
            Self::Ipfs => wallet
                .attributes
                .ipfs
                .as_ref()
                .map(|i| i.hashes.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for WalletIndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One string-keyed index. Remembers which keys point at each wallet so a
/// reindex replaces them instead of piling up stale entries.
#[derive(Clone, Debug, Default)]
pub struct WalletIndex {
    entries: HashMap<String, Address>,
    by_wallet: HashMap<Address, HashSet<String>>,
}

impl WalletIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Address> {
        self.entries.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set(&mut self, key: String, address: Address) {
        if let Some(previous) = self.entries.insert(key.clone(), address.clone()) {
            if let Some(keys) = self.by_wallet.get_mut(&previous) {
                keys.remove(&key);
            }
        }
        self.by_wallet.entry(address).or_default().insert(key);
    }

    pub fn forget(&mut self, key: &str) {
        if let Some(address) = self.entries.remove(key) {
            if let Some(keys) = self.by_wallet.get_mut(&address) {
                keys.remove(key);
            }
        }
    }

    /// Make `keys` the exact set of entries for `address`.
    pub fn replace(&mut self, address: &Address, keys: Vec<String>) {
        if let Some(old) = self.by_wallet.remove(address) {
            for key in old {
                if self.entries.get(&key) == Some(address) {
                    self.entries.remove(&key);
                }
            }
        }
        for key in keys {
            self.set(key, address.clone());
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_wallet.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.entries.values()
    }
}
