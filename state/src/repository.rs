//! The wallet repository: sole owner of wallet state.
//!
//! All mutation goes through `&mut self`. A block processor or pool validator
//! owns one repository (or a clone of it for speculative checks) and applies
//! transactions one at a time.

use crate::index::{WalletIndex, WalletIndexKind};
use crate::{Wallet, WalletError};
use dpos_crypto::address_from_public_key;
use dpos_types::{Address, BigNumber, PublicKey, TransactionId};
use std::borrow::Cow;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct WalletRepository {
    network: u8,
    wallets: HashMap<Address, Wallet>,
    public_keys: HashMap<PublicKey, Address>,
    indexes: HashMap<WalletIndexKind, WalletIndex>,
}

impl WalletRepository {
    /// An empty repository deriving addresses for network byte `network`.
    pub fn new(network: u8) -> Self {
        let indexes = WalletIndexKind::ALL
            .into_iter()
            .map(|kind| (kind, WalletIndex::new()))
            .collect();
        Self {
            network,
            wallets: HashMap::new(),
            public_keys: HashMap::new(),
            indexes,
        }
    }

    pub fn network(&self) -> u8 {
        self.network
    }

    pub fn address_of(&self, public_key: &PublicKey) -> Address {
        address_from_public_key(public_key, self.network)
    }

    // ── Lookup, creating on first reference ────────────────────────────

    pub fn find_by_address(&mut self, address: &Address) -> &mut Wallet {
        self.wallets
            .entry(address.clone())
            .or_insert_with(|| Wallet::new(address.clone()))
    }

    /// The wallet of `public_key`, recording the key on it if it was cold.
    pub fn find_by_public_key(&mut self, public_key: &PublicKey) -> &mut Wallet {
        let address = if let Some(address) = self.public_keys.get(public_key).cloned() {
            address
        } else {
            let address = self.address_of(public_key);
            self.public_keys.insert(*public_key, address.clone());
            address
        };
        let wallet = self
            .wallets
            .entry(address.clone())
            .or_insert_with(|| Wallet::new(address));
        if wallet.public_key.is_none() {
            wallet.public_key = Some(*public_key);
        }
        wallet
    }

    // ── Lookup without side effects ────────────────────────────────────

    pub fn get_by_address(&self, address: &Address) -> Option<&Wallet> {
        self.wallets.get(address)
    }

    pub fn get_by_address_mut(&mut self, address: &Address) -> Option<&mut Wallet> {
        self.wallets.get_mut(address)
    }

    pub fn get_by_public_key(&self, public_key: &PublicKey) -> Option<&Wallet> {
        self.public_keys
            .get(public_key)
            .and_then(|address| self.wallets.get(address))
    }

    pub fn get_by_public_key_mut(&mut self, public_key: &PublicKey) -> Option<&mut Wallet> {
        let address = self.public_keys.get(public_key)?;
        self.wallets.get_mut(address)
    }

    /// The wallet `public_key` would resolve to, without creating or
    /// indexing anything. Unknown keys yield an empty wallet.
    pub fn sender_view(&self, public_key: &PublicKey) -> Cow<'_, Wallet> {
        if let Some(wallet) = self.get_by_public_key(public_key) {
            return Cow::Borrowed(wallet);
        }
        let address = self.address_of(public_key);
        let mut wallet = self
            .wallets
            .get(&address)
            .cloned()
            .unwrap_or_else(|| Wallet::new(address));
        wallet.public_key = Some(*public_key);
        Cow::Owned(wallet)
    }

    pub fn find_by_index(&self, kind: WalletIndexKind, key: &str) -> Result<&Wallet, WalletError> {
        self.index(kind)
            .get(key)
            .and_then(|address| self.wallets.get(address))
            .ok_or_else(|| WalletError::NotFound {
                index: kind.name(),
                key: key.to_string(),
            })
    }

    pub fn find_by_username(&self, username: &str) -> Option<&Wallet> {
        self.find_by_index(WalletIndexKind::Usernames, username).ok()
    }

    /// The wallet holding the open lock `lock_id`.
    pub fn find_by_lock(&self, lock_id: &TransactionId) -> Option<&Wallet> {
        self.find_by_index(WalletIndexKind::Locks, &lock_id.to_string()).ok()
    }

    pub fn has_by_address(&self, address: &Address) -> bool {
        self.wallets.contains_key(address)
    }

    pub fn has_by_public_key(&self, public_key: &PublicKey) -> bool {
        self.public_keys.contains_key(public_key)
    }

    pub fn has_by_username(&self, username: &str) -> bool {
        self.has_by_index(WalletIndexKind::Usernames, username)
    }

    pub fn has_by_index(&self, kind: WalletIndexKind, key: &str) -> bool {
        self.index(kind).has(key)
    }

    pub fn get_nonce(&self, public_key: &PublicKey) -> BigNumber {
        self.get_by_public_key(public_key)
            .map(|w| w.nonce.clone())
            .unwrap_or_default()
    }

    pub fn all_by_address(&self) -> impl Iterator<Item = &Wallet> {
        self.wallets.values()
    }

    pub fn all_by_username(&self) -> impl Iterator<Item = &Wallet> {
        self.index(WalletIndexKind::Usernames)
            .addresses()
            .filter_map(|address| self.wallets.get(address))
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    // ── Index maintenance ──────────────────────────────────────────────

    /// Bring every secondary index in line with the wallet's attributes.
    pub fn reindex(&mut self, address: &Address) {
        let Some(wallet) = self.wallets.get(address) else {
            return;
        };
        if let Some(public_key) = wallet.public_key {
            self.public_keys.insert(public_key, address.clone());
        }
        let keys: Vec<(WalletIndexKind, Vec<String>)> = WalletIndexKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.keys_of(wallet)))
            .collect();
        for (kind, keys) in keys {
            self.index_mut(kind).replace(address, keys);
        }
    }

    pub fn reindex_all(&mut self) {
        let addresses: Vec<Address> = self.wallets.keys().cloned().collect();
        for address in &addresses {
            self.reindex(address);
        }
        tracing::debug!(wallets = addresses.len(), "wallet indexes rebuilt");
    }

    pub fn forget_by_username(&mut self, username: &str) {
        self.forget_by_index(WalletIndexKind::Usernames, username);
    }

    pub fn forget_by_index(&mut self, kind: WalletIndexKind, key: &str) {
        self.index_mut(kind).forget(key);
    }

    /// Drop every wallet and index entry.
    pub fn reset(&mut self) {
        tracing::debug!(wallets = self.wallets.len(), "wallet repository reset");
        self.wallets.clear();
        self.public_keys.clear();
        for index in self.indexes.values_mut() {
            index.clear();
        }
    }

    fn index(&self, kind: WalletIndexKind) -> &WalletIndex {
        &self.indexes[&kind]
    }

    fn index_mut(&mut self, kind: WalletIndexKind) -> &mut WalletIndex {
        self.indexes.entry(kind).or_default()
    }
}
