//! A single ledger account.

use crate::attributes::{DelegateInfo, HtlcInfo, MultiSignatureInfo, WalletExtensions};
use crate::WalletError;
use dpos_transactions::TransactionData;
use dpos_types::{Address, BigNumber, PublicKey};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub address: Address,
    /// Unknown for cold wallets until they first send.
    pub public_key: Option<PublicKey>,
    pub balance: BigNumber,
    pub nonce: BigNumber,
    #[serde(default)]
    pub attributes: WalletExtensions,
}

impl Wallet {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            public_key: None,
            balance: BigNumber::zero(),
            nonce: BigNumber::zero(),
            attributes: WalletExtensions::default(),
        }
    }

    pub fn is_delegate(&self) -> bool {
        self.attributes.delegate.is_some()
    }

    pub fn is_resigned_delegate(&self) -> bool {
        self.delegate().is_some_and(|d| d.resigned)
    }

    pub fn has_voted(&self) -> bool {
        self.attributes.vote.is_some()
    }

    pub fn has_second_signature(&self) -> bool {
        self.attributes.second_public_key.is_some()
    }

    pub fn has_multi_signature(&self) -> bool {
        self.attributes.multi_signature.is_some()
    }

    pub fn delegate(&self) -> Option<&DelegateInfo> {
        self.attributes.delegate.as_ref()
    }

    pub fn delegate_mut(&mut self) -> Option<&mut DelegateInfo> {
        self.attributes.delegate.as_mut()
    }

    pub fn multi_signature(&self) -> Option<&MultiSignatureInfo> {
        self.attributes.multi_signature.as_ref()
    }

    pub fn htlc(&self) -> Option<&HtlcInfo> {
        self.attributes.htlc.as_ref()
    }

    pub fn locked_balance(&self) -> BigNumber {
        self.htlc()
            .map(|h| h.locked_balance.clone())
            .unwrap_or_default()
    }

    pub fn increase_balance(&mut self, amount: &BigNumber) {
        self.balance += amount;
    }

    pub fn decrease_balance(&mut self, amount: &BigNumber) {
        self.balance -= amount;
    }

    pub fn increase_nonce(&mut self) {
        self.nonce += &BigNumber::one();
    }

    pub fn decrease_nonce(&mut self) {
        self.nonce -= &BigNumber::one();
    }

    /// Version 2 transactions must carry the next nonce. Version 1
    /// transactions have none and always pass.
    pub fn verify_transaction_nonce_apply(&self, data: &TransactionData) -> Result<(), WalletError> {
        if data.version > 1 {
            let nonce = data.nonce_or_zero();
            if nonce != &self.nonce + &BigNumber::one() {
                return Err(self.nonce_error(data, nonce, false));
            }
        }
        Ok(())
    }

    /// The transaction being reverted must be the wallet's latest one.
    pub fn verify_transaction_nonce_revert(&self, data: &TransactionData) -> Result<(), WalletError> {
        if data.version > 1 {
            let nonce = data.nonce_or_zero();
            if nonce != self.nonce {
                return Err(self.nonce_error(data, nonce, true));
            }
        }
        Ok(())
    }

    /// Move the nonce forward past `data`.
    pub fn apply_nonce(&mut self, data: &TransactionData) {
        match &data.nonce {
            Some(nonce) if data.version > 1 => self.nonce = nonce.clone(),
            _ => self.increase_nonce(),
        }
    }

    /// A wallet nobody needs to remember: nothing held, nothing registered.
    pub fn can_be_purged(&self) -> bool {
        self.balance.is_zero()
            && self.attributes == WalletExtensions::default()
            && self.nonce.is_zero()
    }

    fn nonce_error(&self, data: &TransactionData, nonce: BigNumber, reversal: bool) -> WalletError {
        WalletError::UnexpectedNonce {
            nonce,
            sender: self.public_key.unwrap_or(data.sender_public_key),
            wallet_nonce: self.nonce.clone(),
            reversal,
        }
    }
}
