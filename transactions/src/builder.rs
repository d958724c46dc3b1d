//! Fluent construction of signed transactions.
//!
//! ```ignore
//! let tx = TransactionBuilder::transfer(&config, &types, height)
//!     .recipient_id(recipient)
//!     .amount(BigNumber::from(1_000u64))
//!     .sign("passphrase")?
//!     .build()?;
//! ```

use crate::data::{
    Asset, DelegateAsset, HtlcClaimAsset, HtlcLockAsset, HtlcRefundAsset, MultiSignatureAsset,
    Payment, SecondSignatureAsset, Vote,
};
use crate::id::signing_hash;
use crate::registry::TypeRegistry;
use crate::serializer::SerializeOptions;
use crate::types::{CoreType, TypeGroup};
use crate::{CodecError, Transaction, TransactionData, TransactionFactory};
use dpos_config::ConfigManager;
use dpos_crypto::{address_from_public_key, keypair_from_passphrase, sign_ecdsa, sign_schnorr};
use dpos_types::{Address, BigNumber, PublicKey, SignatureBytes};

pub struct TransactionBuilder<'a> {
    config: &'a ConfigManager,
    types: &'a TypeRegistry,
    height: u32,
    data: TransactionData,
}

impl<'a> TransactionBuilder<'a> {
    fn new(config: &'a ConfigManager, types: &'a TypeRegistry, height: u32, core: CoreType) -> Self {
        let milestone = config.milestone(height);
        let version = match core {
            CoreType::Transfer
            | CoreType::SecondSignature
            | CoreType::DelegateRegistration
            | CoreType::Vote
                if !milestone.aip11 =>
            {
                1
            }
            _ => 2,
        };

        let sender = PublicKey([0u8; 33]);
        let mut data = TransactionData::new(TypeGroup::CORE, core.as_u16(), version, sender);
        data.network = Some(config.pub_key_hash());
        data.fee = BigNumber::from(milestone.static_fee(core.key()).unwrap_or(0));
        if version == 1 {
            data.timestamp = Some(0);
        } else {
            data.nonce = Some(BigNumber::zero());
        }

        Self {
            config,
            types,
            height,
            data,
        }
    }

    // ── Per-type constructors ──────────────────────────────────────────

    pub fn transfer(config: &'a ConfigManager, types: &'a TypeRegistry, height: u32) -> Self {
        Self::new(config, types, height, CoreType::Transfer)
    }

    pub fn second_signature(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        public_key: PublicKey,
    ) -> Self {
        Self::new(config, types, height, CoreType::SecondSignature)
            .asset(Asset::Signature(SecondSignatureAsset { public_key }))
    }

    pub fn delegate_registration(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        username: impl Into<String>,
    ) -> Self {
        Self::new(config, types, height, CoreType::DelegateRegistration).asset(Asset::Delegate(
            DelegateAsset {
                username: username.into(),
            },
        ))
    }

    pub fn vote(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        votes: Vec<Vote>,
    ) -> Self {
        Self::new(config, types, height, CoreType::Vote).asset(Asset::Votes(votes))
    }

    pub fn multi_signature(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        asset: MultiSignatureAsset,
    ) -> Self {
        let mut builder = Self::new(config, types, height, CoreType::MultiSignature)
            .asset(Asset::MultiSignature(asset.clone()));
        // Registration fees scale with the number of participants.
        let participants = BigNumber::from(asset.public_keys.len() as u64 + 1);
        builder.data.fee = builder.data.fee.clone() * participants;
        builder
    }

    pub fn ipfs(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        hash: impl Into<String>,
    ) -> Self {
        Self::new(config, types, height, CoreType::Ipfs).asset(Asset::Ipfs(hash.into()))
    }

    pub fn multi_payment(config: &'a ConfigManager, types: &'a TypeRegistry, height: u32) -> Self {
        Self::new(config, types, height, CoreType::MultiPayment).asset(Asset::Payments(Vec::new()))
    }

    pub fn delegate_resignation(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
    ) -> Self {
        Self::new(config, types, height, CoreType::DelegateResignation)
    }

    pub fn htlc_lock(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        asset: HtlcLockAsset,
    ) -> Self {
        Self::new(config, types, height, CoreType::HtlcLock).asset(Asset::Lock(asset))
    }

    pub fn htlc_claim(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        asset: HtlcClaimAsset,
    ) -> Self {
        Self::new(config, types, height, CoreType::HtlcClaim).asset(Asset::Claim(asset))
    }

    pub fn htlc_refund(
        config: &'a ConfigManager,
        types: &'a TypeRegistry,
        height: u32,
        asset: HtlcRefundAsset,
    ) -> Self {
        Self::new(config, types, height, CoreType::HtlcRefund).asset(Asset::Refund(asset))
    }

    // ── Field setters ──────────────────────────────────────────────────

    /// Switch version, moving between timestamp and nonce fields.
    pub fn version(mut self, version: u8) -> Self {
        self.data.version = version;
        if version == 1 {
            self.data.nonce = None;
            self.data.timestamp.get_or_insert(0);
        } else {
            self.data.timestamp = None;
            self.data.nonce.get_or_insert_with(BigNumber::zero);
        }
        self
    }

    pub fn network(mut self, network: u8) -> Self {
        self.data.network = Some(network);
        self
    }

    pub fn nonce(mut self, nonce: impl Into<BigNumber>) -> Self {
        self.data.nonce = Some(nonce.into());
        self
    }

    pub fn timestamp(mut self, timestamp: u32) -> Self {
        self.data.timestamp = Some(timestamp);
        self
    }

    pub fn fee(mut self, fee: impl Into<BigNumber>) -> Self {
        self.data.fee = fee.into();
        self
    }

    pub fn amount(mut self, amount: impl Into<BigNumber>) -> Self {
        self.data.amount = amount.into();
        self
    }

    pub fn recipient_id(mut self, recipient: Address) -> Self {
        self.data.recipient_id = Some(recipient);
        self
    }

    pub fn vendor_field(mut self, vendor_field: impl Into<String>) -> Self {
        self.data.vendor_field = Some(vendor_field.into());
        self
    }

    pub fn expiration(mut self, expiration: u32) -> Self {
        self.data.expiration = Some(expiration);
        self
    }

    /// Required before [`Self::multi_sign`] when the sender is a multi-signature wallet.
    pub fn sender_public_key(mut self, public_key: PublicKey) -> Self {
        self.data.sender_public_key = public_key;
        self
    }

    pub fn asset(mut self, asset: Asset) -> Self {
        self.data.asset = Some(asset);
        self
    }

    pub fn add_payment(mut self, amount: impl Into<BigNumber>, recipient: Address) -> Self {
        let payment = Payment {
            amount: amount.into(),
            recipient_id: recipient,
        };
        match &mut self.data.asset {
            Some(Asset::Payments(payments)) => payments.push(payment),
            _ => self.data.asset = Some(Asset::Payments(vec![payment])),
        }
        self
    }

    // ── Signing ────────────────────────────────────────────────────────

    /// Set the sender from `passphrase` and sign: ECDSA for version 1, Schnorr otherwise.
    pub fn sign(mut self, passphrase: &str) -> Result<Self, CodecError> {
        let keys = keypair_from_passphrase(passphrase)?;
        self.data.sender_public_key = keys.public;

        if self.data.version == 1 && self.data.is_core(CoreType::Vote) {
            let network = self.data.network.unwrap_or(self.config.pub_key_hash());
            self.data.recipient_id = Some(address_from_public_key(&keys.public, network));
        }

        let hash = self.hash(SerializeOptions::for_signature())?;
        self.data.signature = Some(self.sign_hash(&hash, &keys.private)?);
        Ok(self)
    }

    pub fn second_sign(mut self, second_passphrase: &str) -> Result<Self, CodecError> {
        let keys = keypair_from_passphrase(second_passphrase)?;
        let hash = self.hash(SerializeOptions::for_second_signature())?;
        self.data.second_signature = Some(self.sign_hash(&hash, &keys.private)?);
        Ok(self)
    }

    /// Add the participant signature at `index`, replacing an earlier one at that index.
    pub fn multi_sign(mut self, passphrase: &str, index: u8) -> Result<Self, CodecError> {
        let keys = keypair_from_passphrase(passphrase)?;
        let hash = self.hash(SerializeOptions::for_participants())?;
        let signature = sign_schnorr(&hash, &keys.private)?;

        let mut entry = Vec::with_capacity(65);
        entry.push(index);
        entry.extend_from_slice(signature.as_bytes());

        let signatures = self.data.signatures.get_or_insert_with(Vec::new);
        signatures.retain(|s| s.as_bytes().first() != Some(&index));
        signatures.push(SignatureBytes(entry));
        signatures.sort_by_key(|s| s.as_bytes().first().copied());
        Ok(self)
    }

    fn hash(&self, options: SerializeOptions) -> Result<[u8; 32], CodecError> {
        signing_hash(&self.data, self.types, self.config.exceptions(), options)
    }

    fn sign_hash(
        &self,
        hash: &[u8; 32],
        private: &dpos_types::PrivateKey,
    ) -> Result<SignatureBytes, CodecError> {
        let signature = if self.data.version == 1 {
            sign_ecdsa(hash, private)?
        } else {
            sign_schnorr(hash, private)?
        };
        Ok(signature)
    }

    // ── Output ─────────────────────────────────────────────────────────

    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    pub fn into_data(self) -> TransactionData {
        self.data
    }

    /// Run the document through [`TransactionFactory::from_data`].
    pub fn build(self) -> Result<Transaction, CodecError> {
        TransactionFactory::new(self.config, self.types, self.height).from_data(self.data)
    }
}
