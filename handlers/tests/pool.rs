mod common;

use common::*;
use dpos_crypto::address_from_public_key;
use dpos_handlers::{PoolErrorCode, PoolQuery};
use dpos_nullables::NullPool;
use dpos_state::WalletRepository;
use dpos_transactions::{
    Asset, CoreType, HtlcClaimAsset, LegacyMultiSignatureAsset, Transaction, TransactionBuilder,
    TransactionData, TypeGroup, Vote,
};
use dpos_types::{Bytes32, TransactionId};

fn admit(
    fx: &Fixture,
    tx: &Transaction,
    pool: &NullPool,
    wallets: &WalletRepository,
) -> Option<PoolErrorCode> {
    fx.registry
        .throw_if_cannot_enter_pool(tx, pool, wallets, &fx.ctx())
        .err()
        .map(|e| e.code)
}

fn second_signature(fx: &Fixture, nonce: u64) -> Transaction {
    TransactionBuilder::second_signature(&fx.config, &fx.types, fx.height, key(SECOND))
        .nonce(nonce)
        .sign(SENDER)
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn one_registration_per_sender_waits() {
    let fx = Fixture::new();
    let wallets = funded(SENDER, 10_000_000_000);
    let first = second_signature(&fx, 1);
    let second = second_signature(&fx, 2);

    let mut pool = NullPool::new();
    assert_eq!(admit(&fx, &first, &pool, &wallets), None);
    pool.add(first.clone());
    assert_eq!(pool.all_by_sender(&key(SENDER)).count(), 1);
    // The waiting transaction does not conflict with itself.
    assert_eq!(admit(&fx, &first, &pool, &wallets), None);
    assert_eq!(admit(&fx, &second, &pool, &wallets), Some(PoolErrorCode::Pending));

    pool.remove(&first.id);
    assert_eq!(admit(&fx, &second, &pool, &wallets), None);
}

#[test]
fn username_can_only_wait_once() {
    let fx = Fixture::new();
    let wallets = WalletRepository::new(NETWORK);
    let build = |passphrase: &str| {
        TransactionBuilder::delegate_registration(&fx.config, &fx.types, fx.height, "popular")
            .nonce(1u64)
            .sign(passphrase)
            .unwrap()
            .build()
            .unwrap()
    };
    let pool = NullPool::with([build(SENDER)]);

    let err = fx
        .registry
        .throw_if_cannot_enter_pool(&build(RECIPIENT), &pool, &wallets, &fx.ctx())
        .unwrap_err();
    assert_eq!(err.code, PoolErrorCode::Pending);
    assert_eq!(err.message, "Delegate registration for \"popular\" already in the pool");
}

#[test]
fn vote_for_unknown_delegate_conflicts() {
    let fx = Fixture::new();
    let mut wallets = funded(SENDER, 10_000_000_000);
    let known = seed_delegate(&mut wallets, "delegate passphrase", "known");
    let vote = |delegate| {
        TransactionBuilder::vote(&fx.config, &fx.types, fx.height, vec![Vote::vote(delegate)])
            .nonce(1u64)
            .sign(SENDER)
            .unwrap()
            .build()
            .unwrap()
    };
    let pool = NullPool::new();

    assert_eq!(admit(&fx, &vote(known), &pool, &wallets), None);
    assert_eq!(
        admit(&fx, &vote(key("stranger")), &pool, &wallets),
        Some(PoolErrorCode::Conflict)
    );
}

#[test]
fn transfer_to_another_network_is_refused() {
    let fx = Fixture::new();
    let wallets = funded(SENDER, 10_000_000_000);
    let mut tx = TransactionBuilder::transfer(&fx.config, &fx.types, fx.height)
        .nonce(1u64)
        .amount(1u64)
        .recipient_id(address(&wallets, RECIPIENT))
        .sign(SENDER)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(admit(&fx, &tx, &NullPool::new(), &wallets), None);

    tx.data.recipient_id = Some(address_from_public_key(&key(RECIPIENT), 23));
    assert_eq!(
        admit(&fx, &tx, &NullPool::new(), &wallets),
        Some(PoolErrorCode::InvalidRecipient)
    );
}

#[test]
fn claim_of_unknown_lock_is_refused() {
    let fx = Fixture::new();
    let wallets = WalletRepository::new(NETWORK);
    let tx = TransactionBuilder::htlc_claim(
        &fx.config,
        &fx.types,
        fx.height,
        HtlcClaimAsset {
            lock_transaction_id: TransactionId::new([4; 32]),
            unlock_secret: Bytes32([5; 32]),
        },
    )
    .nonce(1u64)
    .sign(RECIPIENT)
    .unwrap()
    .build()
    .unwrap();

    let err = fx
        .registry
        .throw_if_cannot_enter_pool(&tx, &NullPool::new(), &wallets, &fx.ctx())
        .unwrap_err();
    assert_eq!(err.code, PoolErrorCode::HtlcLockNotFound);
    assert_eq!(err.code.as_str(), "ERR_HTLCLOCKNOTFOUND");
}

#[test]
fn inactive_types_are_unsupported() {
    let mut fx = Fixture::new();
    let wallets = WalletRepository::new(NETWORK);
    let hash = "QmR45FmbVVrixReBwJkhEKde2qwHYaQzGxu4ZoDeswuF9w";
    let tx = TransactionBuilder::ipfs(&fx.config, &fx.types, fx.height, hash)
        .nonce(1u64)
        .sign(SENDER)
        .unwrap()
        .build()
        .unwrap();

    fx.height = 1;
    let err = fx
        .registry
        .throw_if_cannot_enter_pool(&tx, &NullPool::new(), &wallets, &fx.ctx())
        .unwrap_err();
    assert_eq!(err.code, PoolErrorCode::Unsupported);
    assert!(err.message.starts_with("Invalidating transaction of unsupported type"));
}

#[test]
fn legacy_multi_signature_is_deprecated() {
    let fx = Fixture::at_height(1);
    let wallets = WalletRepository::new(NETWORK);
    let mut data = TransactionData::new(
        TypeGroup::CORE,
        CoreType::MultiSignature.as_u16(),
        1,
        key(SENDER),
    );
    data.asset = Some(Asset::MultiSignatureLegacy(LegacyMultiSignatureAsset {
        min: 2,
        lifetime: 24,
        keysgroup: vec![format!("+{}", key("p one")), format!("+{}", key("p two"))],
    }));
    let tx = Transaction {
        id: TransactionId::new([8; 32]),
        data,
        serialized: Vec::new(),
        is_verified: true,
        block_timestamp: None,
    };

    assert_eq!(
        admit(&fx, &tx, &NullPool::new(), &wallets),
        Some(PoolErrorCode::Deprecated)
    );
}
