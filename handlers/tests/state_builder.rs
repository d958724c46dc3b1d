mod common;

use common::*;
use dpos_blocks::BlockData;
use dpos_config::Exceptions;
use dpos_crypto::sha256;
use dpos_handlers::StateBuilder;
use dpos_state::WalletRepository;
use dpos_transactions::{
    HtlcClaimAsset, HtlcExpiration, HtlcExpirationType, HtlcLockAsset, Transaction,
    TransactionBuilder,
};
use dpos_types::{BigNumber, BlockId, Bytes32};
use std::collections::HashMap;

const FORGER: &str = "forger passphrase";
const REWARD: u64 = 100_000_000_000;
const SECRET: [u8; 32] = [42; 32];

fn block(height: u32, generator: &str, total_fee: u64) -> BlockData {
    BlockData {
        id: Some(BlockId::from(format!("{height:016}").as_str())),
        version: 0,
        timestamp: height * 8,
        height,
        previous_block: None,
        number_of_transactions: 0,
        total_amount: BigNumber::zero(),
        total_fee: amount(total_fee),
        reward: amount(REWARD),
        payload_length: 0,
        payload_hash: Bytes32([0; 32]),
        generator_public_key: key(generator),
        block_signature: None,
        transactions: Vec::new(),
    }
}

fn lock(fx: &Fixture, nonce: u64, value: u64) -> Transaction {
    let recipient = WalletRepository::new(NETWORK).address_of(&key(RECIPIENT));
    TransactionBuilder::htlc_lock(
        &fx.config,
        &fx.types,
        fx.height,
        HtlcLockAsset {
            secret_hash: Bytes32(sha256(&SECRET)),
            expiration: HtlcExpiration {
                expiration_type: HtlcExpirationType::BlockHeight,
                value: fx.height + 1_000,
            },
        },
    )
    .nonce(nonce)
    .amount(value)
    .recipient_id(recipient)
    .sign(FORGER)
    .unwrap()
    .build()
    .unwrap()
}

#[test]
fn rebuilds_balances_delegates_and_locks() {
    let fx = Fixture::new();
    let recipient = WalletRepository::new(NETWORK).address_of(&key(RECIPIENT));

    fx.blocks.push(block(2, FORGER, 30));
    fx.blocks.push(block(3, FORGER, 0));

    let transfer = TransactionBuilder::transfer(&fx.config, &fx.types, fx.height)
        .nonce(1u64)
        .amount(1_000u64)
        .recipient_id(recipient.clone())
        .sign(FORGER)
        .unwrap()
        .build()
        .unwrap();
    let registration =
        TransactionBuilder::delegate_registration(&fx.config, &fx.types, fx.height, "forger")
            .nonce(2u64)
            .sign(FORGER)
            .unwrap()
            .build()
            .unwrap();
    let claimed = lock(&fx, 3, 5_000);
    let open = lock(&fx, 4, 700);
    let claim = TransactionBuilder::htlc_claim(
        &fx.config,
        &fx.types,
        fx.height,
        HtlcClaimAsset {
            lock_transaction_id: claimed.id,
            unlock_secret: Bytes32(SECRET),
        },
    )
    .nonce(1u64)
    .sign(RECIPIENT)
    .unwrap()
    .build()
    .unwrap();

    for tx in [&transfer, &registration, &claimed, &open, &claim] {
        fx.transactions.confirm(tx.data.clone(), 3, 24);
    }

    let mut wallets = WalletRepository::new(NETWORK);
    let report = StateBuilder::new(&fx.registry, fx.ctx())
        .run(&mut wallets)
        .unwrap();

    assert!(report.is_clean());
    assert_eq!(report.handlers_bootstrapped, fx.registry.len());

    let spent: BigNumber = [&transfer, &registration, &claimed, &open]
        .iter()
        .map(|tx| &tx.data.amount + &tx.data.fee)
        .sum();
    let earned = amount(2 * REWARD + 30);
    let forger = wallets.get_by_public_key(&key(FORGER)).unwrap();
    assert_eq!(forger.balance, &earned - &spent);
    assert_eq!(forger.nonce, amount(4));
    assert_eq!(forger.locked_balance(), amount(700));
    assert!(forger.htlc().unwrap().locks.contains_key(&open.id));
    assert!(wallets.find_by_lock(&claimed.id).is_none());

    let delegate = forger.delegate().unwrap();
    assert_eq!(delegate.username, "forger");
    assert_eq!(delegate.produced_blocks, 2);
    assert_eq!(delegate.forged_fees, amount(30));
    assert_eq!(delegate.forged_rewards, amount(2 * REWARD));
    assert_eq!(delegate.last_block.as_ref().map(|b| b.height), Some(3));
    assert!(wallets.has_by_username("forger"));

    let credited = wallets.get_by_address(&recipient).unwrap();
    assert_eq!(credited.balance, amount(1_000 + 5_000));
    assert_eq!(credited.nonce, amount(1));
}

#[test]
fn reports_negative_balances() {
    let fx = Fixture::new();
    let recipient = WalletRepository::new(NETWORK).address_of(&key(RECIPIENT));
    let overspend = TransactionBuilder::transfer(&fx.config, &fx.types, fx.height)
        .nonce(1u64)
        .amount(1u64)
        .recipient_id(recipient)
        .sign(SENDER)
        .unwrap()
        .build()
        .unwrap();
    fx.transactions.confirm(overspend.data.clone(), 2, 8);

    let mut wallets = WalletRepository::new(NETWORK);
    let report = StateBuilder::new(&fx.registry, fx.ctx())
        .run(&mut wallets)
        .unwrap();

    let expected = -(&overspend.data.amount + &overspend.data.fee);
    assert_eq!(
        report.negative_balances,
        vec![(wallets.address_of(&key(SENDER)), expected)]
    );
    assert!(!report.is_clean());
}

#[test]
fn negative_balance_exception_must_match_exactly() {
    let mut fx = Fixture::new();
    let recipient = WalletRepository::new(NETWORK).address_of(&key(RECIPIENT));
    let overspend = TransactionBuilder::transfer(&fx.config, &fx.types, fx.height)
        .nonce(1u64)
        .amount(1u64)
        .recipient_id(recipient)
        .sign(SENDER)
        .unwrap()
        .build()
        .unwrap();
    fx.transactions.confirm(overspend.data.clone(), 2, 8);
    let debt = -(&overspend.data.amount + &overspend.data.fee);

    let allow = |balance: BigNumber| {
        let mut exceptions = Exceptions::default();
        exceptions.negative_balances.insert(
            key(SENDER),
            HashMap::from([("1".to_string(), balance)]),
        );
        exceptions
    };

    fx.config = fx.config.clone().with_exceptions(allow(debt.clone()));
    let mut wallets = WalletRepository::new(NETWORK);
    let report = StateBuilder::new(&fx.registry, fx.ctx())
        .run(&mut wallets)
        .unwrap();
    assert!(report.is_clean());

    // A deeper allowance than the balance actually reached is not a match.
    fx.config = fx.config.clone().with_exceptions(allow(&debt - &amount(1)));
    let mut wallets = WalletRepository::new(NETWORK);
    let report = StateBuilder::new(&fx.registry, fx.ctx())
        .run(&mut wallets)
        .unwrap();
    assert_eq!(
        report.negative_balances,
        vec![(wallets.address_of(&key(SENDER)), debt)]
    );
    assert!(report.negative_vote_balances.is_empty());
}
