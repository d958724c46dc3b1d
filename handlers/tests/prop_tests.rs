mod common;

use common::*;
use dpos_transactions::TransactionBuilder;
use proptest::prelude::*;

const START: u64 = 1_000_000_000_000;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Reverting a run of transfers in reverse order restores every wallet.
    #[test]
    fn transfers_revert_to_the_starting_state(
        amounts in prop::collection::vec(1u64..1_000_000_000, 1..6),
    ) {
        let fx = Fixture::new();
        let mut wallets = funded(SENDER, START);
        let recipient = address(&wallets, RECIPIENT);

        let txs: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(i, value)| {
                TransactionBuilder::transfer(&fx.config, &fx.types, fx.height)
                    .nonce(i as u64 + 1)
                    .amount(*value)
                    .recipient_id(recipient.clone())
                    .sign(SENDER)
                    .unwrap()
                    .build()
                    .unwrap()
            })
            .collect();

        for tx in &txs {
            fx.apply(tx, &mut wallets).unwrap();
        }
        let sent: u64 = amounts.iter().sum();
        prop_assert_eq!(wallets.get_nonce(&key(SENDER)), amount(txs.len() as u64));
        prop_assert_eq!(
            wallets.get_by_address(&recipient).unwrap().balance.clone(),
            amount(sent)
        );

        for tx in txs.iter().rev() {
            fx.revert(tx, &mut wallets).unwrap();
        }
        let sender = wallets.get_by_public_key(&key(SENDER)).unwrap();
        prop_assert_eq!(sender.balance.clone(), amount(START));
        prop_assert_eq!(sender.nonce.clone(), amount(0));
        prop_assert!(wallets.get_by_address(&recipient).unwrap().balance.is_zero());
    }
}
