use dpos_crypto::address_from_public_key;
use dpos_transactions::deserializer::deserialize;
use dpos_transactions::serializer::serialize;
use dpos_transactions::{SerializeOptions, TransactionData, TypeGroup, TypeRegistry};
use dpos_types::{BigNumber, PublicKey};
use proptest::prelude::*;

fn sender() -> PublicKey {
    "03287bfebba4c7881a0509717e71b34b63f31e40021c321f89ae04f84be6d6ac37"
        .parse()
        .unwrap()
}

proptest! {
    #[test]
    fn transfer_round_trips(amount in 1u64.., fee in 0u64.., nonce in 0u64.., expiration in 0u32..) {
        let types = TypeRegistry::new();
        let mut data = TransactionData::new(TypeGroup::CORE, 0, 2, sender());
        data.network = Some(30);
        data.nonce = Some(BigNumber::from(nonce));
        data.fee = BigNumber::from(fee);
        data.amount = BigNumber::from(amount);
        data.expiration = (expiration > 0).then_some(expiration);
        data.recipient_id = Some(address_from_public_key(&sender(), 30));

        let bytes = serialize(&data, &types, SerializeOptions::default()).unwrap();
        let decoded = deserialize(&bytes, &types).unwrap();
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let types = TypeRegistry::new();
        let _ = deserialize(&bytes, &types);
    }

    #[test]
    fn header_prefix_never_panics(tail in proptest::collection::vec(any::<u8>(), 0..200)) {
        let types = TypeRegistry::new();
        let mut bytes = vec![0xff, 0x02, 30, 1, 0, 0, 0, 0, 0];
        bytes.extend(tail);
        let _ = deserialize(&bytes, &types);
    }
}
