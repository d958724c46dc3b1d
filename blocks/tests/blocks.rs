use dpos_blocks::deserializer::deserialize;
use dpos_blocks::id::raw_id;
use dpos_blocks::{BlockData, BlockFactory, Clock};
use dpos_config::ConfigManager;
use dpos_crypto::keypair_from_passphrase;
use dpos_transactions::{TransactionBuilder, TypeRegistry};
use dpos_types::{Address, BigNumber, BlockId};

const DUMMY_BLOCK: &str = include_str!("fixtures/dummy_block.hex");
const DUMMY_BLOCK_ID: &str = "17605317082329008056";

struct FixedClock(u32);

impl Clock for FixedClock {
    fn now(&self) -> u32 {
        self.0
    }
}

fn late() -> FixedClock {
    FixedClock(u32::MAX)
}

#[test]
fn decodes_reference_block() {
    let config = ConfigManager::devnet();
    let types = TypeRegistry::new();
    let clock = late();
    let factory = BlockFactory::new(&config, &types, &clock);

    let block = factory.from_hex(DUMMY_BLOCK.trim()).unwrap();

    assert_eq!(block.id().map(BlockId::as_str), Some(DUMMY_BLOCK_ID));
    assert_eq!(block.data.height, 1_760_000);
    assert_eq!(block.data.timestamp, 62_222_080);
    assert_eq!(block.data.previous_block, Some(BlockId::new("3112633353705641986")));
    assert_eq!(block.data.number_of_transactions, 7);
    assert_eq!(block.data.total_amount, BigNumber::from(10_500_000_000u64));
    assert_eq!(block.data.total_fee, BigNumber::from(70_000_000u64));
    assert_eq!(block.data.payload_length, 224);
    assert!(block.verification.verified, "{:?}", block.verification.errors);
    assert!(!block.verification.contains_multi_signatures);

    let lengths: Vec<_> = block.transactions.iter().map(|t| t.serialized.len()).collect();
    assert_eq!(lengths, vec![153, 154, 154, 154, 153, 154, 153]);
    for (i, tx) in block.transactions.iter().enumerate() {
        assert_eq!(tx.data.sequence, Some(i as u32));
        assert_eq!(tx.data.block_id.as_ref().map(BlockId::as_str), Some(DUMMY_BLOCK_ID));
        assert_eq!(tx.block_timestamp, Some(62_222_080));
    }
    assert_eq!(
        block.transactions[0].id.to_string(),
        "188b4d9d95a58e4e18d9ce9db28f2010323b90b5afd36a474d7ae7bf70772bb0"
    );
    assert_eq!(block.to_hex(), DUMMY_BLOCK.trim());
}

#[test]
fn header_only_decoding_skips_bodies() {
    let config = ConfigManager::devnet();
    let bytes = hex::decode(DUMMY_BLOCK.trim()).unwrap();

    let header = deserialize(&bytes, &config, true).unwrap();
    assert!(header.transactions.is_empty());
    assert!(header.data.block_signature.is_some());
    assert_eq!(raw_id(&header.data, &config).unwrap().as_str(), DUMMY_BLOCK_ID);

    let full = deserialize(&bytes, &config, false).unwrap();
    assert_eq!(full.transactions.len(), 7);
    assert_eq!(full.data, header.data);

    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(deserialize(&trailing, &config, false).is_err());
}

#[test]
fn future_block_timestamp_is_reported() {
    let config = ConfigManager::devnet();
    let types = TypeRegistry::new();
    let clock = FixedClock(0);

    let block = BlockFactory::new(&config, &types, &clock)
        .from_hex(DUMMY_BLOCK.trim())
        .unwrap();

    assert!(!block.verification.verified);
    assert_eq!(block.verification.errors, vec!["Invalid block timestamp".to_string()]);
}

#[test]
fn tampered_totals_are_reported() {
    let config = ConfigManager::devnet();
    let types = TypeRegistry::new();
    let clock = late();
    let factory = BlockFactory::new(&config, &types, &clock);

    let mut data = factory.from_hex(DUMMY_BLOCK.trim()).unwrap().to_data();
    data.total_fee = BigNumber::from(1u64);
    data.reward = BigNumber::from(5u64);
    let block = factory.from_data(data).unwrap();

    let errors = &block.verification.errors;
    assert!(errors.contains(&"Invalid block reward: 5 expected: 200000000".to_string()));
    assert!(errors.contains(&"Failed to verify block signature".to_string()));
    assert!(errors.contains(&"Invalid total fee".to_string()));
    assert!(!errors.contains(&"Invalid total amount".to_string()));
}

#[test]
fn make_signs_and_round_trips() {
    let config = ConfigManager::devnet();
    let types = TypeRegistry::new();
    let clock = late();
    let factory = BlockFactory::new(&config, &types, &clock);
    let height = 100_000;

    let recipient = Address::new("D5q7YfEFDky1JJVQQEy4MGyiUhr5cGg47F");
    let txs: Vec<_> = [300u64, 100, 200]
        .into_iter()
        .map(|amount| {
            TransactionBuilder::transfer(&config, &types, height)
                .timestamp(1_000)
                .amount(amount)
                .recipient_id(recipient.clone())
                .sign("sender")
                .unwrap()
                .build()
                .unwrap()
                .data
        })
        .collect();
    let first_id = txs[0].id.unwrap();

    let keys = keypair_from_passphrase("forger").unwrap();
    let data = BlockData {
        id: None,
        version: 0,
        timestamp: 2_000,
        height,
        previous_block: Some(BlockId::new("12345")),
        number_of_transactions: 0,
        total_amount: BigNumber::zero(),
        total_fee: BigNumber::zero(),
        reward: BigNumber::from(200_000_000u64),
        payload_length: 0,
        payload_hash: Default::default(),
        generator_public_key: keys.public,
        block_signature: None,
        transactions: txs,
    };

    let block = factory.make(data, &keys).unwrap();
    assert!(block.verification.verified, "{:?}", block.verification.errors);
    assert_eq!(block.data.number_of_transactions, 3);
    assert_eq!(block.data.total_amount, BigNumber::from(600u64));
    assert_eq!(block.data.payload_length, 96);

    let again = factory.from_bytes(&block.serialized).unwrap();
    assert_eq!(again.id(), block.id());
    assert_eq!(again.transactions[0].id, first_id);
    assert_eq!(again.transactions[0].data.amount, BigNumber::from(300u64));
}

#[test]
fn duplicate_transactions_are_reported() {
    let config = ConfigManager::devnet();
    let types = TypeRegistry::new();
    let clock = late();
    let factory = BlockFactory::new(&config, &types, &clock);
    let height = 100_000;

    let tx = TransactionBuilder::transfer(&config, &types, height)
        .amount(1u64)
        .recipient_id(Address::new("D5q7YfEFDky1JJVQQEy4MGyiUhr5cGg47F"))
        .sign("sender")
        .unwrap()
        .build()
        .unwrap();

    let keys = keypair_from_passphrase("forger").unwrap();
    let data = BlockData {
        id: None,
        version: 0,
        timestamp: 2_000,
        height,
        previous_block: Some(BlockId::new("12345")),
        number_of_transactions: 0,
        total_amount: BigNumber::zero(),
        total_fee: BigNumber::zero(),
        reward: BigNumber::from(200_000_000u64),
        payload_length: 0,
        payload_hash: Default::default(),
        generator_public_key: keys.public,
        block_signature: None,
        transactions: vec![tx.data.clone(), tx.data.clone()],
    };

    let block = factory.make(data, &keys).unwrap();
    assert_eq!(
        block.verification.errors,
        vec![format!("Encountered duplicate transaction: {}", tx.id)]
    );
}

const OUTLOOK_MOCK: &str = r#"{
    "id": "8225244493039935740",
    "blockSignature": "3045022100a6605198e0f590c88798405bc76748d84e280d179bcefed2c993e70cded2a5dd022008c7f915b89fc4f3250fc4b481abb753c68f30ac351871c50bd6cfaf151370e8",
    "generatorPublicKey": "024c8247388a02ecd1de2a3e3fd5b7c61ecc2797fa3776599d558333ef1802d231",
    "height": 10,
    "numberOfTransactions": 0,
    "payloadHash": "578e820911f24e039733b45e4882b73e301f813a0d2c31330dafda84534ffa23",
    "payloadLength": 1,
    "previousBlock": "12123",
    "timestamp": 111150,
    "reward": 1,
    "totalAmount": 10,
    "totalFee": 1,
    "version": 6
}"#;

#[test]
fn outlook_table_only_rewrites_exact_matches() {
    let types = TypeRegistry::new();
    let clock = late();
    let data: BlockData = serde_json::from_str(OUTLOOK_MOCK).unwrap();

    // The given id is not what the header hashes to, so nothing is rewritten.
    let devnet = ConfigManager::devnet();
    let block = BlockFactory::new(&devnet, &types, &clock)
        .from_data(data.clone())
        .unwrap();
    assert_eq!(block.id().map(BlockId::as_str), Some("187940162505562345"));

    let patched = ConfigManager::from_json_str(
        r#"{
            "network": { "name": "patched", "pubKeyHash": 30 },
            "milestones": [{ "height": 1 }],
            "exceptions": { "outlookTable": { "187940162505562345": "1000062505562345" } }
        }"#,
    )
    .unwrap();
    let block = BlockFactory::new(&patched, &types, &clock)
        .from_data(data)
        .unwrap();
    assert_eq!(block.id().map(BlockId::as_str), Some("1000062505562345"));
}

const REORDER_ISSUE: &str = r#"{
    "version": 0,
    "timestamp": 25029544,
    "height": 3084276,
    "previousBlockHex": "63b315f3663e4299",
    "previousBlock": "7184109965722665625",
    "numberOfTransactions": 2,
    "totalAmount": 0,
    "totalFee": 600000000,
    "reward": 200000000,
    "payloadLength": 64,
    "payloadHash": "c2fa2d400b4c823873d476f6e0c9e423cf925e9b48f1b5706c7e2771d4095538",
    "generatorPublicKey": "02fa6902e91e127d6d3410f6abc271a79ae24029079caa0db5819757e3c1c1c5a4",
    "blockSignature": "30440220543f71d6f6445b703459b4f91d2c6f2446cbe6669e9c9008b1c77cc57073af2402206036fee3b434ffd5a31a579dd5b514a1c6384962291fda27b2463de903422834",
    "id": "11773170219525190460",
    "transactions": [
        {
            "id": "7a1a43098cd253db395514220f69e3b99afaabb2bfcf5ecfa3b99727b367344b",
            "network": 23,
            "type": 1,
            "timestamp": 25028279,
            "fee": 500000000,
            "amount": 0,
            "senderPublicKey": "02aadc3e0993c1d3447db27741745eb9c2c6522cccf02fc8efe3bf2d49708243dd",
            "signature": "3044022071f4f5281ba7be76e43df4ea9e74f820da761e1f9f3b168b3a6e42c55ccf343a02203629d94845709e31be20943e2cd26637f0d8ccfb4a59764d45c161a942def069",
            "asset": { "signature": { "publicKey": "02135e2ebd97d1f1ab5141b4269defc6e5650848062c40baaf869d72571526e6c6" } }
        },
        {
            "type": 3,
            "network": 23,
            "timestamp": 25028325,
            "senderPublicKey": "02aadc3e0993c1d3447db27741745eb9c2c6522cccf02fc8efe3bf2d49708243dd",
            "fee": 100000000,
            "amount": 0,
            "asset": { "votes": ["+020431436cf94f3c6a6ba566fe9e42678db8486590c732ca6c3803a10a86f50b92"] },
            "signature": "3045022100be28bdd7dc7117de903eccf97e3afbe87e1a32ee25b0b9bf814b35c6773ed51802202c8d62e708aa7afc08dbfcfd4640d105fe97337fb6145a8d916f2ce11c920255",
            "recipientId": "ANYiQJSPSoDT8U9Quh5vU8timD2RM7RS38",
            "id": "bace38ea544678f951cdd4abc269be24b4f5bab925ff6d5b480657952eb5aa65"
        }
    ]
}"#;

const MAINNET_LIKE: &str = r#"{
    "network": { "name": "mainnet", "pubKeyHash": 23 },
    "milestones": [
        { "height": 1, "reward": 0, "activeDelegates": 51, "blocktime": 8,
          "block": { "version": 0, "maxTransactions": 50, "maxPayload": 2097152 } },
        { "height": 75600, "reward": 200000000 }
    ]
}"#;

#[test]
fn transactions_keep_wire_order() {
    let config = ConfigManager::from_json_str(MAINNET_LIKE).unwrap();
    let types = TypeRegistry::new();
    let clock = late();
    let data: BlockData = serde_json::from_str(REORDER_ISSUE).unwrap();

    let block = BlockFactory::new(&config, &types, &clock).from_data(data).unwrap();

    assert_eq!(block.id().map(BlockId::as_str), Some("11773170219525190460"));
    assert!(block.verification.verified, "{:?}", block.verification.errors);
    assert_eq!(
        block.transactions[0].id.to_string(),
        "7a1a43098cd253db395514220f69e3b99afaabb2bfcf5ecfa3b99727b367344b"
    );
    assert_eq!(
        block.transactions[1].id.to_string(),
        "bace38ea544678f951cdd4abc269be24b4f5bab925ff6d5b480657952eb5aa65"
    );
    assert_eq!(block.transactions[1].data.sequence, Some(1));
}
