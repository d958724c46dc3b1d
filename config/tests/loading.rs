use dpos_config::{ConfigError, ConfigManager};
use dpos_types::BigNumber;
use std::io::Write;

const TOML: &str = r#"
[network]
name = "testnet"
pubKeyHash = 23

[[milestones]]
height = 1
reward = 0
activeDelegates = 51
aip11 = true

[milestones.block]
maxTransactions = 500

[[milestones]]
height = 100
reward = 200000000
htlcEnabled = true

[exceptions.outlookTable]
"123" = "456"
"#;

#[test]
fn loads_toml_from_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(TOML.as_bytes()).unwrap();

    let config = ConfigManager::load(file.path()).unwrap();
    assert_eq!(config.network().name, "testnet");
    assert_eq!(config.pub_key_hash(), 23);

    let m = config.milestone(150);
    assert!(m.aip11);
    assert!(m.htlc_enabled);
    assert_eq!(m.reward, BigNumber::from(200_000_000u64));
    assert_eq!(m.block.max_transactions, 500);
    assert_eq!(config.exceptions().outlook_replacement("123"), Some("456"));
}

#[test]
fn loads_json_from_file() {
    let json = r#"{
        "network": { "name": "unit", "pubKeyHash": 30 },
        "milestones": [{ "height": 1, "aip37": true, "block": { "idFullSha256": true } }]
    }"#;
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let config = ConfigManager::load(file.path()).unwrap();
    assert!(config.milestone(1).aip37);
    assert!(config.milestone(1).block.id_full_sha256);
    assert!(config.genesis_block().is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = ConfigManager::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn empty_milestones_rejected() {
    let json = r#"{ "network": { "name": "x", "pubKeyHash": 1 }, "milestones": [] }"#;
    assert!(matches!(
        ConfigManager::from_json_str(json),
        Err(ConfigError::NoMilestones)
    ));
}

#[test]
fn epoch_parses_to_unix_seconds() {
    let config = ConfigManager::devnet();
    assert_eq!(config.network().epoch_unix().unwrap(), 1_490_101_200);

    let json = r#"{
        "network": { "name": "x", "pubKeyHash": 1, "epoch": "yesterday" },
        "milestones": [{ "height": 1 }]
    }"#;
    let config = ConfigManager::from_json_str(json).unwrap();
    assert!(matches!(config.network().epoch_unix(), Err(ConfigError::InvalidEpoch(_))));
}
