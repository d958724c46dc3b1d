use dpos_state::{DelegateInfo, MultiSignatureInfo, Wallet, WalletAttribute};
use dpos_types::{Address, BigNumber};

#[test]
fn wallet_serializes_with_network_attribute_names() {
    let mut wallet = Wallet::new(Address::new("D61mfSggzbvQgTUe6JhYKH2doHaqJ3Dyib"));
    wallet.balance = BigNumber::from(25u64);
    let mut delegate = DelegateInfo::new("dummy");
    delegate.resigned = true;
    wallet.attributes.delegate = Some(delegate);

    let json = serde_json::to_value(&wallet).unwrap();
    assert_eq!(json["balance"], "25");
    assert_eq!(json["attributes"]["delegate"]["username"], "dummy");
    assert_eq!(json["attributes"]["delegate"]["voteBalance"], "0");
    assert_eq!(json["attributes"]["delegate"]["resigned"], true);
    assert!(json["attributes"].get("multiSignature").is_none());

    let back: Wallet = serde_json::from_value(json).unwrap();
    assert_eq!(back, wallet);
    assert!(back.is_resigned_delegate());
}

#[test]
fn legacy_multi_signature_flag_defaults_off() {
    let info: MultiSignatureInfo = serde_json::from_str(
        r#"{"min":1,"publicKeys":["034151a3ec46b5670a682b0a63394f863587d1bc97483b1b6c70eb58e7f0aed192"]}"#,
    )
    .unwrap();
    assert!(!info.legacy);
    assert_eq!(WalletAttribute::HtlcLockedBalance.path(), "htlc.lockedBalance");
}
