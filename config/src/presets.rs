//! Built-in network documents.

pub(crate) const DEVNET: &str = r#"{
    "network": {
        "name": "devnet",
        "pubKeyHash": 30,
        "wif": 170,
        "epoch": "2017-03-21T13:00:00.000Z",
        "nethash": "2a44f340d76ffc3df204c5f38cd355b7496c9065a1ade2ef92071436bd72e867",
        "token": "DARK",
        "symbol": "DѦ"
    },
    "milestones": [
        {
            "height": 1,
            "reward": 0,
            "activeDelegates": 51,
            "blocktime": 8,
            "block": { "version": 0, "maxTransactions": 150, "maxPayload": 2097152 },
            "fees": {
                "staticFees": {
                    "transfer": 10000000,
                    "secondSignature": 500000000,
                    "delegateRegistration": 2500000000,
                    "vote": 100000000,
                    "multiSignature": 500000000,
                    "ipfs": 500000000,
                    "multiPayment": 10000000,
                    "delegateResignation": 2500000000,
                    "htlcLock": 10000000,
                    "htlcClaim": 0,
                    "htlcRefund": 0
                }
            },
            "vendorFieldLength": 64,
            "multiPaymentLimit": 256
        },
        { "height": 75600, "reward": 200000000 },
        { "height": 2000000, "aip11": true, "htlcEnabled": true }
    ],
    "exceptions": {
        "outlookTable": {
            "8225244493039935740": "1000044493039935740"
        }
    }
}"#;
