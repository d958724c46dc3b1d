mod common;

use common::*;
use dpos_config::Milestone;
use dpos_handlers::{
    HandlerContext, RegistryError, TransactionError, TransactionHandler, TransactionHandlerRegistry,
};
use dpos_state::WalletRepository;
use dpos_transactions::bytes::{ByteReader, ByteWriter};
use dpos_transactions::{
    Asset, CodecError, CoreType, Transaction, TransactionData, TransactionKind, TypeGroup, TypeKey,
    TypeRegistry,
};
use dpos_types::TransactionId;
use serde_json::json;
use std::sync::Arc;

const BUSINESS_GROUP: TypeGroup = TypeGroup(1001);

/// A plugin type carrying a length-prefixed business name.
struct BusinessKind(u16);

impl TransactionKind for BusinessKind {
    fn type_group(&self) -> TypeGroup {
        BUSINESS_GROUP
    }

    fn type_id(&self) -> u16 {
        self.0
    }

    fn versions(&self) -> &'static [u8] {
        &[2]
    }

    fn key(&self) -> &'static str {
        "businessRegistration"
    }

    fn write_asset(&self, data: &TransactionData, w: &mut ByteWriter) -> Result<(), CodecError> {
        let name = match &data.asset {
            Some(Asset::Custom(value)) => value["name"].as_str().unwrap_or_default(),
            _ => "",
        };
        w.write_u8(name.len() as u8);
        w.write_bytes(name.as_bytes());
        Ok(())
    }

    fn read_asset(&self, data: &mut TransactionData, r: &mut ByteReader<'_>) -> Result<(), CodecError> {
        let len = r.read_u8()?;
        let name = String::from_utf8_lossy(r.read_bytes(usize::from(len))?).into_owned();
        data.asset = Some(Asset::Custom(json!({ "name": name })));
        Ok(())
    }
}

struct BusinessHandler {
    type_id: u16,
    dependencies: Vec<TypeKey>,
    /// Wire layout to register, when it differs from `type_id`.
    layout: Option<u16>,
}

impl BusinessHandler {
    fn new() -> Self {
        Self {
            type_id: 0,
            dependencies: vec![TypeKey::core(CoreType::DelegateRegistration, 2)],
            layout: None,
        }
    }
}

impl TransactionHandler for BusinessHandler {
    fn type_key(&self) -> TypeKey {
        TypeKey::new(BUSINESS_GROUP, self.type_id, 2)
    }

    fn descriptor(&self) -> Arc<dyn TransactionKind> {
        Arc::new(BusinessKind(self.layout.unwrap_or(self.type_id)))
    }

    fn dependencies(&self) -> Vec<TypeKey> {
        self.dependencies.clone()
    }

    fn is_activated(&self, milestone: &Milestone) -> bool {
        milestone.aip11
    }

    fn apply_to_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }

    fn revert_for_recipient(
        &self,
        _tx: &Transaction,
        _wallets: &mut WalletRepository,
        _ctx: &HandlerContext<'_>,
    ) -> Result<(), TransactionError> {
        Ok(())
    }
}

fn business_key() -> TypeKey {
    TypeKey::new(BUSINESS_GROUP, 0, 2)
}

fn core_registry() -> (TypeRegistry, TransactionHandlerRegistry) {
    let mut types = TypeRegistry::new();
    let registry = TransactionHandlerRegistry::with_core_handlers(&mut types).unwrap();
    (types, registry)
}

#[test]
fn custom_handler_registers_its_type() {
    let (mut types, mut registry) = core_registry();
    assert!(!types.contains(business_key()));

    registry
        .register_handler(Arc::new(BusinessHandler::new()), &mut types)
        .unwrap();
    assert!(types.contains(business_key()));
    assert_eq!(registry.len(), 17);
    assert_eq!(
        registry.registered_handlers().last().map(|h| h.type_key()),
        Some(business_key())
    );

    let err = registry
        .register_handler(Arc::new(BusinessHandler::new()), &mut types)
        .unwrap_err();
    assert_eq!(err, RegistryError::AlreadyRegistered(business_key()));
    assert_eq!(err.kind(), "TransactionHandlerAlreadyRegisteredError");

    registry.deregister(business_key(), &mut types).unwrap();
    assert!(!types.contains(business_key()));
    assert_eq!(
        registry.get_registered(business_key()).err(),
        Some(RegistryError::InvalidTransactionType(business_key()))
    );
}

#[test]
fn missing_dependency_is_refused() {
    let (mut types, mut registry) = core_registry();
    let missing = TypeKey::new(BUSINESS_GROUP, 9, 2);
    let handler = BusinessHandler {
        type_id: 0,
        dependencies: vec![missing],
        layout: None,
    };

    assert_eq!(
        registry.register_handler(Arc::new(handler), &mut types),
        Err(RegistryError::UnsatisfiedDependency {
            handler: business_key(),
            dependency: missing,
        })
    );
    assert!(!types.contains(business_key()));
}

#[test]
fn dependency_cycles_are_refused() {
    let (mut types, mut registry) = core_registry();
    let a = BusinessHandler {
        type_id: 0,
        dependencies: vec![TypeKey::new(BUSINESS_GROUP, 1, 2)],
        layout: None,
    };
    let b = BusinessHandler {
        type_id: 1,
        dependencies: vec![TypeKey::new(BUSINESS_GROUP, 0, 2)],
        layout: None,
    };

    let err = registry
        .register(vec![Arc::new(a), Arc::new(b)], &mut types)
        .unwrap_err();
    assert!(matches!(err, RegistryError::DependencyCycle(_)));
    assert_eq!(registry.len(), 16);
}

#[test]
fn taken_wire_layout_rejects_the_whole_batch() {
    let (mut types, mut registry) = core_registry();
    types.register(Arc::new(BusinessKind(7))).unwrap();
    let clashing = BusinessHandler {
        type_id: 3,
        dependencies: Vec::new(),
        layout: Some(7),
    };

    let err = registry
        .register(
            vec![Arc::new(BusinessHandler::new()), Arc::new(clashing)],
            &mut types,
        )
        .unwrap_err();
    assert_eq!(err.kind(), "TypeRegistryError");
    assert_eq!(registry.len(), 16);
    assert!(!types.contains(business_key()));
}

#[test]
fn batch_is_installed_dependencies_first() {
    let (mut types, mut registry) = core_registry();
    let dependent = BusinessHandler {
        type_id: 1,
        dependencies: vec![business_key()],
        layout: None,
    };

    registry
        .register(
            vec![Arc::new(dependent), Arc::new(BusinessHandler::new())],
            &mut types,
        )
        .unwrap();
    let custom: Vec<TypeKey> = registry
        .registered_handlers()
        .map(|h| h.type_key())
        .filter(|key| key.type_group == BUSINESS_GROUP)
        .collect();
    assert_eq!(custom, vec![business_key(), TypeKey::new(BUSINESS_GROUP, 1, 2)]);
}

#[test]
fn custom_transactions_use_the_generic_sender_rules() {
    let mut fx = Fixture::new();
    fx.registry
        .register_handler(Arc::new(BusinessHandler::new()), &mut fx.types)
        .unwrap();
    let mut wallets = funded(SENDER, 1_000);

    let mut data = TransactionData::new(BUSINESS_GROUP, 0, 2, key(SENDER));
    data.nonce = Some(amount(1));
    data.fee = amount(300);
    data.asset = Some(Asset::Custom(json!({ "name": "acme" })));
    let tx = Transaction {
        id: TransactionId::new([3; 32]),
        data,
        serialized: Vec::new(),
        is_verified: true,
        block_timestamp: None,
    };

    fx.apply(&tx, &mut wallets).unwrap();
    let sender = wallets.get_by_public_key(&key(SENDER)).unwrap();
    assert_eq!(sender.balance, amount(700));
    assert_eq!(sender.nonce, amount(1));

    fx.revert(&tx, &mut wallets).unwrap();
    assert_eq!(wallets.get_by_public_key(&key(SENDER)).unwrap().balance, amount(1_000));

    fx.height = 1;
    assert!(fx
        .registry
        .get(tx.type_key(), fx.config.milestone(fx.height))
        .is_err());
}
