//! `(typeGroup, type, version)` → [`TransactionKind`].

use crate::kinds::{core_kinds, TransactionKind};
use crate::types::{TypeGroup, TypeKey};
use crate::{CodecError, TypeRegistryError};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of every transaction structure the codec can read and write.
///
/// Core kinds are installed by [`TypeRegistry::new`] and cannot be replaced or
/// removed. Kinds of other type groups come and go with their handlers.
#[derive(Clone)]
pub struct TypeRegistry {
    kinds: HashMap<TypeKey, Arc<dyn TransactionKind>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut kinds = HashMap::new();
        for kind in core_kinds() {
            for &version in kind.versions() {
                kinds.insert(TypeKey::new(kind.type_group(), kind.type_id(), version), kind.clone());
            }
        }
        Self { kinds }
    }

    pub fn register(&mut self, kind: Arc<dyn TransactionKind>) -> Result<(), TypeRegistryError> {
        self.check_registrable(kind.as_ref())?;
        for key in keys_of(kind.as_ref()) {
            self.kinds.insert(key, kind.clone());
        }
        tracing::debug!(kind = kind.key(), type_group = %kind.type_group(), "transaction type registered");
        Ok(())
    }

    /// Whether [`Self::register`] would accept `kind`, without registering it.
    pub fn check_registrable(&self, kind: &dyn TransactionKind) -> Result<(), TypeRegistryError> {
        if kind.type_group().is_core() {
            return Err(TypeRegistryError::CoreTransactionTypeGroupImmutable);
        }
        if keys_of(kind).iter().any(|k| self.kinds.contains_key(k)) {
            return Err(TypeRegistryError::AlreadyRegistered {
                key: kind.key().to_string(),
            });
        }
        Ok(())
    }

    /// Remove every version of a custom type.
    pub fn deregister(&mut self, type_group: TypeGroup, type_id: u16) -> Result<(), TypeRegistryError> {
        if type_group.is_core() {
            return Err(TypeRegistryError::CoreTransactionTypeGroupImmutable);
        }
        let before = self.kinds.len();
        self.kinds
            .retain(|k, _| !(k.type_group == type_group && k.type_id == type_id));
        if self.kinds.len() == before {
            return Err(TypeRegistryError::NotRegistered {
                type_group: type_group.0,
                type_id,
            });
        }
        Ok(())
    }

    pub fn get(&self, key: TypeKey) -> Result<&Arc<dyn TransactionKind>, CodecError> {
        self.kinds.get(&key).ok_or(CodecError::UnknownTransaction {
            type_group: key.type_group.0,
            type_id: key.type_id,
            version: key.version,
        })
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.kinds.contains_key(&key)
    }
}

fn keys_of(kind: &dyn TransactionKind) -> Vec<TypeKey> {
    kind.versions()
        .iter()
        .map(|&v| TypeKey::new(kind.type_group(), kind.type_id(), v))
        .collect()
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::{ByteReader, ByteWriter};
    use crate::types::CoreType;
    use crate::TransactionData;

    struct Marker;

    impl TransactionKind for Marker {
        fn type_group(&self) -> TypeGroup {
            TypeGroup(1001)
        }
        fn type_id(&self) -> u16 {
            0
        }
        fn versions(&self) -> &'static [u8] {
            &[2]
        }
        fn key(&self) -> &'static str {
            "marker"
        }
        fn write_asset(&self, _: &TransactionData, _: &mut ByteWriter) -> Result<(), CodecError> {
            Ok(())
        }
        fn read_asset(&self, _: &mut TransactionData, _: &mut ByteReader<'_>) -> Result<(), CodecError> {
            Ok(())
        }
    }

    #[test]
    fn core_versions_registered() {
        let registry = TypeRegistry::new();
        assert!(registry.contains(TypeKey::core(CoreType::Transfer, 1)));
        assert!(registry.contains(TypeKey::core(CoreType::Transfer, 2)));
        assert!(registry.contains(TypeKey::core(CoreType::MultiSignature, 1)));
        assert!(registry.contains(TypeKey::core(CoreType::MultiSignature, 2)));
        assert!(!registry.contains(TypeKey::core(CoreType::HtlcLock, 1)));
        assert_eq!(
            registry.get(TypeKey::core(CoreType::MultiSignature, 1)).unwrap().key(),
            "multiSignature"
        );
        assert!(matches!(
            registry.get(TypeKey::new(TypeGroup::CORE, 99, 2)),
            Err(CodecError::UnknownTransaction { type_id: 99, .. })
        ));
    }

    #[test]
    fn custom_register_and_deregister() {
        let mut registry = TypeRegistry::new();
        registry.register(Arc::new(Marker)).unwrap();
        assert!(registry.contains(TypeKey::new(TypeGroup(1001), 0, 2)));
        assert!(matches!(
            registry.register(Arc::new(Marker)),
            Err(TypeRegistryError::AlreadyRegistered { .. })
        ));
        registry.deregister(TypeGroup(1001), 0).unwrap();
        assert!(!registry.contains(TypeKey::new(TypeGroup(1001), 0, 2)));
        assert!(registry.deregister(TypeGroup(1001), 0).is_err());
    }

    #[test]
    fn core_group_is_immutable() {
        let mut registry = TypeRegistry::new();
        assert_eq!(
            registry.deregister(TypeGroup::CORE, 0),
            Err(TypeRegistryError::CoreTransactionTypeGroupImmutable)
        );
        assert!(matches!(
            registry.register(Arc::new(crate::kinds::TransferKind)),
            Err(TypeRegistryError::CoreTransactionTypeGroupImmutable)
        ));
    }
}
