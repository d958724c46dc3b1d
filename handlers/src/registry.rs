//! Handler registry: one handler per `(typeGroup, type, version)`.

use crate::context::HandlerContext;
use crate::handler::TransactionHandler;
use crate::handlers::core_handlers;
use crate::pool::{PoolError, PoolErrorCode, PoolQuery};
use crate::RegistryError;
use dpos_config::Milestone;
use dpos_state::{WalletAttribute, WalletRepository};
use dpos_transactions::{Transaction, TransactionData, TypeKey, TypeRegistry};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Registered handlers in dependency order.
///
/// Registering a handler of a custom type group also registers its wire
/// layout with the [`TypeRegistry`]; deregistering the last handler of a
/// custom type removes it again. The core group is fixed.
#[derive(Default)]
pub struct TransactionHandlerRegistry {
    handlers: HashMap<TypeKey, Arc<dyn TransactionHandler>>,
    order: Vec<TypeKey>,
    /// Wallet attributes in use, counted per declaring handler.
    attributes: BTreeMap<WalletAttribute, usize>,
}

impl TransactionHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every core handler.
    pub fn with_core_handlers(types: &mut TypeRegistry) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(core_handlers(), types)?;
        Ok(registry)
    }

    pub fn register_handler(
        &mut self,
        handler: Arc<dyn TransactionHandler>,
        types: &mut TypeRegistry,
    ) -> Result<(), RegistryError> {
        self.register(vec![handler], types)
    }

    /// Register a batch of handlers, each after the handlers it depends on.
    ///
    /// Nothing is registered unless the whole batch is acceptable: keys are
    /// unique, every dependency is in the batch or already registered,
    /// dependencies form no cycle and every custom wire layout is free.
    pub fn register(
        &mut self,
        batch: Vec<Arc<dyn TransactionHandler>>,
        types: &mut TypeRegistry,
    ) -> Result<(), RegistryError> {
        let mut pending: HashMap<TypeKey, Arc<dyn TransactionHandler>> = HashMap::new();
        let mut batch_order = Vec::with_capacity(batch.len());
        for handler in batch {
            let key = handler.type_key();
            if self.handlers.contains_key(&key) || pending.contains_key(&key) {
                return Err(RegistryError::AlreadyRegistered(key));
            }
            batch_order.push(key);
            pending.insert(key, handler);
        }

        for key in &batch_order {
            for dependency in pending[key].dependencies() {
                if !pending.contains_key(&dependency) && !self.handlers.contains_key(&dependency) {
                    return Err(RegistryError::UnsatisfiedDependency {
                        handler: *key,
                        dependency,
                    });
                }
            }
        }

        let mut marks = HashMap::new();
        let mut sorted = Vec::with_capacity(batch_order.len());
        for key in &batch_order {
            visit(*key, &pending, &mut marks, &mut sorted)?;
        }

        for key in &sorted {
            if !key.type_group.is_core() && !types.contains(*key) {
                types.check_registrable(pending[key].descriptor().as_ref())?;
            }
        }

        for key in sorted {
            if let Some(handler) = pending.remove(&key) {
                self.install(handler, types)?;
            }
        }
        Ok(())
    }

    /// Remove the handler of a custom type version.
    pub fn deregister(&mut self, key: TypeKey, types: &mut TypeRegistry) -> Result<(), RegistryError> {
        if key.type_group.is_core() {
            return Err(RegistryError::CoreTransactionTypeGroupImmutable(key));
        }
        let handler = self
            .handlers
            .remove(&key)
            .ok_or(RegistryError::InvalidTransactionType(key))?;
        self.order.retain(|k| *k != key);

        for attribute in handler.wallet_attributes() {
            if let Some(count) = self.attributes.get_mut(attribute) {
                *count -= 1;
                if *count == 0 {
                    self.attributes.remove(attribute);
                }
            }
        }

        if !self.has_type(key) && types.contains(key) {
            types.deregister(key.type_group, key.type_id)?;
        }
        tracing::debug!(handler = %key, "transaction handler deregistered");
        Ok(())
    }

    /// The handler for `key` if it is registered and active under `milestone`.
    pub fn get(
        &self,
        key: TypeKey,
        milestone: &Milestone,
    ) -> Result<&Arc<dyn TransactionHandler>, RegistryError> {
        let handler = self.get_registered(key)?;
        if !handler.is_activated(milestone) {
            return Err(RegistryError::DeactivatedTransactionHandler(key));
        }
        Ok(handler)
    }

    /// The handler for `key` regardless of activation.
    pub fn get_registered(&self, key: TypeKey) -> Result<&Arc<dyn TransactionHandler>, RegistryError> {
        self.handlers
            .get(&key)
            .ok_or(RegistryError::InvalidTransactionType(key))
    }

    pub fn get_activated_handler_for_data(
        &self,
        data: &TransactionData,
        milestone: &Milestone,
    ) -> Result<&Arc<dyn TransactionHandler>, RegistryError> {
        self.get(data.type_key(), milestone)
    }

    /// Every handler, dependencies before dependents.
    pub fn registered_handlers(&self) -> impl Iterator<Item = &Arc<dyn TransactionHandler>> {
        self.order.iter().filter_map(|key| self.handlers.get(key))
    }

    pub fn activated_handlers<'a>(
        &'a self,
        milestone: &'a Milestone,
    ) -> impl Iterator<Item = &'a Arc<dyn TransactionHandler>> + 'a {
        self.registered_handlers()
            .filter(move |handler| handler.is_activated(milestone))
    }

    pub fn wallet_attributes(&self) -> impl Iterator<Item = WalletAttribute> + '_ {
        self.attributes.keys().copied()
    }

    pub fn is_wallet_attribute(&self, attribute: WalletAttribute) -> bool {
        self.attributes.contains_key(&attribute)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Pool admission: an unknown or inactive type is unsupported, otherwise
    /// the handler decides.
    pub fn throw_if_cannot_enter_pool(
        &self,
        tx: &Transaction,
        pool: &dyn PoolQuery,
        wallets: &WalletRepository,
        ctx: &HandlerContext<'_>,
    ) -> Result<(), PoolError> {
        let handler = self.get(tx.type_key(), ctx.milestone()).map_err(|e| {
            PoolError::new(
                PoolErrorCode::Unsupported,
                format!("Invalidating transaction of unsupported type: {e}"),
            )
        })?;
        handler.throw_if_cannot_enter_pool(tx, pool, wallets, ctx)
    }

    fn install(
        &mut self,
        handler: Arc<dyn TransactionHandler>,
        types: &mut TypeRegistry,
    ) -> Result<(), RegistryError> {
        let key = handler.type_key();
        if !key.type_group.is_core() && !types.contains(key) {
            types.register(handler.descriptor())?;
        }
        for attribute in handler.wallet_attributes() {
            *self.attributes.entry(*attribute).or_default() += 1;
        }
        tracing::debug!(handler = %key, "transaction handler registered");
        self.handlers.insert(key, handler);
        self.order.push(key);
        Ok(())
    }

    /// Whether another version of `key`'s type still has a handler.
    fn has_type(&self, key: TypeKey) -> bool {
        self.handlers
            .keys()
            .any(|k| k.type_group == key.type_group && k.type_id == key.type_id)
    }
}

fn visit(
    key: TypeKey,
    pending: &HashMap<TypeKey, Arc<dyn TransactionHandler>>,
    marks: &mut HashMap<TypeKey, Mark>,
    sorted: &mut Vec<TypeKey>,
) -> Result<(), RegistryError> {
    match marks.get(&key) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(RegistryError::DependencyCycle(key)),
        None => {}
    }
    let Some(handler) = pending.get(&key) else {
        return Ok(());
    };
    marks.insert(key, Mark::Visiting);
    for dependency in handler.dependencies() {
        visit(dependency, pending, marks, sorted)?;
    }
    marks.insert(key, Mark::Done);
    sorted.push(key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpos_config::ConfigManager;
    use dpos_transactions::CoreType;

    #[test]
    fn core_handlers_register_in_dependency_order() {
        let mut types = TypeRegistry::new();
        let registry = TransactionHandlerRegistry::with_core_handlers(&mut types).unwrap();
        assert_eq!(registry.len(), 16);

        let order: Vec<TypeKey> = registry.registered_handlers().map(|h| h.type_key()).collect();
        let position = |key| order.iter().position(|k| *k == key).unwrap();
        assert!(
            position(TypeKey::core(CoreType::DelegateRegistration, 2))
                < position(TypeKey::core(CoreType::DelegateResignation, 2))
        );
        assert!(
            position(TypeKey::core(CoreType::HtlcLock, 2))
                < position(TypeKey::core(CoreType::HtlcClaim, 2))
        );
        assert!(registry.is_wallet_attribute(WalletAttribute::HtlcLockedBalance));
    }

    #[test]
    fn activation_follows_milestones() {
        let config = ConfigManager::devnet();
        let mut types = TypeRegistry::new();
        let registry = TransactionHandlerRegistry::with_core_handlers(&mut types).unwrap();

        let early = config.milestone(1);
        let late = config.milestone(2_000_000);
        let lock = TypeKey::core(CoreType::HtlcLock, 2);
        let legacy = TypeKey::core(CoreType::MultiSignature, 1);

        assert_eq!(
            registry.get(lock, early).err(),
            Some(RegistryError::DeactivatedTransactionHandler(lock))
        );
        assert!(registry.get(lock, late).is_ok());
        assert!(registry.get(legacy, early).is_ok());
        assert!(registry.get(legacy, late).is_err());
        assert_eq!(registry.activated_handlers(early).count(), 5);
    }

    #[test]
    fn core_group_cannot_be_removed() {
        let mut types = TypeRegistry::new();
        let mut registry = TransactionHandlerRegistry::with_core_handlers(&mut types).unwrap();
        let key = TypeKey::core(CoreType::Transfer, 2);
        assert_eq!(
            registry.deregister(key, &mut types),
            Err(RegistryError::CoreTransactionTypeGroupImmutable(key))
        );
        assert_eq!(
            registry.register_handler(Arc::new(crate::handlers::IpfsHandler), &mut types),
            Err(RegistryError::AlreadyRegistered(TypeKey::core(CoreType::Ipfs, 2)))
        );
    }
}
