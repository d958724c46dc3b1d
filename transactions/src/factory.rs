//! Entry points that turn bytes or data documents into checked [`Transaction`]s.

use crate::deserializer::{apply_v1_compatibility, deserialize};
use crate::id::compute_id;
use crate::registry::TypeRegistry;
use crate::schema::{self, SchemaContext};
use crate::serializer::{serialize, SerializeOptions};
use crate::verifier;
use crate::{CodecError, Transaction, TransactionData};
use dpos_config::ConfigManager;
use dpos_types::TransactionId;

/// Builds transactions for the rules in force at `height`.
pub struct TransactionFactory<'a> {
    config: &'a ConfigManager,
    types: &'a TypeRegistry,
    height: u32,
}

impl<'a> TransactionFactory<'a> {
    pub fn new(config: &'a ConfigManager, types: &'a TypeRegistry, height: u32) -> Self {
        Self {
            config,
            types,
            height,
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Decode, compute the id, validate the schema and check the signature.
    ///
    /// A bad signature does not fail; it is recorded in `is_verified`.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Transaction, CodecError> {
        let mut data = deserialize(bytes, self.types)?;
        let id = compute_id(&data, self.types, self.config.exceptions())?;
        data.id = Some(id.clone());

        let exception = self.config.is_transaction_exception(&id);
        if !exception {
            if data.version == 1 && self.config.milestone(self.height).aip11 {
                return Err(CodecError::TransactionVersion(1));
            }
            self.validate(&data, &id)?;
        }

        let is_verified = verifier::verify(&data, self.types, self.config, self.height);
        if !is_verified {
            tracing::debug!(id = %id, "transaction signature did not verify");
        }

        Ok(Transaction {
            id,
            data,
            serialized: bytes.to_vec(),
            is_verified,
            block_timestamp: None,
        })
    }

    pub fn from_hex(&self, hex: &str) -> Result<Transaction, CodecError> {
        let bytes = hex::decode(hex)
            .map_err(|e| CodecError::MalformedTransactionBytes(format!("invalid hex: {e}")))?;
        self.from_bytes(&bytes)
    }

    /// Decode trusted bytes, such as rows already in the store.
    ///
    /// Legacy versions are accepted at any height, nothing is validated and the
    /// transaction is marked verified. A known `id` skips the hash.
    pub fn from_bytes_unsafe(
        &self,
        bytes: &[u8],
        id: Option<TransactionId>,
    ) -> Result<Transaction, CodecError> {
        let mut data = deserialize(bytes, self.types)?;
        let id = match id {
            Some(id) => id,
            None => compute_id(&data, self.types, self.config.exceptions())?,
        };
        data.id = Some(id.clone());
        Ok(Transaction {
            id,
            data,
            serialized: bytes.to_vec(),
            is_verified: true,
            block_timestamp: None,
        })
    }

    /// Validate a data document, encode it and decode it back through [`Self::from_bytes`].
    pub fn from_data(&self, mut data: TransactionData) -> Result<Transaction, CodecError> {
        data.network.get_or_insert(self.config.pub_key_hash());

        let exception = data
            .id
            .as_ref()
            .is_some_and(|id| self.config.is_transaction_exception(id));
        if !exception {
            let id = data.id.clone();
            self.validate_with(&data, id.as_ref())?;
        }

        if data.version == 1 {
            apply_v1_compatibility(&mut data);
        }
        let bytes = serialize(&data, self.types, SerializeOptions::default())?;
        self.from_bytes(&bytes)
    }

    fn validate(&self, data: &TransactionData, id: &TransactionId) -> Result<(), CodecError> {
        self.validate_with(data, Some(id))
    }

    fn validate_with(
        &self,
        data: &TransactionData,
        id: Option<&TransactionId>,
    ) -> Result<(), CodecError> {
        let kind = self.types.get(data.type_key())?;
        let ctx = SchemaContext {
            milestone: self.config.milestone(self.height),
            network: self.config.pub_key_hash(),
            genesis: id.is_some_and(|id| self.config.is_genesis_transaction(id)),
            require_signature: true,
        };
        schema::validate(data, kind.as_ref(), &ctx)
    }
}
