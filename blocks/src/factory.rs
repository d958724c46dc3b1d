//! Building [`Block`]s from bytes, documents or a generator's keys.

use crate::deserializer::deserialize;
use crate::id::compute_id;
use crate::serializer::{serialize_header, serialize_with_bodies};
use crate::verifier::verify;
use crate::{Block, BlockData, BlockError, BlockVerification, Clock};
use dpos_config::ConfigManager;
use dpos_crypto::{sha256, sign_ecdsa};
use dpos_transactions::id::compute_id as transaction_id;
use dpos_transactions::serializer::serialize;
use dpos_transactions::{SerializeOptions, Transaction, TransactionFactory, TypeRegistry};
use dpos_types::{BigNumber, BlockId, Bytes32, KeyPair};
use rayon::prelude::*;

pub struct BlockFactory<'a> {
    config: &'a ConfigManager,
    types: &'a TypeRegistry,
    clock: &'a dyn Clock,
}

impl<'a> BlockFactory<'a> {
    pub fn new(config: &'a ConfigManager, types: &'a TypeRegistry, clock: &'a dyn Clock) -> Self {
        Self {
            config,
            types,
            clock,
        }
    }

    /// Sign `data` as the holder of `keys`.
    ///
    /// Totals, count, payload length and payload hash are derived from
    /// `data.transactions`; the generator key, signature and id are set.
    pub fn make(&self, mut data: BlockData, keys: &KeyPair) -> Result<Block, BlockError> {
        let exceptions = self.config.exceptions();
        let mut payload = Vec::with_capacity(data.transactions.len() * 32);
        let mut total_amount = BigNumber::zero();
        let mut total_fee = BigNumber::zero();
        for tx in &mut data.transactions {
            let id = match tx.id {
                Some(id) => id,
                None => transaction_id(tx, self.types, exceptions)?,
            };
            tx.id = Some(id);
            payload.extend_from_slice(id.as_bytes());
            total_amount += &tx.amount;
            total_fee += &tx.fee;
        }

        data.number_of_transactions = u32::try_from(data.transactions.len())
            .map_err(|_| BlockError::Schema("too many transactions".into()))?;
        data.total_amount = total_amount;
        data.total_fee = total_fee;
        data.payload_length = payload.len() as u32;
        data.payload_hash = Bytes32(sha256(&payload));
        data.generator_public_key = keys.public;

        let hash = sha256(&serialize_header(&data, self.config, false)?);
        data.block_signature = Some(sign_ecdsa(&hash, &keys.private)?);
        data.id = Some(compute_id(&data, self.config)?);

        self.from_data(data)
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Block, BlockError> {
        self.from_serialized(bytes, None)
    }

    pub fn from_hex(&self, hex: &str) -> Result<Block, BlockError> {
        let bytes =
            hex::decode(hex).map_err(|e| BlockError::Malformed(format!("invalid hex: {e}")))?;
        self.from_bytes(&bytes)
    }

    /// Encode a block document and decode it back. A given id is kept for the
    /// genesis block, whose recorded id does not match its header.
    pub fn from_data(&self, data: BlockData) -> Result<Block, BlockError> {
        let bodies = data
            .transactions
            .iter()
            .map(|tx| serialize(tx, self.types, SerializeOptions::default()))
            .collect::<Result<Vec<_>, _>>()?;
        let bytes = serialize_with_bodies(&data, &bodies, self.config)?;
        self.from_serialized(&bytes, data.id)
    }

    /// The configured genesis block, if any.
    pub fn genesis(&self) -> Result<Option<Block>, BlockError> {
        let Some(raw) = self.config.genesis_block() else {
            return Ok(None);
        };
        let data: BlockData = serde_json::from_value(raw.clone())
            .map_err(|e| BlockError::Schema(format!("genesis block: {e}")))?;
        self.from_data(data).map(Some)
    }

    fn from_serialized(&self, bytes: &[u8], given_id: Option<BlockId>) -> Result<Block, BlockError> {
        let decoded = deserialize(bytes, self.config, false)?;
        let mut data = decoded.data;
        if data.height == 0 {
            return Err(BlockError::Schema("height must be at least 1".into()));
        }

        data.id = match given_id {
            Some(id) if data.height == 1 => Some(id),
            _ => Some(compute_id(&data, self.config)?),
        };

        let factory = TransactionFactory::new(self.config, self.types, data.height);
        let mut transactions = decoded
            .transactions
            .par_iter()
            .map(|body| factory.from_bytes(body))
            .collect::<Result<Vec<Transaction>, _>>()?;

        for (sequence, tx) in transactions.iter_mut().enumerate() {
            tx.data.block_id = data.id.clone();
            tx.data.sequence = Some(sequence as u32);
            tx.block_timestamp = Some(data.timestamp);
        }

        let verification = match &data.id {
            Some(id) if self.config.is_block_exception(id) => {
                tracing::warn!(id = %id, height = data.height, "block is a configured exception, skipping verification");
                BlockVerification {
                    verified: true,
                    errors: Vec::new(),
                    contains_multi_signatures: transactions.iter().any(Transaction::has_multi_signatures),
                }
            }
            _ => verify(&data, &transactions, self.config, self.clock),
        };

        Ok(Block {
            data,
            transactions,
            serialized: bytes.to_vec(),
            verification,
        })
    }
}
