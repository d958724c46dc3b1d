use crate::{BlockData, BlockVerification};
use dpos_transactions::Transaction;
use dpos_types::BlockId;
use std::fmt;

/// A decoded block. `data.transactions` is empty; the decoded transactions
/// live in `transactions`, in wire order.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub data: BlockData,
    pub transactions: Vec<Transaction>,
    pub serialized: Vec<u8>,
    pub verification: BlockVerification,
}

impl Block {
    pub fn id(&self) -> Option<&BlockId> {
        self.data.id.as_ref()
    }

    pub fn height(&self) -> u32 {
        self.data.height
    }

    pub fn header(&self) -> &BlockData {
        &self.data
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.serialized)
    }

    /// The document form with transactions inlined.
    pub fn to_data(&self) -> BlockData {
        let mut data = self.data.clone();
        data.transactions = self.transactions.iter().map(|t| t.data.clone()).collect();
        data
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.data.id.as_ref().map(BlockId::as_str).unwrap_or("?");
        write!(
            f,
            "{id}, height: {}, {} transaction(s), verified: {}, errors: {}",
            self.data.height,
            self.data.number_of_transactions,
            self.verification.verified,
            self.verification.errors.join(", ")
        )
    }
}
