//! Nullable pool: a plain list of waiting transactions.

use dpos_handlers::PoolQuery;
use dpos_transactions::Transaction;
use dpos_types::TransactionId;

#[derive(Default)]
pub struct NullPool {
    txs: Vec<Transaction>,
}

impl NullPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(txs: impl IntoIterator<Item = Transaction>) -> Self {
        Self {
            txs: txs.into_iter().collect(),
        }
    }

    pub fn add(&mut self, tx: Transaction) {
        self.txs.push(tx);
    }

    pub fn remove(&mut self, id: &TransactionId) -> Option<Transaction> {
        let position = self.txs.iter().position(|tx| &tx.id == id)?;
        Some(self.txs.remove(position))
    }

    pub fn len(&self) -> usize {
        self.txs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txs.is_empty()
    }
}

impl PoolQuery for NullPool {
    fn all(&self) -> Box<dyn Iterator<Item = &Transaction> + '_> {
        Box::new(self.txs.iter())
    }
}
