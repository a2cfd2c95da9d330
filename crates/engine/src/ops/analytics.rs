use crate::ResultEngine;
use crate::analytics::TxRecord;

use super::{Engine, TransactionListFilter};

impl Engine {
    /// Loads the records the reporting reducers consume, applying the same
    /// filters as transaction listings.
    pub async fn transaction_records(
        &self,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<TxRecord>> {
        let rows = self.list_all_transactions(filter).await?;
        Ok(rows
            .into_iter()
            .map(|(tx, category)| TxRecord {
                kind: tx.kind,
                amount_minor: tx.amount_minor,
                date: tx.transaction_date,
                category: category.name,
                payment_method: tx.payment_method,
            })
            .collect())
    }
}
