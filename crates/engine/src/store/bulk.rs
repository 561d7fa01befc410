use sea_orm::{TransactionTrait, prelude::*};
use serde::Serialize;

use crate::{Expense, ExpenseFields, ResultEngine, expense, util};

use super::{Store, with_tx};

/// Result of a batch write: what was stored and what was rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub inserted: Vec<Expense>,
    pub failures: Vec<BulkFailure>,
}

/// One rejected entry, identified by its position in the input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub index: usize,
    pub error: String,
}

impl BulkOutcome {
    pub fn inserted_count(&self) -> usize {
        self.inserted.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

impl Store {
    /// Validates each entry on its own and stores every valid one.
    ///
    /// Invalid entries never roll back valid ones.
    pub async fn bulk_insert(&self, entries: Vec<ExpenseFields>) -> ResultEngine<BulkOutcome> {
        self.insert_entries(entries.into_iter().map(Ok).collect())
            .await
    }

    /// Entries that already failed decoding are reported with their index
    /// like any validation failure.
    pub(super) async fn insert_entries(
        &self,
        entries: Vec<ResultEngine<ExpenseFields>>,
    ) -> ResultEngine<BulkOutcome> {
        let today = util::today();
        let mut valid = Vec::with_capacity(entries.len());
        let mut failures = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            match entry.and_then(|fields| fields.validate(today)) {
                Ok(new) => valid.push(new),
                Err(err) => failures.push(BulkFailure {
                    index,
                    error: err.to_string(),
                }),
            }
        }

        let inserted = if valid.is_empty() {
            Vec::new()
        } else {
            with_tx!(self, |db_tx| {
                let mut inserted = Vec::with_capacity(valid.len());
                for new in &valid {
                    let model = expense::ActiveModel::from(new).insert(&db_tx).await?;
                    inserted.push(Expense::from(model));
                }
                Ok::<_, crate::EngineError>(inserted)
            })?
        };

        tracing::info!(
            inserted = inserted.len(),
            failed = failures.len(),
            "bulk insert finished"
        );

        Ok(BulkOutcome { inserted, failures })
    }
}
