use sea_orm::{DatabaseConnection, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{EngineError, Expense, ExpenseFields, ExpensePatch, ResultEngine, expense, util};

mod bulk;
mod categories;
mod filter;
mod json;

pub use bulk::{BulkFailure, BulkOutcome};
pub use filter::{ExpenseFilter, FilterParams};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Durable storage of expenses.
///
/// The store is the only owner of the expense table; everything it hands out
/// is a snapshot.
#[derive(Clone, Debug)]
pub struct Store {
    database: DatabaseConnection,
}

impl Store {
    /// Return a builder for `Store`. Help to build the struct.
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// Validates `fields`, assigns the next id and persists the expense.
    pub async fn add(&self, fields: ExpenseFields) -> ResultEngine<Expense> {
        let new = fields.validate(util::today())?;
        let model = expense::ActiveModel::from(&new)
            .insert(&self.database)
            .await?;
        tracing::debug!(id = model.id, "expense added");
        Ok(Expense::from(model))
    }

    pub async fn get(&self, id: i32) -> ResultEngine<Expense> {
        expense::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Expense::from)
            .ok_or_else(|| not_found(id))
    }

    /// Re-validates the supplied fields and merges them into the stored
    /// expense. An empty patch returns the expense unchanged.
    pub async fn update(&self, id: i32, patch: ExpensePatch) -> ResultEngine<Expense> {
        let changes = patch.validate()?;

        with_tx!(self, |db_tx| {
            let model = expense::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| not_found(id))?;

            let model = if changes.is_empty() {
                model
            } else {
                let mut active: expense::ActiveModel = model.into();
                changes.apply(&mut active);
                active.update(&db_tx).await?
            };

            Ok(Expense::from(model))
        })
    }

    pub async fn delete(&self, id: i32) -> ResultEngine<()> {
        let result = expense::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found(id));
        }
        tracing::debug!(id, "expense deleted");
        Ok(())
    }

    /// Deletes every expense and returns how many were removed.
    pub async fn clear(&self) -> ResultEngine<u64> {
        let result = expense::Entity::delete_many()
            .exec(&self.database)
            .await?;
        tracing::info!(removed = result.rows_affected, "expenses cleared");
        Ok(result.rows_affected)
    }

    /// All expenses in id (insertion) order.
    pub async fn list_all(&self) -> ResultEngine<Vec<Expense>> {
        let rows = expense::Entity::find()
            .order_by_asc(expense::Column::Id)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }

    pub async fn count(&self) -> ResultEngine<u64> {
        Ok(expense::Entity::find().count(&self.database).await?)
    }

    /// Distinct stored categories, sorted.
    pub async fn categories(&self) -> ResultEngine<Vec<String>> {
        let categories: Vec<String> = expense::Entity::find()
            .select_only()
            .column(expense::Column::Category)
            .distinct()
            .order_by_asc(expense::Column::Category)
            .into_tuple()
            .all(&self.database)
            .await?;
        Ok(categories)
    }
}

fn not_found(id: i32) -> EngineError {
    EngineError::KeyNotFound(format!("expense {id}"))
}

/// The builder for `Store`
#[derive(Default)]
pub struct StoreBuilder {
    database: DatabaseConnection,
}

impl StoreBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> StoreBuilder {
        self.database = db;
        self
    }

    /// Construct `Store`
    pub async fn build(self) -> ResultEngine<Store> {
        Ok(Store {
            database: self.database,
        })
    }
}
