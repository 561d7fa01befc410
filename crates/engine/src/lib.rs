pub use amount::{Amount, MAX_MINOR};
pub use category::{Category, CategoryFields, CategoryPatch};
pub use error::EngineError;
pub use expense::{Expense, ExpenseFields, ExpensePatch, NewExpense};
pub use stats::{BudgetStatus, StatisticsRegistry, Summary};
pub use store::{BulkFailure, BulkOutcome, ExpenseFilter, FilterParams, Store, StoreBuilder};
pub use tracker::Tracker;
pub use util::{RECOGNIZED_CATEGORIES, parse_date, parse_month};

mod amount;
mod category;
mod error;
mod expense;
pub mod stats;
mod store;
mod tracker;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
