use std::{collections::BTreeMap, path::Path};

use chrono::{Days, NaiveDate};
use serde_json::Value;

use crate::{
    BulkOutcome, Category, CategoryFields, CategoryPatch, Expense, ExpenseFields, ExpenseFilter,
    ExpensePatch, ResultEngine, Store,
    stats::{self, BudgetStatus, StatisticsRegistry, Summary},
    util::{self, RECOGNIZED_CATEGORIES},
};

const SAMPLE_DESCRIPTIONS: [&str; 7] = [
    "Groceries",
    "Bus ticket",
    "Cinema",
    "Electricity bill",
    "New shoes",
    "Pharmacy",
    "Miscellaneous",
];

/// Entry point used by every adapter.
///
/// Wraps a [`Store`] and adds the statistics views on top of it. Named
/// statistics come from a [`StatisticsRegistry`], the built-in one unless
/// [`Tracker::with_statistics`] replaces it.
#[derive(Clone, Debug)]
pub struct Tracker {
    store: Store,
    statistics: StatisticsRegistry,
}

impl Tracker {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            statistics: StatisticsRegistry::new(),
        }
    }

    pub fn with_statistics(mut self, statistics: StatisticsRegistry) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn statistics(&self) -> &StatisticsRegistry {
        &self.statistics
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn add_expense(
        &self,
        amount: f64,
        category: &str,
        description: Option<&str>,
        date: Option<&str>,
    ) -> ResultEngine<Expense> {
        let mut fields = ExpenseFields::new(amount, category);
        fields.description = description.map(str::to_string);
        fields.date = date.map(str::to_string);
        self.store.add(fields).await
    }

    pub async fn add_fields(&self, fields: ExpenseFields) -> ResultEngine<Expense> {
        self.store.add(fields).await
    }

    pub async fn get_expense(&self, id: i32) -> ResultEngine<Expense> {
        self.store.get(id).await
    }

    pub async fn view_all(&self) -> ResultEngine<Vec<Expense>> {
        self.store.list_all().await
    }

    /// Aggregates over every expense, or over the ones matching `criteria`.
    pub async fn view_statistics(&self, criteria: Option<&ExpenseFilter>) -> ResultEngine<Summary> {
        let records = self.snapshot(criteria).await?;
        stats::summarize(&records)
    }

    /// Every registered statistic by name. A statistic that fails is
    /// reported as an `{"error": ..}` entry instead of failing the call.
    pub async fn custom_statistics(
        &self,
        criteria: Option<&ExpenseFilter>,
    ) -> ResultEngine<BTreeMap<String, Value>> {
        let records = self.snapshot(criteria).await?;
        Ok(self.statistics.compute_all(&records))
    }

    pub async fn compute_statistic(
        &self,
        name: &str,
        criteria: Option<&ExpenseFilter>,
    ) -> ResultEngine<Value> {
        let records = self.snapshot(criteria).await?;
        self.statistics.compute(name, &records)
    }

    /// Spending against the budget of every category record. `month` picks
    /// the month of the monthly figures and defaults to the current one.
    pub async fn budget_report(&self, month: Option<NaiveDate>) -> ResultEngine<Vec<BudgetStatus>> {
        let categories = self.store.list_categories().await?;
        let records = self.store.list_all().await?;
        stats::budget_report(&categories, &records, month.unwrap_or_else(util::today))
    }

    async fn snapshot(&self, criteria: Option<&ExpenseFilter>) -> ResultEngine<Vec<Expense>> {
        match criteria {
            Some(criteria) => self.store.filter(criteria).await,
            None => self.store.list_all().await,
        }
    }

    pub async fn create_category(&self, fields: CategoryFields) -> ResultEngine<Category> {
        self.store.create_category(fields).await
    }

    pub async fn get_category(&self, name: &str) -> ResultEngine<Category> {
        self.store.get_category(name).await
    }

    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        self.store.list_categories().await
    }

    pub async fn update_category(&self, name: &str, patch: CategoryPatch) -> ResultEngine<Category> {
        self.store.update_category(name, patch).await
    }

    pub async fn set_budget(&self, name: &str, limit: Option<f64>) -> ResultEngine<Category> {
        self.store.set_budget(name, limit).await
    }

    pub async fn delete_category(&self, name: &str) -> ResultEngine<()> {
        self.store.delete_category(name).await
    }

    pub async fn update_expense(&self, id: i32, patch: ExpensePatch) -> ResultEngine<Expense> {
        self.store.update(id, patch).await
    }

    pub async fn delete_expense(&self, id: i32) -> ResultEngine<()> {
        self.store.delete(id).await
    }

    pub async fn filter_expenses(&self, criteria: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        self.store.filter(criteria).await
    }

    pub async fn categories(&self) -> ResultEngine<Vec<String>> {
        self.store.categories().await
    }

    pub async fn bulk_add(&self, entries: Vec<ExpenseFields>) -> ResultEngine<BulkOutcome> {
        self.store.bulk_insert(entries).await
    }

    pub async fn import_json(&self, path: impl AsRef<Path>) -> ResultEngine<BulkOutcome> {
        self.store.import_from_json(path).await
    }

    pub async fn export_json(&self, path: impl AsRef<Path>) -> ResultEngine<usize> {
        self.store.export_to_json(path).await
    }

    pub async fn clear(&self) -> ResultEngine<u64> {
        self.store.clear().await
    }

    /// Stores `count` sample expenses dated within the 100 days up to
    /// `today`. The same arguments always produce the same data.
    pub async fn seed_sample_data(&self, count: usize, today: NaiveDate) -> ResultEngine<BulkOutcome> {
        let entries = (0..count).map(|i| sample_entry(i, today)).collect();
        self.store.bulk_insert(entries).await
    }
}

fn sample_entry(i: usize, today: NaiveDate) -> ExpenseFields {
    let slot = i % RECOGNIZED_CATEGORIES.len();
    // 5.00 ..= 204.75 in quarter steps
    let minor = 500 + ((i * 3_725) % 19_976) as i64 / 25 * 25;
    let date = today
        .checked_sub_days(Days::new(((i * 37) % 100) as u64))
        .unwrap_or(today);

    ExpenseFields::new(minor as f64 / 100.0, RECOGNIZED_CATEGORIES[slot])
        .description(SAMPLE_DESCRIPTIONS[slot])
        .date(&date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_entries_are_deterministic_and_valid() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        for i in 0..50 {
            let entry = sample_entry(i, today);
            assert_eq!(entry, sample_entry(i, today));
            let new = entry.validate(today).unwrap();
            assert!(new.amount().is_positive());
            assert!(new.date() <= today);
            assert!(new.date() > today - Days::new(100));
        }
    }
}
