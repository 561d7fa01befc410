use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Amount, Category, Expense, ResultEngine, amount::overflow};

use super::month_key;

/// Spending of one category measured against its budgets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    /// Everything ever spent in the category.
    pub spent: Amount,
    pub budget_limit: Option<Amount>,
    /// `budget_limit - spent`; negative once the budget is exceeded.
    pub remaining: Option<Amount>,
    /// `YYYY-MM` of the month the monthly figures refer to.
    pub month: String,
    pub spent_in_month: Amount,
    pub monthly_budget: Option<Amount>,
    pub remaining_in_month: Option<Amount>,
    pub over_budget: bool,
}

/// One entry per category record, in the order given. `month` is any day of
/// the month to report on.
pub fn budget_report(
    categories: &[Category],
    records: &[Expense],
    month: NaiveDate,
) -> ResultEngine<Vec<BudgetStatus>> {
    let month = month_key(month);
    categories
        .iter()
        .map(|category| {
            let spent = spent_in(records, &category.name, None)?;
            let spent_in_month = spent_in(records, &category.name, Some(&month))?;
            let remaining = left_over(category.budget_limit, spent)?;
            let remaining_in_month = left_over(category.monthly_budget, spent_in_month)?;

            Ok(BudgetStatus {
                category: category.name.clone(),
                spent,
                budget_limit: category.budget_limit,
                remaining,
                month: month.clone(),
                spent_in_month,
                monthly_budget: category.monthly_budget,
                remaining_in_month,
                over_budget: [remaining, remaining_in_month]
                    .into_iter()
                    .flatten()
                    .any(|left| left < Amount::ZERO),
            })
        })
        .collect()
}

fn spent_in(records: &[Expense], category: &str, month: Option<&str>) -> ResultEngine<Amount> {
    Amount::checked_sum(
        records
            .iter()
            .filter(|e| e.category == category)
            .filter(|e| month.is_none_or(|month| month_key(e.date) == month))
            .map(|e| e.amount),
    )
}

fn left_over(budget: Option<Amount>, spent: Amount) -> ResultEngine<Option<Amount>> {
    budget
        .map(|budget| budget.checked_sub(spent).ok_or_else(overflow))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, limit: Option<i64>, monthly: Option<i64>) -> Category {
        Category {
            id: 1,
            name: name.to_string(),
            description: String::new(),
            budget_limit: limit.map(|v| Amount::from_minor(v * 100)),
            monthly_budget: monthly.map(|v| Amount::from_minor(v * 100)),
        }
    }

    fn expense(amount: i64, category: &str, month: u32, day: u32) -> Expense {
        Expense {
            id: 1,
            amount: Amount::from_minor(amount * 100),
            category: category.to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
        }
    }

    #[test]
    fn compares_spending_with_both_budgets() {
        let categories = [
            category("Food", Some(1000), Some(500)),
            category("Transport", Some(500), Some(100)),
            category("Entertainment", None, None),
        ];
        let records = [
            expense(100, "Food", 1, 15),
            expense(50, "Food", 2, 1),
            expense(150, "Transport", 2, 3),
            expense(300, "Entertainment", 2, 5),
        ];
        let report =
            budget_report(&categories, &records, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap())
                .unwrap();

        let food = &report[0];
        assert_eq!(food.spent, Amount::from_minor(15_000));
        assert_eq!(food.spent_in_month, Amount::from_minor(5_000));
        assert_eq!(food.remaining, Some(Amount::from_minor(85_000)));
        assert_eq!(food.month, "2024-02");
        assert!(!food.over_budget);

        let transport = &report[1];
        assert_eq!(transport.remaining_in_month, Some(Amount::from_minor(-5_000)));
        assert!(transport.over_budget);

        let entertainment = &report[2];
        assert_eq!(entertainment.remaining, None);
        assert!(!entertainment.over_budget);
    }

    #[test]
    fn zero_budget_is_exceeded_by_any_spending() {
        let report = budget_report(
            &[category("Bills", Some(0), None)],
            &[expense(1, "Bills", 3, 1)],
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .unwrap();
        assert!(report[0].over_budget);
    }
}
