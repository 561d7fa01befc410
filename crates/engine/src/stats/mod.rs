//! Read-only aggregations over a snapshot of expenses.
//!
//! Every function here is pure: it only looks at the slice it is given,
//! which is either the whole store or the result of a filter. Sums are
//! checked and fail with [`EngineError::AmountOverflow`] instead of
//! wrapping.
//!
//! [`EngineError::AmountOverflow`]: crate::EngineError::AmountOverflow

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Amount, Expense, ResultEngine, amount::overflow};

mod budget;
mod registry;

pub use budget::{BudgetStatus, budget_report};
pub use registry::{Statistic, StatisticsRegistry};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub total: Amount,
    pub average: Amount,
    pub min: Option<Amount>,
    pub max: Option<Amount>,
    pub by_category: BTreeMap<String, Amount>,
    /// Subtotals keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, Amount>,
}

pub fn total(records: &[Expense]) -> ResultEngine<Amount> {
    Amount::checked_sum(records.iter().map(|e| e.amount))
}

pub fn count(records: &[Expense]) -> usize {
    records.len()
}

/// `total / count`, rounded half away from zero to the cent.
///
/// An empty slice averages to zero.
pub fn average(records: &[Expense]) -> ResultEngine<Amount> {
    if records.is_empty() {
        return Ok(Amount::ZERO);
    }
    let total = i128::from(total(records)?.minor());
    let n = records.len() as i128;
    let rounded = if total >= 0 {
        (total + n / 2) / n
    } else {
        -((-total + n / 2) / n)
    };
    // |rounded| <= |total|, which came from an i64
    Ok(Amount::from_minor(rounded as i64))
}

pub fn min_max(records: &[Expense]) -> Option<(Amount, Amount)> {
    let min = records.iter().map(|e| e.amount).min()?;
    let max = records.iter().map(|e| e.amount).max()?;
    Some((min, max))
}

pub fn by_category(records: &[Expense]) -> ResultEngine<BTreeMap<String, Amount>> {
    group_by(records, |expense| expense.category.clone())
}

pub fn by_month(records: &[Expense]) -> ResultEngine<BTreeMap<String, Amount>> {
    group_by(records, |expense| month_key(expense.date))
}

pub fn summarize(records: &[Expense]) -> ResultEngine<Summary> {
    let bounds = min_max(records);
    Ok(Summary {
        count: count(records),
        total: total(records)?,
        average: average(records)?,
        min: bounds.map(|(min, _)| min),
        max: bounds.map(|(_, max)| max),
        by_category: by_category(records)?,
        by_month: by_month(records)?,
    })
}

/// `YYYY-MM` key of the month containing `date`.
pub(crate) fn month_key(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn group_by<F>(records: &[Expense], key: F) -> ResultEngine<BTreeMap<String, Amount>>
where
    F: Fn(&Expense) -> String,
{
    let mut out: BTreeMap<String, Amount> = BTreeMap::new();
    for expense in records {
        let slot = out.entry(key(expense)).or_default();
        *slot = slot.checked_add(expense.amount).ok_or_else(overflow)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::EngineError;

    fn expense(id: i32, amount: i64, category: &str, date: (i32, u32, u32)) -> Expense {
        Expense {
            id,
            amount: Amount::from_minor(amount * 100),
            category: category.to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(1, 100, "Food", (2024, 1, 15)),
            expense(2, 200, "Transport", (2024, 1, 16)),
            expense(3, 50, "Food", (2024, 1, 17)),
            expense(4, 300, "Entertainment", (2024, 2, 1)),
            expense(5, 150, "Food", (2024, 2, 15)),
        ]
    }

    #[test]
    fn totals_and_average() {
        let records = sample();
        assert_eq!(count(&records), 5);
        assert_eq!(total(&records).unwrap(), Amount::from_minor(80_000));
        assert_eq!(average(&records).unwrap(), Amount::from_minor(16_000));
    }

    #[test]
    fn by_category_sums_to_total() {
        let records = sample();
        let categories = by_category(&records).unwrap();
        assert_eq!(categories["Food"], Amount::from_minor(30_000));
        assert_eq!(categories["Transport"], Amount::from_minor(20_000));
        assert_eq!(categories["Entertainment"], Amount::from_minor(30_000));
        assert_eq!(
            Amount::checked_sum(categories.values().copied()).unwrap(),
            total(&records).unwrap()
        );
    }

    #[test]
    fn by_month_groups_by_calendar_month() {
        let months = by_month(&sample()).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months["2024-01"], Amount::from_minor(35_000));
        assert_eq!(months["2024-02"], Amount::from_minor(45_000));
    }

    #[test]
    fn empty_set_is_zero_not_error() {
        let summary = summarize(&[]).unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total, Amount::ZERO);
        assert_eq!(summary.average, Amount::ZERO);
        assert_eq!(summary.min, None);
        assert_eq!(summary.max, None);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn average_rounds_to_the_cent() {
        let records = vec![
            Expense {
                amount: Amount::from_minor(1),
                ..expense(1, 0, "Food", (2024, 1, 1))
            },
            Expense {
                amount: Amount::from_minor(2),
                ..expense(2, 0, "Food", (2024, 1, 1))
            },
        ];
        assert_eq!(average(&records).unwrap(), Amount::from_minor(2));
    }

    #[test]
    fn min_max_bounds() {
        assert_eq!(
            min_max(&sample()),
            Some((Amount::from_minor(5_000), Amount::from_minor(30_000)))
        );
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn huge_totals_fail_instead_of_wrapping() {
        let records: Vec<Expense> = (0..100_000)
            .map(|id| Expense {
                amount: Amount::from_minor(crate::amount::MAX_MINOR),
                ..expense(id, 0, "Food", (2024, 1, 1))
            })
            .collect();

        // 10^5 * 10^14 cents is past i64::MAX
        for result in [
            total(&records).map(|_| ()),
            average(&records).map(|_| ()),
            by_category(&records).map(|_| ()),
            by_month(&records).map(|_| ()),
            summarize(&records).map(|_| ()),
        ] {
            assert!(matches!(result, Err(EngineError::AmountOverflow(_))));
        }

        let fits = &records[..90];
        assert_eq!(
            average(fits).unwrap(),
            Amount::from_minor(crate::amount::MAX_MINOR)
        );
    }
}
