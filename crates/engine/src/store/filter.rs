use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    Amount, EngineError, Expense, ResultEngine, expense,
    util::{normalize_category, parse_date},
};

use super::Store;

/// Criteria for selecting expenses.
///
/// Every bound is inclusive and every supplied criterion must hold; a
/// `None` criterion does not constrain the result.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<String>,
    pub min_amount: Option<Amount>,
    pub max_amount: Option<Amount>,
}

impl ExpenseFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Checks ranges and normalizes the category the same way stored
    /// categories are normalized.
    fn checked(&self) -> ResultEngine<ExpenseFilter> {
        if let (Some(start), Some(end)) = (self.start, self.end)
            && start > end
        {
            return Err(EngineError::InvalidFilter(
                "invalid range: start date must be <= end date".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount)
            && min > max
        {
            return Err(EngineError::InvalidFilter(
                "invalid range: min amount must be <= max amount".to_string(),
            ));
        }

        Ok(ExpenseFilter {
            category: self
                .category
                .as_deref()
                .map(normalize_category)
                .transpose()?,
            ..self.clone()
        })
    }
}

/// Filter criteria as raw strings/numbers, the way query strings and
/// command lines provide them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl TryFrom<FilterParams> for ExpenseFilter {
    type Error = EngineError;

    /// Sub-cent amount bounds round inward: a minimum of `10.005` keeps
    /// `10.01` and up, a maximum of `10.005` keeps `10.00` and below.
    fn try_from(params: FilterParams) -> Result<Self, Self::Error> {
        let bound = |value: Option<f64>, round: fn(f64) -> ResultEngine<Amount>, label: &str| {
            value
                .map(round)
                .transpose()
                .map_err(|err| EngineError::InvalidFilter(format!("{label}: {err}")))
        };

        Ok(Self {
            start: non_blank(params.start_date.as_deref())
                .map(parse_date)
                .transpose()?,
            end: non_blank(params.end_date.as_deref())
                .map(parse_date)
                .transpose()?,
            category: params.category.filter(|c| !c.trim().is_empty()),
            min_amount: bound(params.min_amount, Amount::ceil_f64, "min_amount")?,
            max_amount: bound(params.max_amount, Amount::floor_f64, "max_amount")?,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

trait ApplyExpenseFilter: QueryFilter + Sized {
    fn apply_expense_filter(self, filter: &ExpenseFilter) -> Self;
}

impl<T> ApplyExpenseFilter for T
where
    T: QueryFilter + Sized,
{
    fn apply_expense_filter(mut self, filter: &ExpenseFilter) -> Self {
        if let Some(start) = filter.start {
            self = self.filter(expense::Column::Date.gte(start));
        }
        if let Some(end) = filter.end {
            self = self.filter(expense::Column::Date.lte(end));
        }
        if let Some(category) = &filter.category {
            self = self.filter(expense::Column::Category.eq(category.as_str()));
        }
        if let Some(min) = filter.min_amount {
            self = self.filter(expense::Column::AmountMinor.gte(min.minor()));
        }
        if let Some(max) = filter.max_amount {
            self = self.filter(expense::Column::AmountMinor.lte(max.minor()));
        }
        self
    }
}

impl Store {
    /// Expenses matching every supplied criterion, in id order.
    pub async fn filter(&self, criteria: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        let criteria = criteria.checked()?;
        let rows = expense::Entity::find()
            .apply_expense_filter(&criteria)
            .order_by_asc(expense::Column::Id)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(Expense::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_convert_to_typed_filter() {
        let filter = ExpenseFilter::try_from(FilterParams {
            category: Some("Food".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
            min_amount: Some(10.5),
            max_amount: None,
        })
        .unwrap();

        assert_eq!(filter.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.category.as_deref(), Some("Food"));
        assert_eq!(filter.min_amount, Some(Amount::from_minor(1050)));
        assert!(filter.end.is_none());
    }

    #[test]
    fn sub_cent_bounds_round_inward() {
        let filter = ExpenseFilter::try_from(FilterParams {
            min_amount: Some(10.005),
            max_amount: Some(20.999),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.min_amount, Some(Amount::from_minor(1001)));
        assert_eq!(filter.max_amount, Some(Amount::from_minor(2099)));

        assert!(
            ExpenseFilter::try_from(FilterParams {
                min_amount: Some(f64::NAN),
                ..Default::default()
            })
            .is_err()
        );
    }

    #[test]
    fn blank_params_are_no_constraint() {
        let filter = ExpenseFilter::try_from(FilterParams {
            category: Some("  ".to_string()),
            start_date: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn bad_date_param_is_rejected() {
        let err = ExpenseFilter::try_from(FilterParams {
            start_date: Some("yesterday".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        let dates = ExpenseFilter {
            start: NaiveDate::from_ymd_opt(2024, 2, 1),
            end: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert!(matches!(
            dates.checked(),
            Err(EngineError::InvalidFilter(_))
        ));

        let amounts = ExpenseFilter {
            min_amount: Some(Amount::from_minor(500)),
            max_amount: Some(Amount::from_minor(100)),
            ..Default::default()
        };
        assert!(matches!(
            amounts.checked(),
            Err(EngineError::InvalidFilter(_))
        ));
    }

    #[test]
    fn checked_normalizes_category() {
        let filter = ExpenseFilter {
            category: Some(" food ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.checked().unwrap().category.as_deref(), Some("Food"));
    }
}
