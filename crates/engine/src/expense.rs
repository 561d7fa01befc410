//! Expense primitives.
//!
//! An [`Expense`] is a stored, validated record. Raw input arrives as
//! [`ExpenseFields`] (creation) or [`ExpensePatch`] (update) and must go
//! through validation before it can reach the database.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    Amount, EngineError, ResultEngine,
    util::{normalize_category, parse_date},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i32,
    pub amount: Amount,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Raw expense fields as they arrive from callers, files or the network.
///
/// Nothing here is trusted: [`ExpenseFields::validate`] turns it into a
/// [`NewExpense`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFields {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl ExpenseFields {
    pub fn new(amount: f64, category: &str) -> Self {
        Self {
            amount: Some(amount),
            category: Some(category.to_string()),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    /// Validate every field, filling the defaults (`description` empty,
    /// `date` = `today`).
    pub fn validate(self, today: NaiveDate) -> ResultEngine<NewExpense> {
        let amount = self
            .amount
            .ok_or_else(|| EngineError::InvalidAmount("amount is required".to_string()))
            .and_then(validate_amount)?;
        let category = self
            .category
            .as_deref()
            .ok_or_else(|| EngineError::InvalidCategory("category is required".to_string()))
            .and_then(normalize_category)?;
        let date = match non_blank(self.date.as_deref()) {
            Some(raw) => parse_date(raw)?,
            None => today,
        };

        Ok(NewExpense {
            amount,
            category,
            description: normalize_description(self.description.as_deref()),
            date,
        })
    }
}

/// A validated expense that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    amount: Amount,
    category: String,
    description: String,
    date: NaiveDate,
}

impl NewExpense {
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Partial update: only the supplied fields are validated and written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    pub(crate) fn validate(self) -> ResultEngine<ExpenseChanges> {
        Ok(ExpenseChanges {
            amount: self.amount.map(validate_amount).transpose()?,
            category: self.category.as_deref().map(normalize_category).transpose()?,
            description: self
                .description
                .as_deref()
                .map(|d| normalize_description(Some(d))),
            date: self.date.as_deref().map(parse_date).transpose()?,
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct ExpenseChanges {
    amount: Option<Amount>,
    category: Option<String>,
    description: Option<String>,
    date: Option<NaiveDate>,
}

impl ExpenseChanges {
    pub(crate) fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }

    pub(crate) fn apply(self, active: &mut ActiveModel) {
        if let Some(amount) = self.amount {
            active.amount_minor = ActiveValue::Set(amount.minor());
        }
        if let Some(category) = self.category {
            active.category = ActiveValue::Set(category);
        }
        if let Some(description) = self.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(date) = self.date {
            active.date = ActiveValue::Set(date);
        }
    }
}

fn validate_amount(value: f64) -> ResultEngine<Amount> {
    let amount = Amount::from_f64(value)?;
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
    }
    Ok(amount)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn normalize_description(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub amount_minor: i64,
    pub category: String,
    pub description: String,
    pub date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&NewExpense> for ActiveModel {
    fn from(expense: &NewExpense) -> Self {
        Self {
            id: ActiveValue::NotSet,
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            category: ActiveValue::Set(expense.category.clone()),
            description: ActiveValue::Set(expense.description.clone()),
            date: ActiveValue::Set(expense.date),
        }
    }
}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            amount: Amount::from_minor(model.amount_minor),
            category: model.category,
            description: model.description,
            date: model.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn validate_fills_defaults() {
        let new = ExpenseFields::new(100.5, "Food").validate(today()).unwrap();
        assert_eq!(new.amount().minor(), 10050);
        assert_eq!(new.category(), "Food");
        assert_eq!(new.description(), "");
        assert_eq!(new.date(), today());
    }

    #[test]
    fn validate_keeps_supplied_values() {
        let new = ExpenseFields::new(50.0, "Food")
            .description("Groceries")
            .date("2024-01-15")
            .validate(today())
            .unwrap();
        assert_eq!(new.description(), "Groceries");
        assert_eq!(new.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in [0.0, -5.0, -0.01] {
            let err = ExpenseFields::new(amount, "Food")
                .validate(today())
                .unwrap_err();
            assert_eq!(
                err,
                EngineError::InvalidAmount("amount must be > 0".to_string())
            );
        }
    }

    #[test]
    fn missing_amount_or_category_is_rejected() {
        let no_amount = ExpenseFields {
            category: Some("Food".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            no_amount.validate(today()),
            Err(EngineError::InvalidAmount(_))
        ));

        let no_category = ExpenseFields {
            amount: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            no_category.validate(today()),
            Err(EngineError::InvalidCategory(_))
        ));

        assert!(matches!(
            ExpenseFields::new(10.0, "").validate(today()),
            Err(EngineError::InvalidCategory(_))
        ));
    }

    #[test]
    fn unparsable_date_is_rejected() {
        let err = ExpenseFields::new(10.0, "Food")
            .date("15/01/2024")
            .validate(today())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDate(_)));
    }

    #[test]
    fn blank_date_means_today() {
        let new = ExpenseFields::new(10.0, "Food")
            .date("  ")
            .validate(today())
            .unwrap();
        assert_eq!(new.date(), today());
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        let changes = ExpensePatch {
            description: Some("Dinner".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert!(changes.amount.is_none());
        assert_eq!(changes.description.as_deref(), Some("Dinner"));

        let err = ExpensePatch {
            amount: Some(-1.0),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.is_validation());
    }
}
