//! Category records with optional spending budgets.
//!
//! Expenses reference categories by label only; a [`Category`] row is
//! needed just to attach a description or a budget to a label.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Amount, EngineError, ResultEngine, util::normalize_category};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Ceiling for all spending in the category.
    pub budget_limit: Option<Amount>,
    /// Ceiling for the spending of a single calendar month.
    pub monthly_budget: Option<Amount>,
}

/// Raw category input. Budgets are decimal numbers and may be zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
    pub budget_limit: Option<f64>,
    pub monthly_budget: Option<f64>,
}

impl CategoryFields {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn budget_limit(mut self, limit: f64) -> Self {
        self.budget_limit = Some(limit);
        self
    }

    pub fn monthly_budget(mut self, limit: f64) -> Self {
        self.monthly_budget = Some(limit);
        self
    }

    pub(crate) fn validate(self) -> ResultEngine<ActiveModel> {
        Ok(ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(normalize_category(&self.name)?),
            description: ActiveValue::Set(
                self.description.as_deref().map(str::trim).unwrap_or_default().to_string(),
            ),
            budget_limit_minor: ActiveValue::Set(budget(self.budget_limit, "budget limit")?),
            monthly_budget_minor: ActiveValue::Set(budget(self.monthly_budget, "monthly budget")?),
        })
    }
}

/// Fields to change on a stored category. `None` leaves a field as is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub description: Option<String>,
    pub budget_limit: Option<f64>,
    pub monthly_budget: Option<f64>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn apply(self, active: &mut ActiveModel) -> ResultEngine<()> {
        if let Some(description) = self.description {
            active.description = ActiveValue::Set(description.trim().to_string());
        }
        if self.budget_limit.is_some() {
            active.budget_limit_minor =
                ActiveValue::Set(budget(self.budget_limit, "budget limit")?);
        }
        if self.monthly_budget.is_some() {
            active.monthly_budget_minor =
                ActiveValue::Set(budget(self.monthly_budget, "monthly budget")?);
        }
        Ok(())
    }
}

/// Validates an optional budget; zero is a valid budget.
fn budget(value: Option<f64>, label: &str) -> ResultEngine<Option<i64>> {
    let Some(value) = value else {
        return Ok(None);
    };
    if value < 0.0 {
        return Err(EngineError::InvalidBudget(format!(
            "{label} cannot be negative"
        )));
    }
    let amount = Amount::from_f64(value)
        .map_err(|err| EngineError::InvalidBudget(format!("{label}: {err}")))?;
    Ok(Some(amount.minor()))
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: String,
    pub budget_limit_minor: Option<i64>,
    pub monthly_budget_minor: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            budget_limit: model.budget_limit_minor.map(Amount::from_minor),
            monthly_budget: model.monthly_budget_minor.map(Amount::from_minor),
        }
    }
}
