//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`], [`InvalidCategory`], [`InvalidDate`] thrown when an
//!   expense field does not pass validation.
//! - [`InvalidFilter`] thrown when filter criteria are inconsistent.
//! - [`InvalidBudget`] thrown when a category budget is negative.
//! - [`KeyNotFound`] thrown when an expense, category or statistic is not
//!   stored.
//! - [`ExistingKey`] thrown when a category or statistic name is taken.
//! - [`AmountOverflow`] thrown when an aggregate leaves the `i64` range.
//! - [`Import`] thrown when an import file cannot be read as a JSON array.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidCategory`]: EngineError::InvalidCategory
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidFilter`]: EngineError::InvalidFilter
//!  [`InvalidBudget`]: EngineError::InvalidBudget
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`AmountOverflow`]: EngineError::AmountOverflow
//!  [`Import`]: EngineError::Import
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Invalid budget: {0}")]
    InvalidBudget(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already exists!")]
    ExistingKey(String),
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),
    #[error("Import failed: {0}")]
    Import(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors caused by caller input rather than storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_)
                | Self::InvalidCategory(_)
                | Self::InvalidDate(_)
                | Self::InvalidFilter(_)
                | Self::InvalidBudget(_)
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCategory(a), Self::InvalidCategory(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::InvalidBudget(a), Self::InvalidBudget(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::AmountOverflow(a), Self::AmountOverflow(b)) => a == b,
            (Self::Import(a), Self::Import(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
