use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::{Value, json};

use crate::{EngineError, Expense, ResultEngine};

/// A named aggregation over a snapshot of expenses.
///
/// Closures with the right signature are statistics already:
///
/// ```rust
/// use engine::stats::StatisticsRegistry;
///
/// let mut registry = StatisticsRegistry::empty();
/// registry
///     .register("distinct_days", |records: &[engine::Expense]| -> engine::ResultEngine<_> {
///         let mut days: Vec<_> = records.iter().map(|e| e.date).collect();
///         days.dedup();
///         Ok(serde_json::json!(days.len()))
///     })
///     .unwrap();
/// assert_eq!(registry.names(), ["distinct_days"]);
/// ```
pub trait Statistic: Send + Sync {
    fn compute(&self, records: &[Expense]) -> ResultEngine<Value>;
}

impl<F> Statistic for F
where
    F: Fn(&[Expense]) -> ResultEngine<Value> + Send + Sync,
{
    fn compute(&self, records: &[Expense]) -> ResultEngine<Value> {
        self(records)
    }
}

/// Statistics addressable by name, kept in registration order.
#[derive(Clone)]
pub struct StatisticsRegistry {
    entries: Vec<(String, Arc<dyn Statistic>)>,
}

impl StatisticsRegistry {
    /// A registry without any statistic.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// A registry with the built-in statistics: `total`, `count`,
    /// `average`, `min`, `max`, `by_category` and `by_month`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.push("total", builtin_total);
        registry.push("count", builtin_count);
        registry.push("average", builtin_average);
        registry.push("min", builtin_min);
        registry.push("max", builtin_max);
        registry.push("by_category", builtin_by_category);
        registry.push("by_month", builtin_by_month);
        registry
    }

    fn push(&mut self, name: &str, statistic: impl Statistic + 'static) {
        self.entries.push((name.to_string(), Arc::new(statistic)));
    }

    /// Adds `statistic` under `name`; a taken name is an `ExistingKey` error.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        statistic: impl Statistic + 'static,
    ) -> ResultEngine<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(EngineError::ExistingKey(format!("statistic {name}")));
        }
        tracing::debug!(%name, "statistic registered");
        self.entries.push((name, Arc::new(statistic)));
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> ResultEngine<()> {
        let position = self.position(name)?;
        self.entries.remove(position);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn compute(&self, name: &str, records: &[Expense]) -> ResultEngine<Value> {
        let position = self.position(name)?;
        self.entries[position].1.compute(records)
    }

    /// Runs every statistic. One that fails shows up as
    /// `{"error": "<message>"}` under its name; the others are unaffected.
    pub fn compute_all(&self, records: &[Expense]) -> BTreeMap<String, Value> {
        self.entries
            .iter()
            .map(|(name, statistic)| {
                let value = statistic.compute(records).unwrap_or_else(|err| {
                    tracing::warn!(%name, "statistic failed: {err}");
                    json!({ "error": err.to_string() })
                });
                (name.clone(), value)
            })
            .collect()
    }

    fn position(&self, name: &str) -> ResultEngine<usize> {
        self.entries
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| EngineError::KeyNotFound(format!("statistic {name}")))
    }
}

fn builtin_total(records: &[Expense]) -> ResultEngine<Value> {
    Ok(serde_json::to_value(super::total(records)?)?)
}

fn builtin_count(records: &[Expense]) -> ResultEngine<Value> {
    Ok(json!(super::count(records)))
}

fn builtin_average(records: &[Expense]) -> ResultEngine<Value> {
    Ok(serde_json::to_value(super::average(records)?)?)
}

fn builtin_min(records: &[Expense]) -> ResultEngine<Value> {
    Ok(serde_json::to_value(super::min_max(records).map(|(min, _)| min))?)
}

fn builtin_max(records: &[Expense]) -> ResultEngine<Value> {
    Ok(serde_json::to_value(super::min_max(records).map(|(_, max)| max))?)
}

fn builtin_by_category(records: &[Expense]) -> ResultEngine<Value> {
    Ok(serde_json::to_value(super::by_category(records)?)?)
}

fn builtin_by_month(records: &[Expense]) -> ResultEngine<Value> {
    Ok(serde_json::to_value(super::by_month(records)?)?)
}

impl Default for StatisticsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatisticsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatisticsRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::Amount;

    fn sample() -> Vec<Expense> {
        [
            (100, "Food", 15),
            (200, "Transport", 16),
            (50, "Food", 17),
            (300, "Entertainment", 18),
            (150, "Food", 19),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (amount, category, day))| Expense {
            id: i as i32 + 1,
            amount: Amount::from_minor(amount * 100),
            category: category.to_string(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        })
        .collect()
    }

    #[test]
    fn builtins_compute_on_sample_data() {
        let registry = StatisticsRegistry::new();
        let records = sample();

        assert_eq!(registry.compute("total", &records).unwrap(), json!(800.0));
        assert_eq!(registry.compute("count", &records).unwrap(), json!(5));
        assert_eq!(registry.compute("average", &records).unwrap(), json!(160.0));
        assert_eq!(
            registry.compute("by_category", &records).unwrap()["Food"],
            json!(300.0)
        );
        assert_eq!(registry.compute("min", &[]).unwrap(), Value::Null);
    }

    #[test]
    fn names_keep_registration_order() {
        let mut registry = StatisticsRegistry::new();
        registry
            .register("largest_category", |_: &[Expense]| -> ResultEngine<Value> { Ok(json!("Food")) })
            .unwrap();

        let names = registry.names();
        assert_eq!(names.first(), Some(&"total"));
        assert_eq!(names.last(), Some(&"largest_category"));
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut registry = StatisticsRegistry::new();
        let err = registry
            .register("total", |_: &[Expense]| -> ResultEngine<Value> { Ok(json!(0)) })
            .unwrap_err();
        assert_eq!(err, EngineError::ExistingKey("statistic total".to_string()));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn unknown_names_are_not_found() {
        let mut registry = StatisticsRegistry::empty();
        assert!(matches!(
            registry.unregister("median"),
            Err(EngineError::KeyNotFound(_))
        ));
        assert!(matches!(
            registry.compute("median", &sample()),
            Err(EngineError::KeyNotFound(_))
        ));
    }

    #[test]
    fn unregister_removes_the_statistic() {
        let mut registry = StatisticsRegistry::new();
        registry.unregister("count").unwrap();
        assert!(!registry.contains("count"));
        assert_eq!(registry.len(), 6);
        assert!(!registry.compute_all(&sample()).contains_key("count"));
    }

    #[test]
    fn failing_statistic_becomes_an_error_entry() {
        let mut registry = StatisticsRegistry::empty();
        registry
            .register("count", |r: &[Expense]| -> ResultEngine<Value> { Ok(json!(r.len())) })
            .unwrap();
        registry
            .register("broken", |_: &[Expense]| -> ResultEngine<Value> {
                Err(EngineError::InvalidFilter("cannot compute".to_string()))
            })
            .unwrap();

        let all = registry.compute_all(&sample());
        assert_eq!(all["count"], json!(5));
        assert!(
            all["broken"]["error"]
                .as_str()
                .unwrap()
                .contains("cannot compute")
        );
    }
}
