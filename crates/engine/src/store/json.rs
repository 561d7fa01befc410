use std::path::Path;

use serde_json::Value;

use crate::{EngineError, ExpenseFields, ResultEngine};

use super::{BulkOutcome, Store};

impl Store {
    /// Writes every expense to `path` as a pretty-printed JSON array and
    /// returns how many were written.
    pub async fn export_to_json(&self, path: impl AsRef<Path>) -> ResultEngine<usize> {
        let path = path.as_ref();
        let expenses = self.list_all().await?;
        let body = serde_json::to_vec_pretty(&expenses)?;
        tokio::fs::write(path, body).await?;
        tracing::info!(count = expenses.len(), path = %path.display(), "expenses exported");
        Ok(expenses.len())
    }

    /// Reads a JSON array of expenses from `path` and stores the valid ones.
    ///
    /// A missing file or a document that is not a JSON array fails before
    /// anything is written. Ids in the file are ignored.
    pub async fn import_from_json(&self, path: impl AsRef<Path>) -> ResultEngine<BulkOutcome> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| EngineError::Import(format!("{}: {err}", path.display())))?;

        let document: Value = serde_json::from_str(&raw)
            .map_err(|err| EngineError::Import(format!("{}: invalid JSON: {err}", path.display())))?;
        let Value::Array(items) = document else {
            return Err(EngineError::Import(format!(
                "{}: expected a JSON array of expenses",
                path.display()
            )));
        };

        let entries = items.into_iter().map(decode_entry).collect();
        let outcome = self.insert_entries(entries).await?;
        tracing::info!(
            inserted = outcome.inserted_count(),
            failed = outcome.failed_count(),
            path = %path.display(),
            "expenses imported"
        );
        Ok(outcome)
    }
}

fn decode_entry(item: Value) -> ResultEngine<ExpenseFields> {
    if !item.is_object() {
        return Err(EngineError::Import("entry is not a JSON object".to_string()));
    }
    serde_json::from_value(item).map_err(|err| EngineError::Import(format!("malformed entry: {err}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_entry_ignores_unknown_fields() {
        let fields = decode_entry(json!({
            "id": 42,
            "amount": 12.5,
            "category": "Food",
            "date": "2024-01-15"
        }))
        .unwrap();
        assert_eq!(fields.amount, Some(12.5));
        assert_eq!(fields.category.as_deref(), Some("Food"));
        assert!(fields.description.is_none());
    }

    #[test]
    fn decode_entry_rejects_non_objects_and_bad_types() {
        assert!(matches!(
            decode_entry(json!("Food")),
            Err(EngineError::Import(_))
        ));
        assert!(matches!(
            decode_entry(json!({"amount": "ten", "category": "Food"})),
            Err(EngineError::Import(_))
        ));
    }
}
