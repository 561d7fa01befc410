use sea_orm::{QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, CategoryFields, CategoryPatch, EngineError, ResultEngine, category,
    util::normalize_category,
};

use super::{Store, with_tx};

impl Store {
    /// Stores a new category record. The normalized name must be free.
    pub async fn create_category(&self, fields: CategoryFields) -> ResultEngine<Category> {
        let name = normalize_category(&fields.name)?;
        let active = fields.validate()?;

        with_tx!(self, |db_tx| {
            if find_category(&db_tx, &name).await?.is_some() {
                return Err(EngineError::ExistingKey(format!("category {name}")));
            }
            let model = active.insert(&db_tx).await?;
            tracing::debug!(name = %model.name, "category created");
            Ok(Category::from(model))
        })
    }

    pub async fn get_category(&self, name: &str) -> ResultEngine<Category> {
        let name = normalize_category(name)?;
        find_category(&self.database, &name)
            .await?
            .map(Category::from)
            .ok_or_else(|| category_not_found(&name))
    }

    /// Every category record, sorted by name.
    pub async fn list_categories(&self) -> ResultEngine<Vec<Category>> {
        let rows = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Changes the supplied fields of a category record. An empty patch
    /// returns the record unchanged.
    pub async fn update_category(&self, name: &str, patch: CategoryPatch) -> ResultEngine<Category> {
        let name = normalize_category(name)?;

        with_tx!(self, |db_tx| {
            let model = find_category(&db_tx, &name)
                .await?
                .ok_or_else(|| category_not_found(&name))?;

            let model = if patch.is_empty() {
                model
            } else {
                let mut active: category::ActiveModel = model.into();
                patch.apply(&mut active)?;
                active.update(&db_tx).await?
            };

            Ok(Category::from(model))
        })
    }

    /// Sets or, with `None`, removes the overall budget of a category.
    pub async fn set_budget(&self, name: &str, limit: Option<f64>) -> ResultEngine<Category> {
        match limit {
            Some(limit) => {
                self.update_category(
                    name,
                    CategoryPatch {
                        budget_limit: Some(limit),
                        ..Default::default()
                    },
                )
                .await
            }
            None => {
                let name = normalize_category(name)?;
                with_tx!(self, |db_tx| {
                    let model = find_category(&db_tx, &name)
                        .await?
                        .ok_or_else(|| category_not_found(&name))?;
                    let mut active: category::ActiveModel = model.into();
                    active.budget_limit_minor = sea_orm::ActiveValue::Set(None);
                    Ok(Category::from(active.update(&db_tx).await?))
                })
            }
        }
    }

    /// Removes a category record. Expenses using the label are kept.
    pub async fn delete_category(&self, name: &str) -> ResultEngine<()> {
        let name = normalize_category(name)?;
        let result = category::Entity::delete_many()
            .filter(category::Column::Name.eq(name.as_str()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(category_not_found(&name));
        }
        tracing::debug!(%name, "category deleted");
        Ok(())
    }
}

async fn find_category<C>(db: &C, name: &str) -> ResultEngine<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Ok(category::Entity::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await?)
}

fn category_not_found(name: &str) -> EngineError {
    EngineError::KeyNotFound(format!("category {name}"))
}
