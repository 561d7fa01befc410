use chrono::NaiveDate;
use sea_orm::Database;
use serde_json::{Value, json};

use engine::{
    Amount, CategoryFields, CategoryPatch, EngineError, Expense, ResultEngine,
    StatisticsRegistry, Store, Tracker,
};
use migration::MigratorTrait;

async fn tracker() -> Tracker {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let store = Store::builder().database(db).build().await.unwrap();
    Tracker::new(store)
}

async fn add_sample(tracker: &Tracker) {
    for (amount, category, day) in [
        (100.0, "Food", "2024-01-15"),
        (200.0, "Transport", "2024-01-16"),
        (50.0, "Food", "2024-01-17"),
        (300.0, "Entertainment", "2024-02-01"),
        (150.0, "Food", "2024-02-15"),
    ] {
        tracker
            .add_expense(amount, category, None, Some(day))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn category_records_round_trip() {
    let tracker = tracker().await;

    let food = tracker
        .create_category(CategoryFields {
            description: Some(" Meals and groceries ".to_string()),
            ..CategoryFields::new("food").budget_limit(1000.0).monthly_budget(500.0)
        })
        .await
        .unwrap();
    assert_eq!(food.name, "Food");
    assert_eq!(food.description, "Meals and groceries");
    assert_eq!(food.budget_limit, Some(Amount::from_minor(100_000)));

    assert_eq!(tracker.get_category("FOOD").await.unwrap(), food);
    tracker
        .create_category(CategoryFields::new("Transport"))
        .await
        .unwrap();

    let names: Vec<String> = tracker
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Food", "Transport"]);
}

#[tokio::test]
async fn duplicate_category_is_rejected() {
    let tracker = tracker().await;
    tracker
        .create_category(CategoryFields::new("Food"))
        .await
        .unwrap();

    let err = tracker
        .create_category(CategoryFields::new(" food"))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("category Food".to_string()));
}

#[tokio::test]
async fn budgets_may_be_zero_but_not_negative() {
    let tracker = tracker().await;
    tracker
        .create_category(CategoryFields::new("Bills").budget_limit(0.0))
        .await
        .unwrap();

    let err = tracker.set_budget("Bills", Some(-10.0)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidBudget(_)));
    assert_eq!(
        tracker.get_category("Bills").await.unwrap().budget_limit,
        Some(Amount::ZERO)
    );

    let err = tracker
        .create_category(CategoryFields::new("Health").monthly_budget(-1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidBudget(_)));
    assert!(matches!(
        tracker.get_category("Health").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn update_set_budget_and_delete() {
    let tracker = tracker().await;
    tracker
        .create_category(CategoryFields::new("Food").budget_limit(100.0))
        .await
        .unwrap();

    let updated = tracker
        .update_category(
            "Food",
            CategoryPatch {
                monthly_budget: Some(40.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.budget_limit, Some(Amount::from_minor(10_000)));
    assert_eq!(updated.monthly_budget, Some(Amount::from_minor(4_000)));

    let cleared = tracker.set_budget("Food", None).await.unwrap();
    assert_eq!(cleared.budget_limit, None);
    assert_eq!(cleared.monthly_budget, Some(Amount::from_minor(4_000)));

    tracker.delete_category("Food").await.unwrap();
    assert!(matches!(
        tracker.delete_category("Food").await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        tracker.set_budget("Food", Some(1.0)).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn budget_report_compares_spending() {
    let tracker = tracker().await;
    add_sample(&tracker).await;
    for fields in [
        CategoryFields::new("Food").budget_limit(1000.0).monthly_budget(100.0),
        CategoryFields::new("Transport").budget_limit(500.0).monthly_budget(300.0),
        CategoryFields::new("Entertainment").budget_limit(300.0).monthly_budget(200.0),
    ] {
        tracker.create_category(fields).await.unwrap();
    }

    let report = tracker
        .budget_report(NaiveDate::from_ymd_opt(2024, 2, 10))
        .await
        .unwrap();
    let names: Vec<&str> = report.iter().map(|s| s.category.as_str()).collect();
    assert_eq!(names, ["Entertainment", "Food", "Transport"]);

    let entertainment = &report[0];
    assert_eq!(entertainment.spent, Amount::from_minor(30_000));
    assert_eq!(entertainment.remaining, Some(Amount::ZERO));
    assert_eq!(entertainment.remaining_in_month, Some(Amount::from_minor(-10_000)));
    assert!(entertainment.over_budget);

    let food = &report[1];
    assert_eq!(food.spent, Amount::from_minor(30_000));
    assert_eq!(food.spent_in_month, Amount::from_minor(15_000));
    assert!(food.over_budget);

    let transport = &report[2];
    assert_eq!(transport.spent_in_month, Amount::ZERO);
    assert!(!transport.over_budget);
}

#[tokio::test]
async fn custom_statistics_use_the_registry() {
    let mut registry = StatisticsRegistry::new();
    registry
        .register("largest", |records: &[Expense]| -> ResultEngine<Value> {
            let largest = records.iter().max_by_key(|e| e.amount).map(|e| e.id);
            Ok(json!(largest))
        })
        .unwrap();
    registry
        .register("broken", |_: &[Expense]| -> ResultEngine<Value> {
            Err(EngineError::InvalidFilter("no data source".to_string()))
        })
        .unwrap();
    let tracker = tracker().await.with_statistics(registry);
    add_sample(&tracker).await;

    let all = tracker.custom_statistics(None).await.unwrap();
    assert_eq!(all["total"], json!(800.0));
    assert_eq!(all["count"], json!(5));
    assert_eq!(all["average"], json!(160.0));
    assert_eq!(all["by_category"]["Food"], json!(300.0));
    assert_eq!(all["largest"], json!(4));
    assert!(
        all["broken"]["error"]
            .as_str()
            .unwrap()
            .contains("no data source")
    );

    assert_eq!(
        tracker.compute_statistic("count", None).await.unwrap(),
        json!(5)
    );
    assert!(matches!(
        tracker.compute_statistic("median", None).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert_eq!(tracker.statistics().len(), 9);
}
