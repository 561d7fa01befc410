use std::{error::Error, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::{
    CategoryFields, CategoryPatch, EngineError, ExpenseFields, ExpenseFilter, ExpensePatch,
    FilterParams, Store, Tracker, parse_month,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod display;
mod prompt;

#[derive(Parser, Debug)]
#[command(name = "spendlog-cli")]
#[command(about = "Record, query and summarize personal expenses")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./spendlog.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense.
    Add(AddArgs),
    /// List every expense.
    List,
    /// Show one expense.
    Show { id: i32 },
    /// Change some fields of an expense.
    Update(UpdateArgs),
    /// Delete an expense.
    Delete { id: i32 },
    /// List the expenses matching the given criteria.
    Filter(FilterArgs),
    /// Totals, average and breakdowns, optionally over a filtered subset.
    Stats(FilterArgs),
    /// Every named statistic, optionally over a filtered subset.
    CustomStats(FilterArgs),
    /// List the categories in use.
    Categories,
    /// Manage category budgets.
    #[command(subcommand)]
    Budget(BudgetCommand),
    /// Import expenses from a JSON array file.
    Import { path: PathBuf },
    /// Export every expense to a JSON file.
    Export { path: PathBuf },
    /// Insert deterministic sample data.
    Seed {
        #[arg(long, default_value_t = 50)]
        count: usize,
    },
    /// Delete every expense.
    Clear {
        /// Do not ask for confirmation.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Create or change the budgets of a category.
    Set(BudgetArgs),
    /// List category records and their budgets.
    List,
    /// Remove a category record (its expenses are kept).
    Remove { name: String },
    /// Spending against budgets.
    Report {
        /// `YYYY-MM`; defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Args, Debug)]
struct BudgetArgs {
    name: String,
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    monthly: Option<f64>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, allow_negative_numbers = true)]
    amount: f64,
    #[arg(long)]
    category: String,
    #[arg(long)]
    description: Option<String>,
    /// `YYYY-MM-DD`; defaults to today.
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: i32,
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<f64>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    start_date: Option<String>,
    #[arg(long)]
    end_date: Option<String>,
    #[arg(long)]
    min_amount: Option<f64>,
    #[arg(long)]
    max_amount: Option<f64>,
}

impl TryFrom<FilterArgs> for ExpenseFilter {
    type Error = engine::EngineError;

    fn try_from(args: FilterArgs) -> Result<Self, Self::Error> {
        ExpenseFilter::try_from(FilterParams {
            category: args.category,
            start_date: args.start_date,
            end_date: args.end_date,
            min_amount: args.min_amount,
            max_amount: args.max_amount,
        })
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run_budget(
    tracker: &Tracker,
    command: BudgetCommand,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        BudgetCommand::Set(args) => {
            let patch = CategoryPatch {
                description: args.description,
                budget_limit: args.limit,
                monthly_budget: args.monthly,
            };
            let category = match tracker.update_category(&args.name, patch.clone()).await {
                Err(EngineError::KeyNotFound(_)) => {
                    tracker
                        .create_category(CategoryFields {
                            name: args.name,
                            description: patch.description,
                            budget_limit: patch.budget_limit,
                            monthly_budget: patch.monthly_budget,
                        })
                        .await?
                }
                other => other?,
            };
            print!("{}", display::category_table(&[category]));
        }
        BudgetCommand::List => {
            print!("{}", display::category_table(&tracker.list_categories().await?));
        }
        BudgetCommand::Remove { name } => {
            tracker.delete_category(&name).await?;
            println!("removed category {name}");
        }
        BudgetCommand::Report { month } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            print!("{}", display::budget_report(&tracker.budget_report(month).await?));
        }
    }

    Ok(())
}

async fn run(tracker: &Tracker, command: Command) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        Command::Add(args) => {
            let fields = ExpenseFields {
                amount: Some(args.amount),
                category: Some(args.category),
                description: args.description,
                date: args.date,
            };
            let expense = tracker.add_fields(fields).await?;
            println!("added expense {}", expense.id);
            print!("{}", display::expense_details(&expense));
        }
        Command::List => {
            print!("{}", display::expense_table(&tracker.view_all().await?));
        }
        Command::Show { id } => {
            print!("{}", display::expense_details(&tracker.get_expense(id).await?));
        }
        Command::Update(args) => {
            let patch = ExpensePatch {
                amount: args.amount,
                category: args.category,
                description: args.description,
                date: args.date,
            };
            if patch.is_empty() {
                return Err("nothing to update: pass at least one field".into());
            }
            let expense = tracker.update_expense(args.id, patch).await?;
            print!("{}", display::expense_details(&expense));
        }
        Command::Delete { id } => {
            tracker.delete_expense(id).await?;
            println!("deleted expense {id}");
        }
        Command::Filter(args) => {
            let criteria = ExpenseFilter::try_from(args)?;
            print!(
                "{}",
                display::expense_table(&tracker.filter_expenses(&criteria).await?)
            );
        }
        Command::Stats(args) => {
            let criteria = ExpenseFilter::try_from(args)?;
            let summary = if criteria.is_empty() {
                tracker.view_statistics(None).await?
            } else {
                tracker.view_statistics(Some(&criteria)).await?
            };
            print!("{}", display::summary(&summary));
        }
        Command::CustomStats(args) => {
            let criteria = ExpenseFilter::try_from(args)?;
            let criteria = (!criteria.is_empty()).then_some(&criteria);
            print!(
                "{}",
                display::custom_statistics(&tracker.custom_statistics(criteria).await?)
            );
        }
        Command::Budget(command) => run_budget(tracker, command).await?,
        Command::Categories => {
            for category in tracker.categories().await? {
                println!("{category}");
            }
        }
        Command::Import { path } => {
            let outcome = tracker.import_json(&path).await?;
            println!(
                "imported {} expenses, {} rejected",
                outcome.inserted_count(),
                outcome.failed_count()
            );
            for failure in &outcome.failures {
                eprintln!("  entry {}: {}", failure.index, failure.error);
            }
        }
        Command::Export { path } => {
            let count = tracker.export_json(&path).await?;
            println!("exported {count} expenses to {}", path.display());
        }
        Command::Seed { count } => {
            let today = chrono::Local::now().date_naive();
            let outcome = tracker.seed_sample_data(count, today).await?;
            println!("seeded {} expenses", outcome.inserted_count());
        }
        Command::Clear { yes } => {
            if !yes && !prompt::confirm("Delete every expense?")? {
                println!("aborted");
                return Ok(());
            }
            let removed = tracker.clear().await?;
            println!("removed {removed} expenses");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let db = connect_db(&cli.database_url).await?;
    let store = Store::builder().database(db).build().await?;
    let tracker = Tracker::new(store);

    if let Err(err) = run(&tracker, cli.command).await {
        tracing::debug!("command failed: {err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_optional_fields() {
        let cli = Cli::try_parse_from([
            "spendlog-cli",
            "add",
            "--amount",
            "12.5",
            "--category",
            "Food",
            "--date",
            "2024-01-15",
        ])
        .unwrap();

        let Command::Add(args) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.amount, 12.5);
        assert_eq!(args.category, "Food");
        assert_eq!(args.date.as_deref(), Some("2024-01-15"));
        assert!(args.description.is_none());
    }

    #[test]
    fn negative_amount_reaches_validation() {
        let cli = Cli::try_parse_from([
            "spendlog-cli",
            "add",
            "--amount",
            "-5",
            "--category",
            "Food",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Add(AddArgs { amount, .. }) if amount == -5.0));
    }

    #[test]
    fn filter_args_become_a_filter() {
        let cli = Cli::try_parse_from([
            "spendlog-cli",
            "filter",
            "--category",
            "food",
            "--min-amount",
            "10",
        ])
        .unwrap();
        let Command::Filter(args) = cli.command else {
            panic!("expected filter");
        };
        let criteria = ExpenseFilter::try_from(args).unwrap();
        assert_eq!(criteria.category.as_deref(), Some("food"));
        assert_eq!(criteria.min_amount, Some(engine::Amount::from_minor(1_000)));
    }

    #[test]
    fn budget_set_takes_both_limits() {
        let cli = Cli::try_parse_from([
            "spendlog-cli",
            "budget",
            "set",
            "Food",
            "--limit",
            "1000",
            "--monthly",
            "500",
        ])
        .unwrap();
        let Command::Budget(BudgetCommand::Set(args)) = cli.command else {
            panic!("expected budget set");
        };
        assert_eq!(args.name, "Food");
        assert_eq!(args.limit, Some(1000.0));
        assert_eq!(args.monthly, Some(500.0));
    }

    #[test]
    fn clear_defaults_to_asking() {
        let cli = Cli::try_parse_from(["spendlog-cli", "clear"]).unwrap();
        assert!(matches!(cli.command, Command::Clear { yes: false }));
    }
}
