use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spendlog={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    tracing::info!("Found server settings...");
    let db = connect_database(&settings.server.database_url).await?;
    let store = engine::Store::builder().database(db).build().await?;
    let tracker = engine::Tracker::new(store);

    let addr = settings.server.addr();
    if let Err(err) = server::run(tracker, &addr).await {
        tracing::error!("server failed on {addr}: {err}");
        return Err(err.into());
    }

    Ok(())
}

async fn connect_database(
    url: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
