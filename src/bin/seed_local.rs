//! Seeds sample teams and members when running with the `local` profile.
//!
//! ```bash
//! MEMBER_SEARCH_PROFILE=local cargo run --bin seed-local
//! ```

use anyhow::Context;
use member_search::config::AppConfig;
use member_search::database::{DatabaseConnection, DatabaseMigrations};
use member_search::logging::{init_structured_logging, log_error};
use member_search::seed::seed_sample_data;
use member_search::store::PgMemberStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_structured_logging(&config.logging);

    if !config.is_local() {
        info!(profile = %config.profile, "not the local profile, skipping sample data");
        return Ok(());
    }

    let connection = DatabaseConnection::new(&config.database)
        .await
        .context("failed to connect to the database")?;

    if config.database.run_migrations {
        DatabaseMigrations::run_all(connection.pool())
            .await
            .context("failed to run migrations")?;
    }

    let store = PgMemberStore::new(connection.pool().clone());
    match seed_sample_data(&store).await {
        Ok(summary) => {
            info!(
                teams = summary.teams.len(),
                members = summary.members_created,
                "seeding finished"
            );
        }
        Err(err) => {
            log_error("seed-local", "seed_sample_data", &err.to_string(), None);
            connection.close().await;
            return Err(err.into());
        }
    }

    connection.close().await;
    Ok(())
}
