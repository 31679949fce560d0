//! PostgreSQL pool construction and migration runner.
//!
//! Migrations come from the module registry and are applied once each,
//! in order, every one inside its own transaction. Applied ids are
//! recorded in `schema_migrations`.

use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::Migration;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migration '{module}/{id}' failed: {source}")]
    Migration {
        module: String,
        id: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

/// Create a PostgreSQL connection pool from settings.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    tracing::info!(
        target: "bookshelf-db",
        max_connections = settings.max_connections,
        "connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await?;

    Ok(pool)
}

/// Apply every migration not yet recorded. Returns how many were applied.
pub async fn migrate(pool: &PgPool, migrations: &[(String, Migration)]) -> Result<usize, DbError> {
    sqlx::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            module TEXT NOT NULL,
            id TEXT NOT NULL,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let already_applied: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE module = $1 AND id = $2)",
        )
        .bind(module)
        .bind(migration.id)
        .fetch_one(pool)
        .await?;

        if already_applied.0 {
            tracing::debug!(
                target: "bookshelf-db",
                module = %module,
                id = migration.id,
                "migration already applied"
            );
            continue;
        }

        apply(pool, module, migration)
            .await
            .map_err(|source| DbError::Migration {
                module: module.clone(),
                id: migration.id,
                source,
            })?;

        tracing::info!(
            target: "bookshelf-db",
            module = %module,
            id = migration.id,
            "migration applied"
        );
        applied += 1;
    }

    Ok(applied)
}

async fn apply(pool: &PgPool, module: &str, migration: &Migration) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(migration.up).execute(&mut *tx).await?;

    sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
        .bind(module)
        .bind(migration.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;

    // Run with: DATABASE_URL=postgres://... cargo test -p bookshelf-db -- --ignored

    fn settings_from_env() -> DatabaseSettings {
        DatabaseSettings {
            url: std::env::var("DATABASE_URL").expect("DATABASE_URL required"),
            ..DatabaseSettings::default()
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let pool = connect(&settings_from_env()).await.unwrap();

        let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_apply_once() {
        let pool = connect(&settings_from_env()).await.unwrap();
        let migrations = vec![(
            "probe".to_string(),
            Migration {
                id: "0000_probe",
                up: "CREATE TABLE IF NOT EXISTS migration_probe (id INT PRIMARY KEY);",
            },
        )];

        migrate(&pool, &migrations).await.unwrap();
        let second = migrate(&pool, &migrations).await.unwrap();
        assert_eq!(second, 0);
    }
}
