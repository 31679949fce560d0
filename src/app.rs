//! Process bootstrap: store construction, module registration, serving.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use bookshelf_kernel::settings::{DatabaseSettings, Settings};
use bookshelf_kernel::{InitCtx, ModuleRegistry};
use sqlx::PgPool;

use crate::modules;
use crate::store::{MemoryCatalogStore, PgCatalogStore, SharedStore};

/// The store selected by `database.url`, plus its pool when it has one.
pub struct StoreBackend {
    store: SharedStore,
    pool: Option<PgPool>,
}

impl StoreBackend {
    /// Connect once at startup; the handle is then shared by every module.
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        if settings.is_memory() {
            tracing::warn!("using in-memory catalog store; data is lost on exit");
            return Ok(Self::memory());
        }

        let pool = bookshelf_db::connect(settings)
            .await
            .context("failed to connect to the database")?;

        Ok(Self {
            store: Arc::new(PgCatalogStore::new(pool.clone())),
            pool: Some(pool),
        })
    }

    pub fn memory() -> Self {
        Self {
            store: Arc::new(MemoryCatalogStore::new()),
            pool: None,
        }
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }
}

/// Registry holding every catalog module wired to `store`.
pub fn build_registry(store: SharedStore) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;
    Ok(registry)
}

/// The complete HTTP application for `store`, without binding a socket.
pub fn build_app(store: SharedStore, settings: &Settings) -> anyhow::Result<Router> {
    let registry = build_registry(store)?;
    Ok(bookshelf_http::build_router(&registry, settings))
}

/// Apply pending schema migrations for every registered module.
pub async fn migrate(pool: &PgPool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = bookshelf_db::migrate(pool, &migrations)
        .await
        .context("failed to apply migrations")?;

    tracing::info!(applied, total = migrations.len(), "schema is up to date");
    Ok(applied)
}

/// Connect, migrate, and serve until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        port = settings.server.port,
        "bookshelf bootstrap starting"
    );

    let backend = StoreBackend::connect(&settings.database).await?;
    let registry = build_registry(backend.store())?;

    if let Some(pool) = backend.pool() {
        if settings.database.run_migrations {
            migrate(pool, &registry).await?;
        }
    }

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    if let Some(pool) = backend.pool() {
        pool.close().await;
    }

    served
}
