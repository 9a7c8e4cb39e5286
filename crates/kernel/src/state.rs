//! Application state shared across all handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::content::{BlockTypeRegistry, PageService};
use crate::db;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// PostgreSQL connection pool.
    db: PgPool,

    /// Theme engine for template rendering.
    theme: Arc<ThemeEngine>,

    /// Page and hero slide writes.
    pages: PageService,

    /// Block type definitions for the editor.
    block_types: BlockTypeRegistry,

    /// Directory served under /static.
    static_dir: PathBuf,

    /// Admin API bearer token; the admin API is disabled without one.
    admin_token: Option<String>,

    /// Public base URL, without trailing slash.
    site_url: String,
}

impl AppState {
    /// Create application state: connect, migrate, load templates.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&db)
            .await
            .context("failed to run migrations")?;

        info!(template_dir = ?config.templates_dir, "loading templates from directory");
        let theme = ThemeEngine::new(&config.templates_dir)
            .inspect_err(|e| tracing::warn!(error = ?e, "failed to load templates, using empty engine"))
            .or_else(|_| ThemeEngine::empty())
            .context("failed to create theme engine")?;

        if config.admin_token.is_none() {
            tracing::warn!("ADMIN_TOKEN not set, admin API disabled");
        }

        Ok(Self::from_parts(
            db,
            theme,
            config.static_dir.clone(),
            config.admin_token.clone(),
            config.site_url.clone(),
        ))
    }

    /// Assemble state from already-built parts (used by tests and tools).
    pub fn from_parts(
        db: PgPool,
        theme: ThemeEngine,
        static_dir: PathBuf,
        admin_token: Option<String>,
        site_url: String,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pages: PageService::new(db.clone()),
                db,
                theme: Arc::new(theme),
                block_types: BlockTypeRegistry::with_standard_types(),
                static_dir,
                admin_token,
                site_url,
            }),
        }
    }

    /// Get the database pool.
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    pub fn pages(&self) -> &PageService {
        &self.inner.pages
    }

    pub fn block_types(&self) -> &BlockTypeRegistry {
        &self.inner.block_types
    }

    pub fn static_dir(&self) -> &Path {
        &self.inner.static_dir
    }

    pub fn admin_token(&self) -> Option<&str> {
        self.inner.admin_token.as_deref()
    }

    pub fn site_url(&self) -> &str {
        &self.inner.site_url
    }

    /// Check PostgreSQL health.
    pub async fn postgres_healthy(&self) -> bool {
        db::check_health(&self.inner.db).await
    }
}
