//! Server state - explicitly constructed process-wide singletons
//!
//! Every shared component (connection pool, artifact store, event
//! channel, label service, credentials) is built once at startup and
//! handed to the route layer through this state. No module-level
//! globals.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::Credentials;
use crate::db::DbService;
use crate::labels::{LabelCompiler, LabelService, LabelStore, PrintEvents};
use crate::server::Config;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Box records (SQLite)
    pub pool: SqlitePool,
    /// Label lifecycle service
    pub labels: Arc<LabelService>,
    /// Print-event channel + subscription gate
    pub events: PrintEvents,
    /// Basic auth credentials
    pub credentials: Arc<Credentials>,
}

impl ServerState {
    /// Initialize all services, in dependency order:
    ///
    /// 1. Working directory
    /// 2. SQLite pool + migrations (box records)
    /// 3. redb label artifact store
    /// 4. Print-event channel and compiler
    /// 5. Credentials
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::Internal(format!(
                "Failed to create work dir {}: {e}",
                config.work_dir
            ))
        })?;

        let db = DbService::new(&format!("{}/moving.db", config.work_dir)).await?;

        let store = LabelStore::open(format!("{}/labels.redb", config.work_dir))
            .map_err(|e| AppError::Database(format!("Failed to open label store: {e}")))?;

        let events = PrintEvents::new(config.label_queue_capacity);
        let compiler = LabelCompiler::new(&config.latexmk_path);
        let labels = Arc::new(LabelService::new(
            compiler,
            store,
            events.clone(),
            &config.public_url,
        ));

        let credentials = Arc::new(Credentials::load(&config.secrets_path)?);

        tracing::info!(
            work_dir = %config.work_dir,
            public_url = %config.public_url,
            "Server state initialized"
        );

        Ok(Self {
            config: config.clone(),
            pool: db.pool,
            labels,
            events,
            credentials,
        })
    }
}
