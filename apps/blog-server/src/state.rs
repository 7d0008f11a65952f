//! Application state - shared across all handlers.

use std::sync::Arc;

use serde::Serialize;

use blogicum_core::Clock;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_infra::InMemoryContentStore;
use blogicum_infra::database::DatabaseConfig;

#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    DbConn, PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository, connect,
};

/// Which backend the repositories run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub clock: Arc<dyn Clock>,
    pub store: StoreKind,
}

impl AppState {
    /// Build the state on the configured database, falling back to the
    /// in-memory store when none is configured or it cannot be reached.
    pub async fn new(db_config: Option<&DatabaseConfig>, clock: Arc<dyn Clock>) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match connect(config).await {
                Ok(db) => Self::postgres(db, clock),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory(clock)
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory(clock)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory store");
            Self::in_memory(clock)
        };

        tracing::info!(store = ?state.store, "Application state initialized");
        state
    }

    /// Every repository backed by one fresh in-memory store.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::from_store(Arc::new(InMemoryContentStore::new()), clock)
    }

    pub fn from_store(store: Arc<InMemoryContentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: store.clone(),
            categories: store.clone(),
            locations: store.clone(),
            posts: store.clone(),
            comments: store,
            clock,
            store: StoreKind::Memory,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(db: DbConn, clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            locations: Arc::new(PostgresLocationRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
            clock,
            store: StoreKind::Postgres,
        }
    }
}
