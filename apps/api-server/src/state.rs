//! Application state - shared across all handlers.

use std::sync::Arc;

use havamal_core::ports::{
    CategoryRepository, NavigationRepository, PasswordService, PostCategoryRepository,
    PostRepository, PostVersionRepository, TokenService, UserRepository,
};
use havamal_core::services::{
    CategoryService, IdentityResolver, NavigationService, PostService, UserService,
    VersionService,
};
use havamal_infra::database::DatabaseConnections;
use havamal_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use havamal_infra::database::{
    PostgresCategoryRepository, PostgresNavigationRepository, PostgresPostCategoryRepository,
    PostgresPostRepository, PostgresPostVersionRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// One implementation per repository port.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub links: Arc<dyn PostCategoryRepository>,
    pub navigation: Arc<dyn NavigationRepository>,
    pub versions: Arc<dyn PostVersionRepository>,
}

impl Repositories {
    /// Every port backed by the same in-memory store.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            posts: store.clone(),
            categories: store.clone(),
            links: store.clone(),
            navigation: store.clone(),
            versions: store,
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.main.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.main.clone())),
            links: Arc::new(PostgresPostCategoryRepository::new(db.main.clone())),
            navigation: Arc::new(PostgresNavigationRepository::new(db.main.clone())),
            versions: Arc::new(PostgresPostVersionRepository::new(db.main.clone())),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub categories: Arc<CategoryService>,
    pub navigation: Arc<NavigationService>,
    pub versions: Arc<VersionService>,
    pub users: Arc<UserService>,
    pub tokens: Arc<dyn TokenService>,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, connecting to PostgreSQL when configured.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (repos, db) = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let repos = Repositories::postgres(&connections);
                    (repos, Some(Arc::new(connections)))
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to connect to database. Using in-memory fallback."
                    );
                    (Repositories::in_memory(), None)
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (Repositories::in_memory(), None)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (repos, db) = {
            tracing::info!("Running without postgres feature - using in-memory store");
            (Repositories::in_memory(), None)
        };

        let state = Self::from_parts(repos, config);
        Self { db, ..state }
    }

    /// Wire services over `repos`, with no database handle.
    pub fn from_parts(repos: Repositories, config: &AppConfig) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let identity = IdentityResolver::new(repos.users.clone());

        tracing::info!(
            post_categories = %config.cascade.post_categories,
            post_versions = %config.cascade.post_versions,
            navigation_children = %config.cascade.navigation_children,
            "Application state initialized"
        );

        Self {
            posts: Arc::new(PostService::new(
                repos.posts,
                repos.links.clone(),
                repos.versions.clone(),
                repos.navigation.clone(),
                identity,
                config.cascade,
            )),
            categories: Arc::new(CategoryService::new(
                repos.categories,
                repos.links,
                repos.navigation.clone(),
            )),
            navigation: Arc::new(NavigationService::new(repos.navigation, config.cascade)),
            versions: Arc::new(VersionService::new(repos.versions)),
            users: Arc::new(UserService::new(repos.users, passwords)),
            tokens,
            db: None,
        }
    }
}
