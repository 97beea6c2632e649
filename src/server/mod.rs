//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::require_auth;
use crate::migration;
use crate::repository::{
    context::ContextRepositoryImpl, locale::LocaleRepositoryImpl, session::SessionRepositoryImpl,
    translation::TranslationRepositoryImpl, user::UserRepositoryImpl, LookupRepositoryImpl,
};
use crate::service::{AuthService, ContextService, LocaleService, TranslationService};
use crate::state::HasServices;
use anyhow::{Context as _, Result};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub context_service: Arc<
        ContextService<ContextRepositoryImpl, TranslationRepositoryImpl, LookupRepositoryImpl>,
    >,
    pub locale_service: Arc<
        LocaleService<LocaleRepositoryImpl, TranslationRepositoryImpl, LookupRepositoryImpl>,
    >,
    pub translation_service: Arc<TranslationService<TranslationRepositoryImpl, LookupRepositoryImpl>>,
    pub auth_service: Arc<AuthService<UserRepositoryImpl, SessionRepositoryImpl>>,
}

impl AppState {
    /// Wire repositories and services over a connected pool
    pub fn new(config: Config, db_pool: MySqlPool) -> Self {
        let context_repo = Arc::new(ContextRepositoryImpl::new(db_pool.clone()));
        let locale_repo = Arc::new(LocaleRepositoryImpl::new(db_pool.clone()));
        let translation_repo = Arc::new(TranslationRepositoryImpl::new(db_pool.clone()));
        let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
        let session_repo = Arc::new(SessionRepositoryImpl::new(db_pool.clone()));
        let lookup_repo = Arc::new(LookupRepositoryImpl::new(db_pool.clone()));

        let jwt_manager = JwtManager::new(config.jwt.clone());

        let context_service = Arc::new(ContextService::new(
            context_repo,
            translation_repo.clone(),
            lookup_repo.clone(),
        ));
        let locale_service = Arc::new(LocaleService::new(
            locale_repo,
            translation_repo.clone(),
            lookup_repo.clone(),
        ));
        let translation_service =
            Arc::new(TranslationService::new(translation_repo, lookup_repo));
        let auth_service = Arc::new(AuthService::new(user_repo, session_repo, jwt_manager));

        Self {
            config: Arc::new(config),
            db_pool,
            context_service,
            locale_service,
            translation_service,
            auth_service,
        }
    }
}

/// Implement HasServices trait for production AppState
impl HasServices for AppState {
    type ContextRepo = ContextRepositoryImpl;
    type LocaleRepo = LocaleRepositoryImpl;
    type TranslationRepo = TranslationRepositoryImpl;
    type UserRepo = UserRepositoryImpl;
    type SessionRepo = SessionRepositoryImpl;
    type Store = LookupRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn context_service(
        &self,
    ) -> &ContextService<Self::ContextRepo, Self::TranslationRepo, Self::Store> {
        &self.context_service
    }

    fn locale_service(
        &self,
    ) -> &LocaleService<Self::LocaleRepo, Self::TranslationRepo, Self::Store> {
        &self.locale_service
    }

    fn translation_service(&self) -> &TranslationService<Self::TranslationRepo, Self::Store> {
        &self.translation_service
    }

    fn auth_service(&self) -> &AuthService<Self::UserRepo, Self::SessionRepo> {
        &self.auth_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

/// Open the MySQL connection pool
pub async fn connect_pool(config: &Config) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    let db_pool = connect_pool(&config).await?;
    info!("Connected to database");

    if config.database.run_migrations {
        migration::apply(&db_pool).await?;
    }

    let http_addr = config.http_addr();
    let state = AppState::new(config, db_pool);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

/// Build the HTTP router with generic state type
///
/// Generic over the state so the production `AppState` and test states that
/// implement `HasServices` share one route table.
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/logout", post(api::auth::logout::<S>))
        // Contexts
        .route(
            "/contexts",
            get(api::context::list::<S>).post(api::context::create::<S>),
        )
        .route(
            "/contexts/{id}",
            get(api::context::get::<S>)
                .put(api::context::update::<S>)
                .patch(api::context::update::<S>)
                .delete(api::context::delete::<S>),
        )
        // Locales
        .route(
            "/locales",
            get(api::locale::list::<S>).post(api::locale::create::<S>),
        )
        .route(
            "/locales/{id}",
            get(api::locale::get::<S>)
                .put(api::locale::update::<S>)
                .patch(api::locale::update::<S>)
                .delete(api::locale::delete::<S>),
        )
        // Translations
        .route(
            "/translations",
            get(api::translation::list::<S>).post(api::translation::create::<S>),
        )
        .route(
            "/translations/{id}",
            get(api::translation::get::<S>)
                .put(api::translation::update::<S>)
                .patch(api::translation::update::<S>)
                .delete(api::translation::delete::<S>),
        )
        .route(
            "/translations-search",
            get(api::translation::search::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<S>,
        ));

    let api_routes = Router::new()
        .route("/login", post(api::auth::login::<S>))
        .merge(protected);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .nest("/api", api_routes)
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
