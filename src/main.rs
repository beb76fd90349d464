mod auth;
mod config;
mod db;
mod response;
mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest,
    TokenVerification, UpdateProfileRequest, UserResponse, VerifyRequest,
};
use auth::repository::UserRepository;
use auth::{AuthService, InMemoryRateLimiter, RateLimiter, TokenService};
use config::{AppConfig, GateMode};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
        auth::handlers::logout_handler,
        auth::handlers::profile_handler,
        auth::handlers::update_profile_handler,
        auth::handlers::change_password_handler,
        auth::handlers::verify_handler,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            VerifyRequest,
            UserResponse,
            AuthResponse,
            TokenVerification
        )
    ),
    tags(
        (name = "auth", description = "Account registration, session and profile endpoints")
    ),
    info(
        title = "Planner API",
        version = "1.0.0",
        description = "Authentication service for the personal planner app",
        contact(
            name = "API Support",
            email = "support@plannerapi.com"
        )
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub limiter: Arc<dyn RateLimiter>,
    pub gate_mode: GateMode,
}

impl AppState {
    pub fn new(
        db: PgPool,
        tokens: Arc<TokenService>,
        limiter: Arc<dyn RateLimiter>,
        gate_mode: GateMode,
    ) -> Self {
        let auth = Arc::new(AuthService::new(
            UserRepository::new(db.clone()),
            Arc::clone(&tokens),
        ));
        Self {
            db,
            auth,
            tokens,
            limiter,
            gate_mode,
        }
    }
}

/// Creates and configures the application router
/// Maps the auth endpoints to their handlers and adds CORS middleware
pub fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // API routes
        .route("/auth/register", post(auth::handlers::register_handler))
        .route("/auth/login", post(auth::handlers::login_handler))
        .route("/auth/refresh", post(auth::handlers::refresh_handler))
        .route("/auth/logout", post(auth::handlers::logout_handler))
        .route("/auth/profile", get(auth::handlers::profile_handler))
        .route("/auth/update-profile", put(auth::handlers::update_profile_handler))
        .route("/auth/change-password", put(auth::handlers::change_password_handler))
        .route("/auth/verify", post(auth::handlers::verify_handler))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Planner API - Starting...");

    // Configuration fails closed: no signing secrets, no server
    let config = AppConfig::from_env().expect("Invalid configuration");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let tokens = Arc::new(TokenService::new(
        &config.access_secret,
        &config.refresh_secret,
    ));
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::new());
    let state = AppState::new(db_pool, tokens, limiter, config.gate_mode);

    // Create the application router
    let app = create_router(state);

    // Start the Axum server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Planner API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
