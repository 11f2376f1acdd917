mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{self, routes as auth_routes, KeySource, SessionResolver};
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::comments::{routes as comments_routes, CommentService};
use crate::features::complaints::{routes as complaints_routes, ComplaintService};
use crate::features::keepalive::{routes as keepalive_routes, KeepAliveService, KeepAliveWorker};
use crate::features::policy::{routes as policy_routes, Lifecycle};
use crate::features::profiles::ProfileService;
use crate::modules::store::{
    CategoryStore, CommentStore, ComplaintStore, PgStore, ProfileStore,
};
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // One Postgres store behind every store trait
    let store = Arc::new(PgStore::new(pool));
    let profile_store: Arc<dyn ProfileStore> = store.clone();
    let category_store: Arc<dyn CategoryStore> = store.clone();
    let complaint_store: Arc<dyn ComplaintStore> = store.clone();
    let comment_store: Arc<dyn CommentStore> = store;

    let profile_service = Arc::new(ProfileService::new(profile_store));

    // Initialize auth
    let jwt_validator = match config.auth.jwt_secret.as_deref() {
        Some(secret) => {
            tracing::info!("Validating access tokens with the shared HS256 secret");
            auth::JwtValidator::with_secret(
                secret,
                config.auth.issuer.clone(),
                config.auth.audience.clone(),
                config.auth.jwt_leeway,
            )
        }
        None => {
            tracing::info!("Validating access tokens against the issuer JWKS");
            let jwks_client = Arc::new(auth::JwksClient::new(
                &config.auth.issuer,
                config.auth.jwks_cache_ttl,
            ));
            auth::JwtValidator::new(
                KeySource::Jwks(jwks_client),
                config.auth.issuer.clone(),
                config.auth.audience.clone(),
                config.auth.jwt_leeway,
            )
        }
    };
    let session_resolver = Arc::new(SessionResolver::new(
        jwt_validator,
        Arc::clone(&profile_service),
    ));
    tracing::info!("Auth configuration initialized");

    let lifecycle = Lifecycle::new(config.lifecycle.transition_mode);
    tracing::info!(
        "Complaint lifecycle initialized (transitions: {:?})",
        lifecycle.mode()
    );

    let category_service = Arc::new(CategoryService::new(
        Arc::clone(&category_store),
        Arc::clone(&complaint_store),
    ));
    let complaint_service = Arc::new(ComplaintService::new(
        Arc::clone(&complaint_store),
        Arc::clone(&category_store),
        lifecycle,
    ));
    let comment_service = Arc::new(CommentService::new(
        comment_store,
        Arc::clone(&complaint_store),
    ));
    let keepalive_service = Arc::new(KeepAliveService::new(Arc::clone(&complaint_store)));
    tracing::info!("Services initialized");

    if let Some(period) = config.keepalive.interval {
        let worker = KeepAliveWorker::new(Arc::clone(&keepalive_service), period);
        tokio::spawn(async move {
            worker.run().await;
        });
        tracing::info!("Keep-alive worker spawned");
    } else {
        tracing::info!("Keep-alive worker disabled");
    }

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Every API route sees the caller's session (or none); guards decide per route class
    let api_routes = Router::new()
        .merge(auth_routes::routes())
        .merge(policy_routes::routes(lifecycle))
        .merge(categories_routes::public_routes(Arc::clone(&category_service)))
        .merge(categories_routes::admin_routes(category_service))
        .merge(complaints_routes::public_routes(Arc::clone(&complaint_service)))
        .merge(complaints_routes::console_routes(complaint_service))
        .merge(comments_routes::routes(comment_service))
        .route_layer(axum::middleware::from_fn_with_state(
            session_resolver,
            middleware::session_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_routes = Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(keepalive_routes::routes(keepalive_service));

    let app = Router::new()
        .merge(swagger)
        .merge(api_routes)
        .merge(health_routes)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
