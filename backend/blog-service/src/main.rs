use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use blog_service::handlers;
use blog_service::metrics::serve_metrics;
use blog_service::middleware::MetricsMiddleware;
use blog_service::response::ApiResponse;
use blog_service::MIGRATOR;
use crypto_core::JwtKeys;
use db_pool::{create_pool, migrate, DbConfig};
use sqlx::PgPool;
use std::io;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_NAME: &str = "blog-service";

async fn welcome() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Welcome to the Inkwell blog API")
}

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": SERVICE_NAME,
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "error": "PostgreSQL connection failed",
                "service": SERVICE_NAME
            }))
        }
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn not_found() -> HttpResponse {
    let status = actix_web::http::StatusCode::NOT_FOUND;
    HttpResponse::NotFound().json(ApiResponse::<()>::failure(status, "Route not found"))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

/// Blog Service
///
/// Serves the Inkwell JSON API.
///
/// # Routes
///
/// - `/api/v1/auth/*` - Sign-up, login, session and password endpoints
/// - `/api/v1/blogs/*` - Blogs, categories, likes, comments, bookmarks
/// - `/api/v1/connections/*` - Follow relationships
/// - `/api/v1/health`, `/api/v1/health/live`, `/metrics`
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("WARNING: failed to load .env file: {}", e);
        }
    }

    init_tracing();

    let config = match blog_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let jwt_keys = JwtKeys::from_secrets(
        &config.auth.access_token_secret,
        &config.auth.refresh_token_secret,
        config.auth.access_token_ttl_secs,
        config.auth.refresh_token_ttl_secs,
    )
    .map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Failed to initialize JWT keys: {e}"),
        )
    })?;

    let db_cfg = DbConfig::new(
        SERVICE_NAME,
        &config.database.url,
        config.database.max_connections,
    )
    .with_env_overrides();
    db_cfg.log_config();

    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    migrate(&db_pool, &MIGRATOR).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to run database migrations: {e}"),
        )
    })?;

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let pool_data = web::Data::new(db_pool.clone());
    let keys_data = web::Data::new(jwt_keys);
    let config_data = web::Data::new(config);

    let server = HttpServer::new(move || {
        let cors = build_cors(&config_data.cors.allowed_origins);

        App::new()
            .app_data(pool_data.clone())
            .app_data(keys_data.clone())
            .app_data(config_data.clone())
            .wrap(MetricsMiddleware)
            .wrap(TracingLogger::default())
            .wrap(cors)
            .route("/", web::get().to(welcome))
            .route("/metrics", web::get().to(serve_metrics))
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .configure(handlers::configure_routes)
            .default_service(web::to(not_found))
    })
    .bind(&http_bind_address)?
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let result = tokio::select! {
        joined = &mut server_task => match joined {
            Ok(res) => res,
            Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
        },
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            Ok(())
        }
    };

    db_pool.close().await;
    tracing::info!("Blog-service shutting down");

    result
}
