// src/main.rs

use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use quiz_engine::config::Config;
use quiz_engine::engine::QuizEngine;
use quiz_engine::engine::question_bank::QuestionBank;
use quiz_engine::engine::session_cache::SessionCache;
use quiz_engine::routes;
use quiz_engine::state::AppState;
use quiz_engine::store::{MemoryResultStore, PgResultStore, ResultStore};
use quiz_engine::utils::clock::SystemClock;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let bank = QuestionBank::load(&config.question_bank_path).unwrap_or_else(|e| {
        panic!(
            "Failed to load question bank from {}: {}",
            config.question_bank_path, e
        )
    });
    tracing::info!(
        "Question bank loaded: {} topic(s), {} question(s)",
        bank.topics().len(),
        bank.question_count()
    );

    let store: Arc<dyn ResultStore> = match &config.database_url {
        Some(url) => Arc::new(PgResultStore::new(connect_with_retry(url).await)),
        None => {
            tracing::warn!("DATABASE_URL not set, quiz history will be kept in memory only");
            Arc::new(MemoryResultStore::new())
        }
    };

    let sessions = Arc::new(SessionCache::new(Arc::new(SystemClock), config.session_ttl));
    let sweeper = sessions.start(config.sweep_interval);

    let engine = Arc::new(QuizEngine::new(
        Arc::new(bank),
        sessions,
        store,
        config.persist_timeout,
    ));

    // Create AppState
    let state = AppState {
        engine,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Sessions live in this process only; run a single instance or pin
    // session affinity at the load balancer.
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", config.bind_addr, e));
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
    }

    sweeper.stop().await;
}

async fn connect_with_retry(database_url: &str) -> PgPool {
    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    pool
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
