// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

/// Number of questions in every assembled quiz.
pub const QUIZ_QUESTION_COUNT: usize = 10;

/// Time limit advertised to clients with every generated quiz.
pub const TIME_LIMIT_SECONDS: u64 = 600;

/// Topic label given to sessions drawn from the aggregate pool.
pub const AGGREGATE_TOPIC: &str = "mixed";

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. Results are kept in memory when absent.
    pub database_url: Option<String>,
    pub question_bank_path: String,
    pub bind_addr: String,
    pub session_ttl: Duration,
    pub sweep_interval: Duration,
    pub persist_timeout: Duration,
    pub cors_origins: Vec<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let question_bank_path = env::var("QUESTION_BANK_PATH")
            .unwrap_or_else(|_| "data/question_bank.json".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            database_url,
            question_bank_path,
            bind_addr,
            session_ttl: secs_from_env("SESSION_TTL_SECS", 3600),
            sweep_interval: secs_from_env("SWEEP_INTERVAL_SECS", 300),
            persist_timeout: secs_from_env("PERSIST_TIMEOUT_SECS", 5),
            cors_origins,
            rust_log,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            question_bank_path: "data/question_bank.json".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            session_ttl: Duration::from_secs(3600),
            sweep_interval: Duration::from_secs(300),
            persist_timeout: Duration::from_secs(5),
            cors_origins: Vec::new(),
            rust_log: "info".to_string(),
        }
    }
}

fn secs_from_env(key: &str, default: u64) -> Duration {
    let secs = match env::var(key) {
        Ok(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using {}s", key, raw, default);
            default
        }),
        Err(_) => default,
    };
    Duration::from_secs(secs)
}
