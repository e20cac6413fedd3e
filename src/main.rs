//! Paylink server
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Config  │───▶│  Store   │───▶│   Services   │───▶│  HTTP (axum) │
//! │  (YAML)  │    │(PG / mem)│    │auth / wallet │    │  + Swagger   │
//! └──────────┘    └──────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Usage: `paylink [--env dev|prod] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;

use paylink::api::{self, state::AppState};
use paylink::auth::{AuthService, LogMailer, TokenService};
use paylink::clock::SystemClock;
use paylink::config::AppConfig;
use paylink::db::Database;
use paylink::money::AmountLimits;
use paylink::payment::PaystackClient;
use paylink::store::{MemoryWalletStore, PgWalletStore, WalletStore};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env).with_context(|| format!("loading config for '{env}'"))?;
    let _log_guard = paylink::logging::init_logging(&config);

    tracing::info!(build = env!("PAYLINK_BUILD"), "Starting Paylink in {} mode", env);

    let (store, db): (Arc<dyn WalletStore>, Option<Arc<Database>>) = match &config.postgres_url {
        Some(url) => {
            let db = Database::connect(url)
                .await
                .context("connecting to PostgreSQL")?;
            db.init_schema().await.context("initializing schema")?;
            let db = Arc::new(db);
            tracing::info!("Using PostgreSQL store");
            (Arc::new(PgWalletStore::new(db.clone())), Some(db))
        }
        None => {
            tracing::warn!("postgres_url not set; using in-memory store (data is lost on exit)");
            (Arc::new(MemoryWalletStore::new()), None)
        }
    };

    let tokens = TokenService::new(
        &config.auth.jwt_secret,
        chrono::Duration::hours(config.auth.token_ttl_hours),
    );
    let auth = Arc::new(AuthService::new(
        store.clone(),
        tokens,
        Arc::new(LogMailer),
        Arc::new(SystemClock),
        chrono::Duration::minutes(config.auth.reset_code_ttl_minutes),
    ));

    let gateway = PaystackClient::new(&config.paystack).context("building Paystack client")?;
    let limits = AmountLimits::new(config.limits.max_amount);

    let state = Arc::new(AppState::new(
        store,
        db,
        auth,
        Arc::new(gateway),
        limits,
    ));

    let port = get_port_override().unwrap_or(config.server.port);
    api::run_server(&config.server.host, port, state)
        .await
        .context("HTTP server failed")?;

    tracing::info!("Paylink stopped");
    Ok(())
}
