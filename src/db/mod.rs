//! Database connection management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts_tb (
    account_id            UUID PRIMARY KEY,
    firstname             TEXT NOT NULL,
    lastname              TEXT NOT NULL,
    email                 TEXT NOT NULL,
    phone                 TEXT NOT NULL,
    password_hash         TEXT NOT NULL,
    dob                   TEXT,
    gender                TEXT,
    account_number        TEXT NOT NULL,
    balance               NUMERIC(20, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0),
    reset_code            TEXT,
    reset_code_expires_at TIMESTAMPTZ,
    role                  TEXT NOT NULL DEFAULT 'user',
    is_active             BOOLEAN NOT NULL DEFAULT TRUE,
    created_at            TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at            TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT accounts_tb_email_key UNIQUE (email),
    CONSTRAINT accounts_tb_phone_key UNIQUE (phone),
    CONSTRAINT accounts_tb_account_number_key UNIQUE (account_number)
)
"#;

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions_tb (
    transaction_id   UUID PRIMARY KEY,
    sender_id        UUID REFERENCES accounts_tb (account_id),
    recipient_id     UUID NOT NULL REFERENCES accounts_tb (account_id),
    amount           NUMERIC(20, 2) NOT NULL CHECK (amount > 0),
    tx_type          TEXT NOT NULL CHECK (tx_type IN ('fund', 'transfer')),
    status           TEXT NOT NULL DEFAULT 'pending'
                     CHECK (status IN ('pending', 'completed', 'failed')),
    transaction_code TEXT NOT NULL,
    payment_method   TEXT NOT NULL DEFAULT 'internal',
    description      TEXT NOT NULL DEFAULT '',
    created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT transactions_tb_transaction_code_key UNIQUE (transaction_code)
)
"#;

const CREATE_SENDER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transactions_sender ON transactions_tb (sender_id)";

const CREATE_RECIPIENT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_transactions_recipient ON transactions_tb (recipient_id)";

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create tables and indexes if they do not exist
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        for stmt in [
            CREATE_ACCOUNTS_TABLE,
            CREATE_TRANSACTIONS_TABLE,
            CREATE_SENDER_INDEX,
            CREATE_RECIPIENT_INDEX,
        ] {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        tracing::info!("Wallet schema initialized");
        Ok(())
    }
}
