//! Paylink - wallet and payments backend
//!
//! # Modules
//!
//! - [`account`] - Account records, identifiers and input validation
//! - [`ledger`] - Immutable transaction records
//! - [`money`] - Amount bounds and minor/major unit conversion
//! - [`store`] - Persistence seam (PostgreSQL and in-memory)
//! - [`wallet`] - Transfers, funding and balance reporting
//! - [`auth`] - Passwords, tokens, reset codes and the auth service
//! - [`payment`] - Payment gateway client
//! - [`api`] - HTTP surface (axum + OpenAPI)

pub mod account;
pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod money;
pub mod payment;
pub mod store;
pub mod wallet;

// Convenient re-exports at crate root
pub use account::{Account, AccountProfile, Identifier};
pub use ledger::{LedgerRecord, TxStatus, TxType};
pub use money::AmountLimits;
pub use store::{MemoryWalletStore, PgWalletStore, WalletStore};
pub use wallet::{BalanceReporter, FundingEngine, TransferEngine, WalletError};
