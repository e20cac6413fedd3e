//! Ledger records
//!
//! Every balance-affecting event appends exactly one [`LedgerRecord`]. Records
//! are immutable once written.

pub mod models;

pub use models::{
    LedgerEntryView, LedgerRecord, NewLedgerRecord, TxStatus, TxType, direct_fund_code,
    transfer_code,
};
