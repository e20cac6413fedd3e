//! Account management module
//!
//! Wallet accounts, their public views and identifier validation.

pub mod models;
pub mod validation;

pub use models::{Account, AccountProfile, Gender, NewAccount, PartySummary, ResetCode, Role};
pub use validation::{Identifier, ValidationError};
