use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::account::PartySummary;

/// Ledger record type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Fund,
    Transfer,
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxType::Fund => write!(f, "fund"),
            TxType::Transfer => write!(f, "transfer"),
        }
    }
}

impl FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fund" => Ok(TxType::Fund),
            "transfer" => Ok(TxType::Transfer),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

/// Ledger record status
///
/// The engines only ever write `Completed`; `Pending` and `Failed` exist so
/// rows written by other tooling still decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Completed,
    Failed,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "pending"),
            TxStatus::Completed => write!(f, "completed"),
            TxStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TxStatus::Pending),
            "completed" => Ok(TxStatus::Completed),
            "failed" => Ok(TxStatus::Failed),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

/// Persisted ledger record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub id: Uuid,
    pub sender: Option<Uuid>,
    pub recipient: Uuid,
    pub amount: Decimal,
    pub tx_type: TxType,
    pub status: TxStatus,
    pub transaction_code: String,
    pub payment_method: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Record to append; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewLedgerRecord {
    pub sender: Option<Uuid>,
    pub recipient: Uuid,
    pub amount: Decimal,
    pub tx_type: TxType,
    pub transaction_code: String,
    pub payment_method: String,
    pub description: String,
}

impl NewLedgerRecord {
    pub fn transfer(sender: Uuid, recipient: Uuid, amount: Decimal, note: String) -> Self {
        Self {
            sender: Some(sender),
            recipient,
            amount,
            tx_type: TxType::Transfer,
            transaction_code: transfer_code(),
            payment_method: "internal".to_string(),
            description: note,
        }
    }

    pub fn fund(
        recipient: Uuid,
        amount: Decimal,
        reference: String,
        payment_method: String,
    ) -> Self {
        Self {
            sender: None,
            recipient,
            amount,
            tx_type: TxType::Fund,
            transaction_code: reference,
            payment_method,
            description: String::new(),
        }
    }
}

/// Fresh transfer code, e.g. `TXN-01HZY3...`
pub fn transfer_code() -> String {
    format!("TXN-{}", Ulid::new())
}

/// Fresh reference for direct (non-gateway) fundings.
pub fn direct_fund_code() -> String {
    format!("FND-{}", Ulid::new())
}

/// Ledger record with both parties resolved to display attributes
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryView {
    pub id: Uuid,
    pub sender: Option<PartySummary>,
    pub recipient: PartySummary,
    #[schema(value_type = String, example = "300.00")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub status: TxStatus,
    pub transaction_code: String,
    pub payment_method: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntryView {
    pub fn new(
        record: &LedgerRecord,
        sender: Option<PartySummary>,
        recipient: PartySummary,
    ) -> Self {
        Self {
            id: record.id,
            sender,
            recipient,
            amount: record.amount,
            tx_type: record.tx_type,
            status: record.status,
            transaction_code: record.transaction_code.clone(),
            payment_method: record.payment_method.clone(),
            description: record.description.clone(),
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_prefixed() {
        let a = transfer_code();
        let b = transfer_code();
        assert!(a.starts_with("TXN-"));
        assert_ne!(a, b);
        assert!(direct_fund_code().starts_with("FND-"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TxStatus::from_str("completed").unwrap(), TxStatus::Completed);
        assert_eq!(TxStatus::from_str("pending").unwrap(), TxStatus::Pending);
        assert!(TxStatus::from_str("done").is_err());
        assert_eq!(TxType::from_str("fund").unwrap(), TxType::Fund);
    }

    #[test]
    fn test_fund_record_has_no_sender() {
        let rec = NewLedgerRecord::fund(
            Uuid::new_v4(),
            Decimal::new(500, 0),
            "ref123".into(),
            "paystack".into(),
        );
        assert!(rec.sender.is_none());
        assert_eq!(rec.tx_type, TxType::Fund);
        assert_eq!(rec.transaction_code, "ref123");
    }
}
