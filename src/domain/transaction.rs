use super::user::RecordId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Deposit,
    SubscriptionPurchase,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::SubscriptionPurchase => "subscription-purchase",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ledger entry as handed to the store. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: RecordId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
}

/// An append-only ledger entry. `amount` is signed: credits positive, debits negative.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransactionRecord {
    pub id: RecordId,
    pub user_id: RecordId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn from_new(id: RecordId, new: NewTransaction, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new.user_id,
            kind: new.kind,
            amount: new.amount,
            description: new.description,
            created_at,
        }
    }
}
