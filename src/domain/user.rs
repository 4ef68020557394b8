use super::money::Balance;
use crate::error::TrackerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The chat platform's stable per-user identifier.
pub type Identity = i64;

/// Store-assigned surrogate key shared by all persisted records.
pub type RecordId = u64;

/// A registered user and their current balance.
///
/// The balance only changes through [`User::adjust`], which the ledger pairs with
/// a transaction record.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct User {
    /// Surrogate key assigned by the user store.
    pub id: RecordId,
    /// Chat platform identity, unique across users.
    pub identity: Identity,
    /// Current balance, never negative.
    pub balance: Balance,
}

impl User {
    pub fn new(id: RecordId, identity: Identity) -> Self {
        Self {
            id,
            identity,
            balance: Balance::ZERO,
        }
    }

    /// Applies a signed adjustment and returns the new balance.
    ///
    /// Fails with `InsufficientFunds` when the result would drop below zero; the
    /// balance is left untouched in that case.
    pub fn adjust(&mut self, delta: Decimal) -> Result<Balance, TrackerError> {
        let updated = Balance::new(self.balance.value() + delta);
        if updated.is_negative() {
            return Err(TrackerError::InsufficientFunds {
                balance: self.balance.value(),
                required: -delta,
            });
        }
        self.balance = updated;
        Ok(updated)
    }
}
