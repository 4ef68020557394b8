use super::money::Amount;
use super::user::RecordId;
use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subscription length in months, always within `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period(u8);

impl Period {
    pub const MIN_MONTHS: u8 = 1;
    pub const MAX_MONTHS: u8 = 12;

    pub fn months(months: u8) -> Result<Self, TrackerError> {
        if (Self::MIN_MONTHS..=Self::MAX_MONTHS).contains(&months) {
            Ok(Self(months))
        } else {
            Err(TrackerError::ValidationError(format!(
                "Period must be between {} and {} months",
                Self::MIN_MONTHS,
                Self::MAX_MONTHS
            )))
        }
    }

    /// Human-readable label stored on the subscription, e.g. "2 months".
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 1 {
            write!(f, "1 month")
        } else {
            write!(f, "{} months", self.0)
        }
    }
}

/// A subscription row as handed to the store; id is assigned on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub user_id: RecordId,
    pub platform: String,
    pub cost: Amount,
    pub period: String,
}

/// A recorded subscription purchase. Immutable once stored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Subscription {
    pub id: RecordId,
    pub user_id: RecordId,
    pub platform: String,
    pub cost: Amount,
    pub period: String,
}

impl Subscription {
    pub fn from_new(id: RecordId, new: NewSubscription) -> Self {
        Self {
            id,
            user_id: new.user_id,
            platform: new.platform,
            cost: new.cost,
            period: new.period,
        }
    }
}
