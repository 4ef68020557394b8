//! Multi-step dialogues collecting input for deposits and subscriptions.
//!
//! Transitions are pure: given a dialogue and the user's next message they produce
//! a [`Transition`] describing what the router must do next. No I/O happens here.

use super::money::Amount;
use super::subscription::Period;
use rust_decimal::Decimal;
use thiserror::Error;

/// Largest amount accepted by a single deposit.
pub const MAX_DEPOSIT: u64 = 100_000;

/// An open dialogue and the input collected so far.
#[derive(Debug, Clone, PartialEq)]
pub enum Dialogue {
    /// Waiting for the deposit amount.
    Deposit,
    Subscription(SubscriptionStep),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubscriptionStep {
    Platform,
    Cost { platform: String },
    Period { platform: String, cost: Amount },
}

/// The question the bot asks when a dialogue enters a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    DepositAmount,
    Platform,
    Cost,
    Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("input is not a whole number")]
    NotANumber,
    #[error("amount must be positive")]
    NotPositive,
    #[error("amount exceeds the deposit limit of 100000")]
    AboveDepositCap,
    #[error("input is not a number of months")]
    InvalidPeriod,
    #[error("period must be between 1 and 12 months")]
    PeriodOutOfRange,
}

/// Fully collected input, ready to be applied to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Deposit(Amount),
    Subscription {
        platform: String,
        cost: Amount,
        period: Period,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Input accepted; the dialogue moves on and asks the next question.
    Continue(Dialogue, Prompt),
    /// Input rejected; the dialogue stays on the same step.
    Retry(Dialogue, InputError),
    /// Input rejected; the dialogue is closed.
    Abort(InputError),
    /// Last step accepted; the dialogue is closed.
    Complete(Completion),
}

impl Dialogue {
    pub fn deposit() -> (Self, Prompt) {
        (Dialogue::Deposit, Prompt::DepositAmount)
    }

    pub fn subscription() -> (Self, Prompt) {
        (
            Dialogue::Subscription(SubscriptionStep::Platform),
            Prompt::Platform,
        )
    }

    /// Feeds the user's next message into the dialogue.
    ///
    /// A rejected deposit amount closes the dialogue, while rejected subscription
    /// costs and periods keep it on the same step so the user can answer again.
    pub fn advance(self, input: &str) -> Transition {
        match self {
            Dialogue::Deposit => match parse_deposit(input) {
                Ok(amount) => Transition::Complete(Completion::Deposit(amount)),
                Err(e) => Transition::Abort(e),
            },
            Dialogue::Subscription(step) => step.advance(input),
        }
    }
}

impl SubscriptionStep {
    fn advance(self, input: &str) -> Transition {
        match self {
            SubscriptionStep::Platform => Transition::Continue(
                Dialogue::Subscription(SubscriptionStep::Cost {
                    platform: input.trim().to_string(),
                }),
                Prompt::Cost,
            ),
            SubscriptionStep::Cost { platform } => match parse_cost(input) {
                Ok(cost) => Transition::Continue(
                    Dialogue::Subscription(SubscriptionStep::Period { platform, cost }),
                    Prompt::Period,
                ),
                Err(e) => Transition::Retry(
                    Dialogue::Subscription(SubscriptionStep::Cost { platform }),
                    e,
                ),
            },
            SubscriptionStep::Period { platform, cost } => match parse_period(input) {
                Ok(period) => Transition::Complete(Completion::Subscription {
                    platform,
                    cost,
                    period,
                }),
                Err(e) => Transition::Retry(
                    Dialogue::Subscription(SubscriptionStep::Period { platform, cost }),
                    e,
                ),
            },
        }
    }
}

/// Parses ASCII digits only. `Ok(None)` means the digits overflow `u64`.
fn parse_digits(input: &str) -> Result<Option<u64>, InputError> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NotANumber);
    }
    Ok(input.parse().ok())
}

fn positive_amount(value: u64) -> Result<Amount, InputError> {
    Amount::new(Decimal::from(value)).map_err(|_| InputError::NotPositive)
}

fn parse_deposit(input: &str) -> Result<Amount, InputError> {
    match parse_digits(input)? {
        Some(value) if value <= MAX_DEPOSIT => positive_amount(value),
        _ => Err(InputError::AboveDepositCap),
    }
}

fn parse_cost(input: &str) -> Result<Amount, InputError> {
    let value = parse_digits(input)?.ok_or(InputError::NotANumber)?;
    positive_amount(value)
}

fn parse_period(input: &str) -> Result<Period, InputError> {
    let months = parse_digits(input)
        .map_err(|_| InputError::InvalidPeriod)?
        .and_then(|value| u8::try_from(value).ok())
        .ok_or(InputError::PeriodOutOfRange)?;
    Period::months(months).map_err(|_| InputError::PeriodOutOfRange)
}
