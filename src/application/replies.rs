//! Texts the bot sends back.

use crate::domain::command::Command;
use crate::domain::conversation::{InputError, Prompt};
use crate::domain::money::{Amount, Balance};
use crate::domain::subscription::Subscription;
use crate::domain::transaction::TransactionRecord;

pub const WELCOME: &str = "Welcome! You are now registered.";
pub const WELCOME_BACK: &str = "Welcome back! You are already registered.";
pub const NOT_REGISTERED: &str = "Please register first with /start.";
pub const USER_NOT_FOUND: &str = "User not found. Please register with /start.";
pub const FUND_FIRST: &str = "Please top up your balance before adding a subscription.";
pub const INSUFFICIENT_FUNDS: &str = "Insufficient funds for this subscription.";
pub const NO_SUBSCRIPTIONS: &str = "You have no active subscriptions.";
pub const EMPTY_HISTORY: &str = "Your transaction history is empty.";

pub fn prompt(prompt: Prompt) -> &'static str {
    match prompt {
        Prompt::DepositAmount => "Enter the amount to deposit (a positive whole number):",
        Prompt::Platform => "Which platform do you want to subscribe to?",
        Prompt::Cost => "How much does the subscription cost?",
        Prompt::Period => "For how many months do you want to subscribe? (1-12)",
    }
}

pub fn input_error(error: InputError) -> &'static str {
    match error {
        InputError::NotANumber => "Please enter a valid amount.",
        InputError::NotPositive => "Please enter a positive whole number for the amount.",
        InputError::AboveDepositCap => "The maximum deposit is 100000.",
        InputError::InvalidPeriod => "Please enter a valid number of months.",
        InputError::PeriodOutOfRange => "Please enter a number of months from 1 to 12.",
    }
}

pub fn help() -> String {
    let mut reply = String::from("Available commands:");
    for command in Command::ALL {
        reply.push_str(&format!("\n/{} - {}", command.keyword(), command.description()));
    }
    reply
}

pub fn balance(balance: Balance) -> String {
    format!("Your current balance: {}.", balance)
}

pub fn deposited(amount: Amount, balance: Balance) -> String {
    format!(
        "Your balance was topped up by {}. Current balance: {}.",
        amount, balance
    )
}

pub fn subscribed(subscription: &Subscription) -> String {
    format!(
        "You have subscribed to {} for {} for {}.",
        subscription.platform, subscription.cost, subscription.period
    )
}

pub fn subscriptions(subscriptions: &[Subscription]) -> String {
    let mut reply = String::from("Your active subscriptions:");
    for s in subscriptions {
        reply.push_str(&format!("\n- {}: {} for {}", s.platform, s.period, s.cost));
    }
    reply
}

pub fn history(transactions: &[TransactionRecord]) -> String {
    let mut reply = String::from("Transaction history:");
    for t in transactions {
        reply.push_str(&format!(
            "\n{} {} {:+} - {}",
            t.created_at.format("%Y-%m-%d %H:%M:%S"),
            t.kind,
            Balance::new(t.amount),
            t.description
        ));
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionKind;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_help_lists_every_command() {
        let text = help();
        for command in Command::ALL {
            assert!(text.contains(&format!("/{}", command.keyword())));
        }
    }

    #[test]
    fn test_subscribed_uses_stored_record() {
        let subscription = Subscription {
            id: 3,
            user_id: 1,
            platform: "Music".to_string(),
            cost: Amount::new(dec!(9.5)).unwrap(),
            period: "1 month".to_string(),
        };
        assert_eq!(
            subscribed(&subscription),
            "You have subscribed to Music for 9.50 for 1 month."
        );
    }

    #[test]
    fn test_history_line_format() {
        let record = TransactionRecord {
            id: 1,
            user_id: 1,
            kind: TransactionKind::SubscriptionPurchase,
            amount: dec!(-30),
            description: "Subscription to Service for 30.00 for 2 months".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };
        assert_eq!(
            history(&[record]),
            "Transaction history:\n2024-05-01 12:30:00 subscription-purchase -30.00 - \
             Subscription to Service for 30.00 for 2 months"
        );
    }
}
