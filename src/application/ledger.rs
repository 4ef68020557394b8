use crate::domain::money::{Amount, Balance};
use crate::domain::ports::{SubscriptionStoreBox, TransactionStoreBox, UserStoreBox};
use crate::domain::subscription::{NewSubscription, Period, Subscription};
use crate::domain::transaction::{NewTransaction, TransactionKind, TransactionRecord};
use crate::domain::user::{Identity, RecordId, User};
use crate::error::{Result, TrackerError};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

/// Outcome of [`Ledger::register`].
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Created(User),
    Existing(User),
}

/// A completed subscription purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub subscription: Subscription,
    pub transaction: TransactionRecord,
    pub balance: Balance,
}

/// The only component allowed to change balances or append to the transaction log.
///
/// `Ledger` owns the storage backends and awaits every storage operation before
/// returning, so each operation is durable once it completes. It relies on the
/// caller processing messages one at a time: `adjust_balance` is a plain
/// read-modify-write.
pub struct Ledger {
    users: UserStoreBox,
    subscriptions: SubscriptionStoreBox,
    transactions: TransactionStoreBox,
}

impl Ledger {
    /// Creates a new `Ledger` instance.
    ///
    /// # Arguments
    ///
    /// * `users` - The store for user rows and balances.
    /// * `subscriptions` - The store for purchased subscriptions.
    /// * `transactions` - The append-only transaction log.
    pub fn new(
        users: UserStoreBox,
        subscriptions: SubscriptionStoreBox,
        transactions: TransactionStoreBox,
    ) -> Self {
        Self {
            users,
            subscriptions,
            transactions,
        }
    }

    /// Registers an identity, or returns the existing user if it is already known.
    pub async fn register(&self, identity: Identity) -> Result<Registration> {
        if let Some(user) = self.users.get(identity).await? {
            return Ok(Registration::Existing(user));
        }
        let user = self.users.insert(identity).await?;
        info!(identity, user_id = user.id, "registered user");
        Ok(Registration::Created(user))
    }

    pub async fn get(&self, identity: Identity) -> Result<Option<User>> {
        self.users.get(identity).await
    }

    async fn require(&self, identity: Identity) -> Result<User> {
        self.users
            .get(identity)
            .await?
            .ok_or(TrackerError::NotRegistered(identity))
    }

    /// Adds a signed amount to the user's balance and returns the new balance.
    ///
    /// A debit that would leave the balance below zero fails with
    /// `InsufficientFunds` and nothing is written. Every successful call must be
    /// paired with [`Ledger::record_transaction`]; [`Ledger::deposit`] and
    /// [`Ledger::purchase_subscription`] do both.
    pub async fn adjust_balance(&self, identity: Identity, amount: Decimal) -> Result<Balance> {
        let user = self.require(identity).await?;
        let adjusted = Self::adjusted(&user, amount)?;
        let balance = adjusted.balance;
        self.users.store(adjusted).await?;
        Ok(balance)
    }

    fn adjusted(user: &User, amount: Decimal) -> Result<User> {
        let mut adjusted = user.clone();
        adjusted.adjust(amount).inspect_err(|e| {
            warn!(identity = user.identity, %amount, error = %e, "rejected balance adjustment");
        })?;
        Ok(adjusted)
    }

    /// Puts back a user row saved before a later write of the same operation failed.
    async fn restore(&self, previous: User) {
        let identity = previous.identity;
        if let Err(e) = self.users.store(previous).await {
            error!(identity, error = %e, "failed to restore balance after a partial write");
        }
    }

    /// Appends an entry to the transaction log.
    pub async fn record_transaction(
        &self,
        user_id: RecordId,
        kind: TransactionKind,
        amount: Decimal,
        description: String,
    ) -> Result<TransactionRecord> {
        self.transactions
            .append(NewTransaction {
                user_id,
                kind,
                amount,
                description,
            })
            .await
    }

    pub async fn create_subscription(
        &self,
        user_id: RecordId,
        platform: String,
        cost: Amount,
        period: Period,
    ) -> Result<Subscription> {
        self.subscriptions
            .append(NewSubscription {
                user_id,
                platform,
                cost,
                period: period.label(),
            })
            .await
    }

    /// Credits the user's balance and logs the deposit.
    ///
    /// If the log entry cannot be written the previous balance is put back.
    pub async fn deposit(&self, identity: Identity, amount: Amount) -> Result<Balance> {
        let user = self.require(identity).await?;
        let adjusted = Self::adjusted(&user, amount.value())?;
        let balance = adjusted.balance;
        self.users.store(adjusted).await?;

        if let Err(e) = self
            .record_transaction(
                user.id,
                TransactionKind::Deposit,
                amount.value(),
                format!("Balance top-up of {}", amount),
            )
            .await
        {
            error!(identity, %amount, error = %e, "deposit not logged, reverting balance");
            self.restore(user).await;
            return Err(e);
        }

        info!(identity, %amount, %balance, "deposit applied");
        Ok(balance)
    }

    /// Debits the cost, creates the subscription and logs the purchase.
    ///
    /// Sufficiency is checked against the balance at the time of the call. When
    /// the balance does not cover the cost this fails with `InsufficientFunds`
    /// before any row is written. A failure after the debit removes whatever the
    /// purchase already wrote and puts the previous balance back.
    pub async fn purchase_subscription(
        &self,
        identity: Identity,
        platform: String,
        cost: Amount,
        period: Period,
    ) -> Result<Purchase> {
        let user = self.require(identity).await?;
        let adjusted = Self::adjusted(&user, cost.as_debit())?;
        let balance = adjusted.balance;
        self.users.store(adjusted).await?;

        let description = format!("Subscription to {} for {} for {}", platform, cost, period);
        let subscription = match self
            .create_subscription(user.id, platform, cost, period)
            .await
        {
            Ok(subscription) => subscription,
            Err(e) => {
                error!(identity, %cost, error = %e, "subscription not stored, reverting balance");
                self.restore(user).await;
                return Err(e);
            }
        };

        let transaction = match self
            .record_transaction(
                user.id,
                TransactionKind::SubscriptionPurchase,
                cost.as_debit(),
                description,
            )
            .await
        {
            Ok(transaction) => transaction,
            Err(e) => {
                error!(identity, %cost, error = %e, "purchase not logged, reverting subscription");
                if let Err(remove_error) = self.subscriptions.remove(&subscription).await {
                    error!(
                        identity,
                        subscription_id = subscription.id,
                        error = %remove_error,
                        "failed to remove unlogged subscription"
                    );
                }
                self.restore(user).await;
                return Err(e);
            }
        };

        info!(
            identity,
            platform = %subscription.platform,
            %cost,
            %balance,
            "subscription purchased"
        );
        Ok(Purchase {
            subscription,
            transaction,
            balance,
        })
    }

    /// Subscriptions of a registered user, oldest first.
    pub async fn subscriptions(&self, identity: Identity) -> Result<Vec<Subscription>> {
        let user = self.require(identity).await?;
        self.subscriptions.list_for_user(user.id).await
    }

    /// Transaction log of a registered user, oldest first.
    pub async fn history(&self, identity: Identity) -> Result<Vec<TransactionRecord>> {
        let user = self.require(identity).await?;
        self.transactions.list_for_user(user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{SubscriptionStore, TransactionStore};
    use crate::infrastructure::in_memory::{
        InMemorySubscriptionStore, InMemoryTransactionStore, InMemoryUserStore,
    };
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::io;

    struct UnavailableTransactionLog;

    #[async_trait]
    impl TransactionStore for UnavailableTransactionLog {
        async fn append(&self, _tx: NewTransaction) -> Result<TransactionRecord> {
            Err(TrackerError::IoError(io::Error::other("transaction log unavailable")))
        }

        async fn list_for_user(&self, _user_id: RecordId) -> Result<Vec<TransactionRecord>> {
            Ok(Vec::new())
        }
    }

    struct UnavailableSubscriptions;

    #[async_trait]
    impl SubscriptionStore for UnavailableSubscriptions {
        async fn append(&self, _subscription: NewSubscription) -> Result<Subscription> {
            Err(TrackerError::IoError(io::Error::other("subscriptions unavailable")))
        }

        async fn list_for_user(&self, _user_id: RecordId) -> Result<Vec<Subscription>> {
            Ok(Vec::new())
        }

        async fn remove(&self, _subscription: &Subscription) -> Result<()> {
            Ok(())
        }
    }

    fn ledger() -> Ledger {
        Ledger::new(
            Box::new(InMemoryUserStore::new()),
            Box::new(InMemorySubscriptionStore::new()),
            Box::new(InMemoryTransactionStore::new()),
        )
    }

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let ledger = ledger();

        let Registration::Created(user) = ledger.register(42).await.unwrap() else {
            panic!("first registration should create the user");
        };

        let second = ledger.register(42).await.unwrap();
        assert_eq!(second, Registration::Existing(user));
    }

    #[tokio::test]
    async fn test_get_unknown_identity() {
        let ledger = ledger();
        assert!(ledger.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_adjust_balance_rejects_overdraft() {
        let ledger = ledger();
        ledger.register(42).await.unwrap();
        ledger.adjust_balance(42, dec!(20)).await.unwrap();

        let result = ledger.adjust_balance(42, dec!(-25)).await;
        assert!(matches!(
            result,
            Err(TrackerError::InsufficientFunds { .. })
        ));

        let user = ledger.get(42).await.unwrap().unwrap();
        assert_eq!(user.balance, Balance::new(dec!(20)));
    }

    #[tokio::test]
    async fn test_adjust_balance_unknown_identity() {
        let ledger = ledger();
        let result = ledger.adjust_balance(42, dec!(5)).await;
        assert!(matches!(result, Err(TrackerError::NotRegistered(42))));
    }

    #[tokio::test]
    async fn test_deposit_logs_paired_transaction() {
        let ledger = ledger();
        ledger.register(42).await.unwrap();

        let balance = ledger.deposit(42, amount(dec!(50))).await.unwrap();
        assert_eq!(balance, Balance::new(dec!(50)));

        let history = ledger.history(42).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::Deposit);
        assert_eq!(history[0].amount, dec!(50));
        assert_eq!(history[0].description, "Balance top-up of 50.00");
    }

    #[tokio::test]
    async fn test_purchase_subscription() {
        let ledger = ledger();
        ledger.register(42).await.unwrap();
        ledger.deposit(42, amount(dec!(50))).await.unwrap();

        let purchase = ledger
            .purchase_subscription(
                42,
                "Service".to_string(),
                amount(dec!(30)),
                Period::months(2).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(purchase.balance, Balance::new(dec!(20)));
        assert_eq!(purchase.subscription.platform, "Service");
        assert_eq!(purchase.subscription.period, "2 months");
        assert_eq!(purchase.transaction.kind, TransactionKind::SubscriptionPurchase);
        assert_eq!(purchase.transaction.amount, dec!(-30));

        let subscriptions = ledger.subscriptions(42).await.unwrap();
        assert_eq!(subscriptions, vec![purchase.subscription]);
    }

    #[tokio::test]
    async fn test_purchase_subscription_insufficient_funds_writes_nothing() {
        let ledger = ledger();
        ledger.register(42).await.unwrap();
        ledger.deposit(42, amount(dec!(20))).await.unwrap();

        let result = ledger
            .purchase_subscription(
                42,
                "Service".to_string(),
                amount(dec!(25)),
                Period::months(1).unwrap(),
            )
            .await;
        assert!(matches!(
            result,
            Err(TrackerError::InsufficientFunds { .. })
        ));

        assert!(ledger.subscriptions(42).await.unwrap().is_empty());
        assert_eq!(ledger.history(42).await.unwrap().len(), 1);
        let user = ledger.get(42).await.unwrap().unwrap();
        assert_eq!(user.balance, Balance::new(dec!(20)));
    }

    #[tokio::test]
    async fn test_listing_requires_registration() {
        let ledger = ledger();
        assert!(matches!(
            ledger.history(42).await,
            Err(TrackerError::NotRegistered(42))
        ));
        assert!(matches!(
            ledger.subscriptions(42).await,
            Err(TrackerError::NotRegistered(42))
        ));
    }

    #[tokio::test]
    async fn test_deposit_reverts_balance_when_log_write_fails() {
        let ledger = Ledger::new(
            Box::new(InMemoryUserStore::new()),
            Box::new(InMemorySubscriptionStore::new()),
            Box::new(UnavailableTransactionLog),
        );
        ledger.register(42).await.unwrap();

        let result = ledger.deposit(42, amount(dec!(50))).await;
        assert!(matches!(result, Err(TrackerError::IoError(_))));

        let user = ledger.get(42).await.unwrap().unwrap();
        assert_eq!(user.balance, Balance::ZERO);
    }

    #[tokio::test]
    async fn test_purchase_reverts_subscription_and_balance_when_log_write_fails() {
        let ledger = Ledger::new(
            Box::new(InMemoryUserStore::new()),
            Box::new(InMemorySubscriptionStore::new()),
            Box::new(UnavailableTransactionLog),
        );
        ledger.register(42).await.unwrap();
        ledger.adjust_balance(42, dec!(50)).await.unwrap();

        let result = ledger
            .purchase_subscription(
                42,
                "Service".to_string(),
                amount(dec!(30)),
                Period::months(1).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(TrackerError::IoError(_))));

        assert!(ledger.subscriptions(42).await.unwrap().is_empty());
        let user = ledger.get(42).await.unwrap().unwrap();
        assert_eq!(user.balance, Balance::new(dec!(50)));
    }

    #[tokio::test]
    async fn test_purchase_reverts_balance_when_subscription_write_fails() {
        let ledger = Ledger::new(
            Box::new(InMemoryUserStore::new()),
            Box::new(UnavailableSubscriptions),
            Box::new(InMemoryTransactionStore::new()),
        );
        ledger.register(42).await.unwrap();
        ledger.deposit(42, amount(dec!(50))).await.unwrap();

        let result = ledger
            .purchase_subscription(
                42,
                "Service".to_string(),
                amount(dec!(30)),
                Period::months(1).unwrap(),
            )
            .await;
        assert!(matches!(result, Err(TrackerError::IoError(_))));

        let user = ledger.get(42).await.unwrap().unwrap();
        assert_eq!(user.balance, Balance::new(dec!(50)));
        assert_eq!(ledger.history(42).await.unwrap().len(), 1);
    }
}
