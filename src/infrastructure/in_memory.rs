use crate::domain::ports::{SubscriptionStore, TransactionStore, UserStore};
use crate::domain::subscription::{NewSubscription, Subscription};
use crate::domain::transaction::{NewTransaction, TransactionRecord};
use crate::domain::user::{Identity, RecordId, User};
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct UserTable {
    by_identity: HashMap<Identity, User>,
    last_id: RecordId,
}

/// A thread-safe in-memory store for users.
///
/// Uses `Arc<RwLock<..>>` to allow shared concurrent access. Ids are allocated
/// under the write lock, so they are unique and increasing.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<UserTable>>,
}

impl InMemoryUserStore {
    /// Creates a new, empty in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, identity: Identity) -> Result<User> {
        let mut users = self.users.write().await;
        if users.by_identity.contains_key(&identity) {
            return Err(TrackerError::AlreadyRegistered(identity));
        }
        users.last_id += 1;
        let user = User::new(users.last_id, identity);
        users.by_identity.insert(identity, user.clone());
        Ok(user)
    }

    async fn get(&self, identity: Identity) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.by_identity.get(&identity).cloned())
    }

    async fn store(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        match users.by_identity.get_mut(&user.identity) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(TrackerError::NotRegistered(user.identity)),
        }
    }
}

/// A thread-safe in-memory store for subscriptions, kept in insertion order.
#[derive(Default, Clone)]
pub struct InMemorySubscriptionStore {
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn append(&self, subscription: NewSubscription) -> Result<Subscription> {
        let mut subscriptions = self.subscriptions.write().await;
        let id = subscriptions.last().map_or(0, |s| s.id) + 1;
        let subscription = Subscription::from_new(id, subscription);
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn list_for_user(&self, user_id: RecordId) -> Result<Vec<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn remove(&self, subscription: &Subscription) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.retain(|s| s.id != subscription.id);
        Ok(())
    }
}

/// A thread-safe in-memory transaction log, kept in insertion order.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn append(&self, tx: NewTransaction) -> Result<TransactionRecord> {
        let mut transactions = self.transactions.write().await;
        let id = transactions.len() as RecordId + 1;
        let record = TransactionRecord::from_new(id, tx, Utc::now());
        transactions.push(record.clone());
        Ok(record)
    }

    async fn list_for_user(&self, user_id: RecordId) -> Result<Vec<TransactionRecord>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }
}
