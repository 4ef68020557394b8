use super::subscription::{NewSubscription, Subscription};
use super::transaction::{NewTransaction, TransactionRecord};
use super::user::{Identity, RecordId, User};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a user with a zero balance. Fails with `AlreadyRegistered` if the
    /// identity is taken.
    async fn insert(&self, identity: Identity) -> Result<User>;
    async fn get(&self, identity: Identity) -> Result<Option<User>>;
    /// Overwrites an existing user row.
    async fn store(&self, user: User) -> Result<()>;
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn append(&self, subscription: NewSubscription) -> Result<Subscription>;
    /// All subscriptions of a user, oldest first.
    async fn list_for_user(&self, user_id: RecordId) -> Result<Vec<Subscription>>;
    /// Deletes a stored subscription. Removing an unknown row is a no-op.
    async fn remove(&self, subscription: &Subscription) -> Result<()>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Appends an entry, assigning its id and creation timestamp.
    async fn append(&self, tx: NewTransaction) -> Result<TransactionRecord>;
    /// All entries of a user, oldest first.
    async fn list_for_user(&self, user_id: RecordId) -> Result<Vec<TransactionRecord>>;
}

pub type UserStoreBox = Box<dyn UserStore>;
pub type SubscriptionStoreBox = Box<dyn SubscriptionStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
