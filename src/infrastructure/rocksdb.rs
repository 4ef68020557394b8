use crate::domain::ports::{SubscriptionStore, TransactionStore, UserStore};
use crate::domain::subscription::{NewSubscription, Subscription};
use crate::domain::transaction::{NewTransaction, TransactionRecord};
use crate::domain::user::{Identity, RecordId, User};
use crate::error::{Result, TrackerError};
use async_trait::async_trait;
use chrono::Utc;
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Column Family for user rows, keyed by identity.
pub const CF_USERS: &str = "users";
/// Column Family for subscriptions, keyed by `(user id, subscription id)`.
pub const CF_SUBSCRIPTIONS: &str = "subscriptions";
/// Column Family for the transaction log, keyed by `(user id, transaction id)`.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family holding the last id handed out per table.
pub const CF_SEQUENCES: &str = "sequences";

/// A persistent store implementation using RocksDB.
///
/// Stores users, subscriptions and transactions in separate Column Families.
/// Child rows are keyed by the big-endian owner id followed by their own id, so a
/// forward scan over the owner prefix yields them in creation order.
///
/// Every append writes the row together with its id sequence in a single
/// `WriteBatch`; id allocation is serialized by a mutex.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    sequence_lock: Arc<Mutex<()>>,
}

fn internal(message: String) -> TrackerError {
    TrackerError::InternalError(Box::new(std::io::Error::other(message)))
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| {
        TrackerError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Serialization error: {}", e),
        )))
    })
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| {
        TrackerError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

fn child_key(owner: RecordId, id: RecordId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&owner.to_be_bytes());
    key[8..].copy_from_slice(&id.to_be_bytes());
    key
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that all required column families exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_USERS, CF_SUBSCRIPTIONS, CF_TRANSACTIONS, CF_SEQUENCES]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            sequence_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("{} column family not found", name)))
    }

    fn last_id(&self, table: &str) -> Result<RecordId> {
        let sequences = self.cf(CF_SEQUENCES)?;
        match self.db.get_cf(sequences, table)? {
            Some(bytes) => {
                let bytes: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| internal(format!("Corrupt sequence for {}", table)))?;
                Ok(RecordId::from_be_bytes(bytes))
            }
            None => Ok(0),
        }
    }

    /// Allocates the next id of `table` and writes the row built from it.
    fn append_row<T, F>(&self, table: &str, build: F) -> Result<T>
    where
        T: Serialize,
        F: FnOnce(RecordId) -> Result<(Vec<u8>, T)>,
    {
        let _guard = self
            .sequence_lock
            .lock()
            .map_err(|_| internal("Sequence lock poisoned".to_string()))?;

        let id = self.last_id(table)? + 1;
        let (key, row) = build(id)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(self.cf(CF_SEQUENCES)?, table, id.to_be_bytes());
        batch.put_cf(self.cf(table)?, key, encode(&row)?);
        self.db.write(batch)?;

        Ok(row)
    }

    fn scan_owner<T: DeserializeOwned>(&self, table: &str, owner: RecordId) -> Result<Vec<T>> {
        let cf = self.cf(table)?;
        let prefix = owner.to_be_bytes();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix[..], Direction::Forward));

        let mut rows = Vec::new();
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            rows.push(decode(&value)?);
        }
        Ok(rows)
    }
}

#[async_trait]
impl UserStore for RocksDBStore {
    async fn insert(&self, identity: Identity) -> Result<User> {
        let users = self.cf(CF_USERS)?;
        self.append_row(CF_USERS, |id| {
            if self.db.get_pinned_cf(users, identity.to_be_bytes())?.is_some() {
                return Err(TrackerError::AlreadyRegistered(identity));
            }
            Ok((identity.to_be_bytes().to_vec(), User::new(id, identity)))
        })
    }

    async fn get(&self, identity: Identity) -> Result<Option<User>> {
        let users = self.cf(CF_USERS)?;
        match self.db.get_cf(users, identity.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, user: User) -> Result<()> {
        let users = self.cf(CF_USERS)?;
        let key = user.identity.to_be_bytes();
        if self.db.get_pinned_cf(users, key)?.is_none() {
            return Err(TrackerError::NotRegistered(user.identity));
        }
        self.db.put_cf(users, key, encode(&user)?)?;
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for RocksDBStore {
    async fn append(&self, subscription: NewSubscription) -> Result<Subscription> {
        self.append_row(CF_SUBSCRIPTIONS, |id| {
            let key = child_key(subscription.user_id, id);
            Ok((key.to_vec(), Subscription::from_new(id, subscription)))
        })
    }

    async fn list_for_user(&self, user_id: RecordId) -> Result<Vec<Subscription>> {
        self.scan_owner(CF_SUBSCRIPTIONS, user_id)
    }

    async fn remove(&self, subscription: &Subscription) -> Result<()> {
        let key = child_key(subscription.user_id, subscription.id);
        self.db.delete_cf(self.cf(CF_SUBSCRIPTIONS)?, key)?;
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn append(&self, tx: NewTransaction) -> Result<TransactionRecord> {
        self.append_row(CF_TRANSACTIONS, |id| {
            let key = child_key(tx.user_id, id);
            Ok((key.to_vec(), TransactionRecord::from_new(id, tx, Utc::now())))
        })
    }

    async fn list_for_user(&self, user_id: RecordId) -> Result<Vec<TransactionRecord>> {
        self.scan_owner(CF_TRANSACTIONS, user_id)
    }
}
