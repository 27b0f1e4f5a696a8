use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use tokio::time::timeout;

use super::{Store, StoreError, OP_TIMEOUT};

const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

/// Leading bytes of every stored value that hold the expiry stamp.
const EXPIRY_PREFIX_LEN: usize = 8;

/// Single-file store backed by redb.
///
/// Each value carries its expiry deadline as a big-endian unix
/// millisecond prefix, zero meaning no expiry. Expired rows are removed
/// the next time they are read.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create the database at `path`, pre-creating the entries
    /// table so later reads never race its creation.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(unavailable)?;
        let txn = db.begin_write().map_err(unavailable)?;
        txn.open_table(ENTRIES).map_err(unavailable)?;
        txn.commit().map_err(unavailable)?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Run a blocking database operation off the async runtime, bounded
    /// by the store-wide timeout.
    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Database>) -> Result<T, StoreError> + Send + 'static,
    {
        let db = self.db.clone();
        match timeout(OP_TIMEOUT, tokio::task::spawn_blocking(move || op(db))).await {
            Err(_) => Err(StoreError::Timeout),
            Ok(Err(join_err)) => Err(StoreError::Unavailable(join_err.to_string())),
            Ok(Ok(result)) => result,
        }
    }

    async fn remove(&self, key: String) -> Result<(), StoreError> {
        self.run(move |db| {
            let txn = db.begin_write().map_err(unavailable)?;
            {
                let mut table = txn.open_table(ENTRIES).map_err(unavailable)?;
                table.remove(key.as_str()).map_err(unavailable)?;
            }
            txn.commit().map_err(unavailable)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl Store for RedbStore {
    async fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), StoreError> {
        let key = key.to_owned();
        let record = encode_record(value, ttl.map(deadline_ms));
        self.run(move |db| {
            let txn = db.begin_write().map_err(unavailable)?;
            {
                let mut table = txn.open_table(ENTRIES).map_err(unavailable)?;
                table
                    .insert(key.as_str(), record.as_slice())
                    .map_err(unavailable)?;
            }
            txn.commit().map_err(unavailable)?;
            Ok(())
        })
        .await
    }

    async fn put_if_absent(
        &self,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<bool, StoreError> {
        let key = key.to_owned();
        let record = encode_record(value, ttl.map(deadline_ms));
        // One write transaction covers the check and the insert, and redb
        // serializes writers, so racing claims cannot both win.
        self.run(move |db| {
            let txn = db.begin_write().map_err(unavailable)?;
            let claimed;
            {
                let mut table = txn.open_table(ENTRIES).map_err(unavailable)?;
                let live = match table.get(key.as_str()).map_err(unavailable)? {
                    Some(guard) => {
                        matches!(decode_record(guard.value().to_vec())?, Record::Live(_))
                    }
                    None => false,
                };
                claimed = !live;
                if claimed {
                    table
                        .insert(key.as_str(), record.as_slice())
                        .map_err(unavailable)?;
                }
            }
            txn.commit().map_err(unavailable)?;
            Ok(claimed)
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let owned = key.to_owned();
        let record = self
            .run(move |db| {
                let txn = db.begin_read().map_err(unavailable)?;
                let table = txn.open_table(ENTRIES).map_err(unavailable)?;
                let value = table.get(owned.as_str()).map_err(unavailable)?;
                Ok(value.map(|guard| guard.value().to_vec()))
            })
            .await?;

        match record.map(decode_record).transpose()? {
            None => Ok(None),
            Some(Record::Live(value)) => Ok(Some(value)),
            Some(Record::Expired) => {
                self.remove(key.to_owned()).await?;
                Ok(None)
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.run(|db| {
            db.begin_read().map_err(unavailable)?;
            Ok(())
        })
        .await
    }
}

enum Record {
    Live(Vec<u8>),
    Expired,
}

fn encode_record(value: &[u8], deadline_ms: Option<u64>) -> Vec<u8> {
    let mut record = Vec::with_capacity(EXPIRY_PREFIX_LEN + value.len());
    record.extend_from_slice(&deadline_ms.unwrap_or(0).to_be_bytes());
    record.extend_from_slice(value);
    record
}

fn decode_record(record: Vec<u8>) -> Result<Record, StoreError> {
    if record.len() < EXPIRY_PREFIX_LEN {
        return Err(StoreError::Unavailable("truncated record".to_owned()));
    }
    let mut stamp = [0u8; EXPIRY_PREFIX_LEN];
    stamp.copy_from_slice(&record[..EXPIRY_PREFIX_LEN]);
    let deadline = u64::from_be_bytes(stamp);
    if deadline != 0 && now_ms() >= deadline {
        return Ok(Record::Expired);
    }
    Ok(Record::Live(record[EXPIRY_PREFIX_LEN..].to_vec()))
}

fn deadline_ms(ttl: Duration) -> u64 {
    let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
    now_ms().saturating_add(ttl_ms)
}

fn now_ms() -> u64 {
    let since_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX)
}

fn unavailable(err: impl fmt::Display) -> StoreError {
    StoreError::Unavailable(err.to_string())
}
