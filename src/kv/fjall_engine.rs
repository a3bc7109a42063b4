//! Engine implementation using fjall.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, error, info, trace};

use super::engine::{Engine, KeyIter};
use super::error::KvError;
use super::options::StoreOptions;

/// An [`Engine`] backed by a fjall database.
///
/// fjall is an LSM-tree store with a write-ahead journal. All values live
/// in a single keyspace of the database, named by
/// [`StoreOptions::keyspace`]. The database holds an exclusive lock on its
/// directory until it is dropped.
pub struct FjallEngine {
    db: fjall::Database,
    data: Keyspace,
}

impl FjallEngine {
    /// Open (or create) a fjall database at `path`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use typed_kv::{FjallEngine, StoreOptions};
    ///
    /// let engine = FjallEngine::open(".typed-kv", &StoreOptions::default())?;
    /// ```
    pub fn open(path: impl AsRef<Path>, options: &StoreOptions) -> Result<Self, KvError> {
        let path = path.as_ref();
        debug!(
            path = %path.display(),
            keyspace = %options.keyspace,
            create_if_missing = options.create_if_missing,
            "opening fjall database"
        );

        let open_error = |source: Box<dyn std::error::Error + Send + Sync>| {
            error!(path = %path.display(), error = %source, "failed to open database");
            KvError::Open {
                path: path.display().to_string(),
                source,
            }
        };

        if !options.create_if_missing && !path.exists() {
            return Err(open_error(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "store directory does not exist",
            ))));
        }

        let db = fjall::Database::builder(path)
            .open()
            .map_err(|e| open_error(Box::new(e)))?;
        let data = db
            .keyspace(&options.keyspace, KeyspaceCreateOptions::default)
            .map_err(|e| open_error(Box::new(e)))?;

        info!(path = %path.display(), keyspace = %options.keyspace, "fjall database opened");
        Ok(Self { db, data })
    }
}

impl Engine for FjallEngine {
    type Error = fjall::Error;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, fjall::Error> {
        Ok(self.data.get(key)?.map(|v| v.to_vec()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), fjall::Error> {
        self.data.insert(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), fjall::Error> {
        self.data.remove(key)
    }

    fn flush(&self) -> Result<(), fjall::Error> {
        trace!("persisting journal");
        self.db.persist(PersistMode::SyncAll)
    }

    fn keys(&self) -> KeyIter<'_, fjall::Error> {
        Box::new(self.data.iter().map(|kv| kv.key().map(|k| k.to_vec())))
    }

    fn prefix(&self, prefix: &[u8]) -> KeyIter<'_, fjall::Error> {
        Box::new(
            self.data
                .prefix(prefix.to_vec())
                .map(|kv| kv.key().map(|k| k.to_vec())),
        )
    }

    fn close(self) -> Result<(), fjall::Error> {
        self.db.persist(PersistMode::SyncAll)?;
        drop(self.data);
        drop(self.db);
        Ok(())
    }
}
