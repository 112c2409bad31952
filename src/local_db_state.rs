use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info};

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::persistence::KeyValueSlots;

const SLOTS_DB_NAME: &str = "slots";

/// LMDB-backed durable key-value area.
///
/// One named database inside one environment; each log owns a single key
/// and overwrites its whole value on every save. Every write is its own
/// committed transaction, so a slot always holds either the previous or the
/// new collection, never a mix.
pub struct AppDbState {
    env: Environment,
    db: Database,
    path: PathBuf,
}

impl AppDbState {
    pub fn init(config: &StoreConfig) -> StoreResult<Self> {
        if !config.path.exists() {
            info!("Creating new database at: {}", config.path.display());
            fs::create_dir_all(&config.path)?;
        } else {
            info!("Opening existing database at: {}", config.path.display());
        }

        let env = Environment::new()
            .set_max_dbs(1)
            .set_map_size(config.map_size)
            .open(&config.path)?;
        let db = env.create_db(Some(SLOTS_DB_NAME), DatabaseFlags::empty())?;

        Ok(Self {
            env,
            db,
            path: config.path.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_slot(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let txn = self.env.begin_ro_txn()?;
        let value = match txn.get(self.db, &key) {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(value)
    }

    pub fn write_slot(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &bytes, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Wrote {} bytes to slot '{key}'", bytes.len());
        Ok(())
    }

    /// Flushes the environment to disk.
    ///
    /// LMDB closes the environment when it is dropped; this is the explicit
    /// point a host calls before a hot restart or shutdown.
    pub fn close_database(&self) -> StoreResult<()> {
        self.env.sync(true)?;
        info!("Database at {} synced and ready to close", self.path.display());
        Ok(())
    }
}

impl KeyValueSlots for AppDbState {
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.read_slot(key)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.write_slot(key, bytes)
    }
}
