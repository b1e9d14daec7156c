use crate::domain::ports::ProjectStore;
use crate::domain::project::Project;
use crate::error::{LedgerError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing project snapshots.
pub const CF_PROJECTS: &str = "projects";

/// A persistent store implementation using RocksDB.
///
/// Each project is stored as its JSON data model under its id, so the values
/// are the same documents the JSON export produces.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "projects" column family exists.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_projects = ColumnFamilyDescriptor::new(CF_PROJECTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_projects])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn missing_cf() -> LedgerError {
        LedgerError::InternalError(Box::new(std::io::Error::other(
            "Projects column family not found",
        )))
    }
}

#[async_trait]
impl ProjectStore for RocksDBStore {
    async fn store(&self, project: Project) -> Result<()> {
        let cf = self.db.cf_handle(CF_PROJECTS).ok_or_else(Self::missing_cf)?;

        let value = serde_json::to_vec(&project)?;
        self.db.put_cf(&cf, project.id.as_bytes(), value)?;

        Ok(())
    }

    async fn get(&self, project_id: &str) -> Result<Option<Project>> {
        let cf = self.db.cf_handle(CF_PROJECTS).ok_or_else(Self::missing_cf)?;

        match self.db.get_cf(&cf, project_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Project>> {
        let cf = self.db.cf_handle(CF_PROJECTS).ok_or_else(Self::missing_cf)?;

        let mut projects = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            projects.push(serde_json::from_slice(&value)?);
        }

        Ok(projects)
    }
}
