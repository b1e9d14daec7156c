use super::project::Project;
use crate::error::Result;
use async_trait::async_trait;

/// Persistence for project snapshots, keyed by project id.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn store(&self, project: Project) -> Result<()>;
    async fn get(&self, project_id: &str) -> Result<Option<Project>>;
    async fn get_all(&self) -> Result<Vec<Project>>;
}

pub type ProjectStoreBox = Box<dyn ProjectStore>;
pub type ProjectStoreFactory = Box<dyn Fn() -> ProjectStoreBox + Send + Sync>;
