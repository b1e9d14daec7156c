use crate::domain::ports::ProjectStore;
use crate::domain::project::Project;
use crate::error::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for project snapshots.
///
/// Uses `Arc<RwLock<IndexMap<String, Project>>>` so that `get_all` returns
/// projects in the order they were first stored.
#[derive(Default, Clone)]
pub struct InMemoryProjectStore {
    projects: Arc<RwLock<IndexMap<String, Project>>>,
}

impl InMemoryProjectStore {
    /// Creates a new, empty in-memory project store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn store(&self, project: Project) -> Result<()> {
        let mut projects = self.projects.write().await;
        projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn get(&self, project_id: &str) -> Result<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(project_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::project::{Member, Workspace};

    #[tokio::test]
    async fn test_in_memory_project_store() {
        let store = InMemoryProjectStore::new();
        let project = Workspace::sample("2024-05-01").projects.remove(0);

        store.store(project.clone()).await.unwrap();
        let retrieved = store.get("sample").await.unwrap().unwrap();
        assert_eq!(retrieved, project);

        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_store_overwrites_by_id() {
        let store = InMemoryProjectStore::new();
        let mut project = Workspace::sample("2024-05-01").projects.remove(0);
        store.store(project.clone()).await.unwrap();

        project.members.push(Member::new("member-d", "D"));
        project.expenses[0].amount = Money::from(4800);
        store.store(project.clone()).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].members.len(), 4);
        assert_eq!(all[0].expenses[0].amount, Money::from(4800));
    }

    #[tokio::test]
    async fn test_in_memory_store_get_all_keeps_insertion_order() {
        let store = InMemoryProjectStore::new();
        for id in ["trip", "dinner", "rent"] {
            let project = Project {
                id: id.to_string(),
                ..Default::default()
            };
            store.store(project).await.unwrap();
        }

        let ids: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["trip", "dinner", "rent"]);
    }
}
