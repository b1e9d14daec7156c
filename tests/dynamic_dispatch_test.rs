use warikan::application::engine::Ledger;
use warikan::domain::money::Money;
use warikan::domain::ports::ProjectStoreBox;
use warikan::domain::project::Workspace;
use warikan::infrastructure::in_memory::InMemoryProjectStore;

#[tokio::test]
async fn test_store_as_trait_object() {
    let store: ProjectStoreBox = Box::new(InMemoryProjectStore::new());
    let project = Workspace::sample("2024-05-01").projects.remove(0);

    // Verify Send + Sync by spawning a task
    let handle = tokio::spawn(async move {
        store.store(project).await.unwrap();
        store.get("sample").await.unwrap().unwrap()
    });

    let retrieved = handle.await.unwrap();
    let balances = Ledger::new(&retrieved).balances();
    assert_eq!(balances.balance["member-a"], Money::from(2400));
}

#[tokio::test]
async fn test_ledgers_computed_concurrently() {
    let workspace = Workspace::sample("2024-05-01");
    let project = std::sync::Arc::new(workspace.projects[0].clone());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let project = project.clone();
            tokio::spawn(async move { Ledger::new(&project).report() })
        })
        .collect();

    let mut reports = Vec::new();
    for handle in handles {
        reports.push(handle.await.unwrap());
    }
    assert!(reports.windows(2).all(|w| w[0] == w[1]));
}
