use crate::application::allocator::{Allocation, ShareAllocator};
use crate::application::balances::{self, Balances};
use crate::application::netting;
use crate::application::settlement::{self, Transfer};
use crate::domain::project::{Expense, Project};

/// The entry point for ledger computations on one project snapshot.
///
/// `Ledger` only borrows the project: every method is a pure function of the
/// snapshot, so a ledger can be rebuilt after each edit and shared freely
/// between threads.
pub struct Ledger<'a> {
    project: &'a Project,
    allocator: ShareAllocator<'a>,
}

/// Everything the settle-up view shows for a project.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerReport {
    pub balances: Balances,
    pub settlement: Vec<Transfer>,
    pub pairwise: Vec<Transfer>,
}

impl<'a> Ledger<'a> {
    /// Creates a new `Ledger` over `project`.
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            allocator: ShareAllocator::new(project),
        }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    /// What each member owes for a single expense.
    pub fn allocate(&self, expense: &Expense) -> Allocation {
        self.allocator.allocate(expense)
    }

    /// Paid, owed, adjustment and net balance per active member.
    pub fn balances(&self) -> Balances {
        balances::aggregate_with(self.project, &self.allocator)
    }

    /// Suggested transfers that zero every balance.
    pub fn settlement(&self) -> Vec<Transfer> {
        settlement::settle(&self.balances().balance)
    }

    /// Net directional debt per pair of members.
    pub fn pairwise(&self) -> Vec<Transfer> {
        netting::pairwise_net_with(self.project, &self.allocator)
    }

    /// Computes balances once and derives the settlement from them.
    pub fn report(&self) -> LedgerReport {
        let balances = self.balances();
        let settlement = settlement::settle(&balances.balance);
        LedgerReport {
            settlement,
            pairwise: self.pairwise(),
            balances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::project::{Adjustment, MemberId, Workspace};

    #[test]
    fn test_sample_project_report() {
        let workspace = Workspace::sample("2024-05-01");
        let project = workspace.active_project().unwrap();
        let report = Ledger::new(project).report();

        assert_eq!(report.balances.balance["member-a"], Money::from(2400));
        assert_eq!(report.balances.balance["member-b"], Money::from(-1200));
        assert_eq!(report.balances.balance["member-c"], Money::from(-1200));
        assert_eq!(
            report.settlement,
            vec![
                Transfer::new("member-b", "member-a", Money::from(1200)),
                Transfer::new("member-c", "member-a", Money::from(1200)),
            ]
        );
        assert_eq!(report.pairwise, report.settlement);
    }

    #[test]
    fn test_settlement_and_pairwise_may_disagree() {
        let mut project = Workspace::sample("2024-05-01").projects.remove(0);
        // C owes B through an adjustment, forming the chain C -> B -> A.
        project.adjustments.push(Adjustment {
            id: "chain".to_string(),
            from_id: Some(MemberId::from("member-c")),
            to_id: Some(MemberId::from("member-b")),
            amount: Money::from(1200),
            ..Default::default()
        });
        let ledger = Ledger::new(&project);

        // C's debt to B cancels B's debt to A in the settlement plan.
        assert_eq!(
            ledger.settlement(),
            vec![Transfer::new("member-c", "member-a", Money::from(2400))]
        );
        assert_eq!(ledger.pairwise().len(), 3);
    }

    #[test]
    fn test_ledger_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Ledger<'static>>();
        assert_send_sync::<LedgerReport>();
    }

    #[test]
    fn test_allocate_matches_aggregated_owed() {
        let workspace = Workspace::sample("2024-05-01");
        let project = workspace.active_project().unwrap();
        let ledger = Ledger::new(project);

        let allocation = ledger.allocate(&project.expenses[0]);
        let balances = ledger.balances();
        for (id, owed) in &balances.owed {
            assert_eq!(allocation[id], *owed);
        }
    }
}
