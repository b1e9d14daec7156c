use crate::application::allocator::ShareAllocator;
use crate::application::settlement::Transfer;
use crate::domain::money::{EPSILON, Money};
use crate::domain::project::{MemberId, Project};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Directed debts between active members, in first-seen order.
struct DebtGraph<'a, 'p> {
    allocator: &'a ShareAllocator<'p>,
    edges: IndexMap<(MemberId, MemberId), Money>,
}

impl<'a, 'p> DebtGraph<'a, 'p> {
    fn new(allocator: &'a ShareAllocator<'p>) -> Self {
        Self {
            allocator,
            edges: IndexMap::new(),
        }
    }

    /// Records that `from` owes `to` the amount. Self-loops and edges touching
    /// a missing or inactive member are skipped.
    fn add(&mut self, from: Option<&MemberId>, to: Option<&MemberId>, amount: Money) {
        let (Some(from), Some(to)) = (from, to) else {
            return;
        };
        if from == to || amount.is_zero() {
            return;
        }
        if !self.allocator.is_active(from) || !self.allocator.is_active(to) {
            return;
        }
        let edge = self.edges.entry((from.clone(), to.clone())).or_default();
        *edge = edge.saturating_add(amount);
    }

    fn owed(&self, from: &MemberId, to: &MemberId) -> Money {
        self.edges
            .get(&(from.clone(), to.clone()))
            .copied()
            .unwrap_or_default()
    }
}

/// Nets the raw debt between every pair of active members.
///
/// Each included member owes the payer their allocated share, and each
/// adjustment's sender owes its receiver. Opposite directions cancel, and a
/// pair appears at most once, pointing from the net debtor. Sorted by amount,
/// largest first.
pub fn pairwise_net(project: &Project) -> Vec<Transfer> {
    pairwise_net_with(project, &ShareAllocator::new(project))
}

pub(crate) fn pairwise_net_with(
    project: &Project,
    allocator: &ShareAllocator<'_>,
) -> Vec<Transfer> {
    let mut graph = DebtGraph::new(allocator);

    for expense in &project.expenses {
        for (id, share) in allocator.allocate(expense) {
            graph.add(Some(&id), Some(&expense.payer_id), share);
        }
    }
    for adjustment in &project.adjustments {
        graph.add(
            adjustment.from_id.as_ref(),
            adjustment.to_id.as_ref(),
            adjustment.amount,
        );
    }

    let mut seen: HashSet<(&MemberId, &MemberId)> = HashSet::new();
    let mut reduced = Vec::new();
    for ((a, b), &forward) in &graph.edges {
        if !seen.insert((a, b)) {
            continue;
        }
        seen.insert((b, a));

        let net = forward.saturating_sub(graph.owed(b, a));
        if net > EPSILON {
            reduced.push(Transfer::new(a.clone(), b.clone(), net));
        } else if net < -EPSILON {
            reduced.push(Transfer::new(b.clone(), a.clone(), -net));
        }
    }

    reduced.sort_by(|x, y| y.amount.cmp(&x.amount));
    reduced
}
