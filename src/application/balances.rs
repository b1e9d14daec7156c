use crate::application::allocator::ShareAllocator;
use crate::domain::money::Money;
use crate::domain::project::{MemberId, Project};
use indexmap::IndexMap;

/// Per-member totals across a whole project, keyed by active member id in
/// declaration order.
///
/// `balance` is positive for members who are owed money and negative for
/// members who owe. It equals `paid - owed + adjustments`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Balances {
    pub paid: IndexMap<MemberId, Money>,
    pub owed: IndexMap<MemberId, Money>,
    pub adjustments: IndexMap<MemberId, Money>,
    pub balance: IndexMap<MemberId, Money>,
}

impl Balances {
    fn for_members<'m>(ids: impl Iterator<Item = &'m MemberId>) -> Self {
        let zeroed: IndexMap<MemberId, Money> = ids.map(|id| (id.clone(), Money::ZERO)).collect();
        Self {
            paid: zeroed.clone(),
            owed: zeroed.clone(),
            adjustments: zeroed.clone(),
            balance: zeroed,
        }
    }

    /// Sum of all balances; zero for any project whose references are all
    /// active members.
    pub fn total(&self) -> Money {
        self.balance.values().sum()
    }
}

/// Runs the allocator over every expense and folds in manual adjustments.
pub fn aggregate(project: &Project) -> Balances {
    aggregate_with(project, &ShareAllocator::new(project))
}

pub(crate) fn aggregate_with(project: &Project, allocator: &ShareAllocator<'_>) -> Balances {
    let mut sheet = Balances::for_members(allocator.active_ids());

    for expense in &project.expenses {
        if let Some(paid) = sheet.paid.get_mut(&expense.payer_id) {
            *paid = paid.saturating_add(expense.amount);
        }
        for (id, share) in allocator.allocate(expense) {
            if let Some(owed) = sheet.owed.get_mut(&id) {
                *owed = owed.saturating_add(share);
            }
        }
    }

    for adjustment in &project.adjustments {
        let amount = adjustment.amount;
        if amount.is_zero() {
            continue;
        }
        let sides = [(&adjustment.from_id, -amount), (&adjustment.to_id, amount)];
        for (side, delta) in sides {
            match side.as_ref().and_then(|id| sheet.adjustments.get_mut(id)) {
                Some(total) => *total = total.saturating_add(delta),
                None => tracing::debug!(
                    adjustment = %adjustment.id,
                    member = ?side,
                    "adjustment side does not name an active member, dropped"
                ),
            }
        }
    }

    for (id, balance) in sheet.balance.iter_mut() {
        *balance = sheet.paid[id]
            .saturating_sub(sheet.owed[id])
            .saturating_add(sheet.adjustments[id]);
    }

    tracing::debug!(
        project = %project.id,
        members = sheet.balance.len(),
        expenses = project.expenses.len(),
        adjustments = project.adjustments.len(),
        "aggregated balances"
    );
    sheet
}
