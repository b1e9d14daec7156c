use crate::domain::money::{Money, RoundingRule};
use crate::domain::project::{Expense, MemberId, Project, ShareMode};
use indexmap::{IndexMap, IndexSet};

/// Owed amount per member for a single expense.
///
/// Active members come first, in declaration order. Inactive or unknown ids
/// that still take part in the expense (as payer or included share) follow,
/// so the values always add up to the expense amount.
pub type Allocation = IndexMap<MemberId, Money>;

/// Splits expenses across members under a project's rounding rule.
pub struct ShareAllocator<'a> {
    active: IndexSet<&'a MemberId>,
    rounding: &'a RoundingRule,
}

impl<'a> ShareAllocator<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            active: project.active_ids(),
            rounding: &project.rounding_rule,
        }
    }

    pub fn is_active(&self, id: &MemberId) -> bool {
        self.active.contains(id)
    }

    pub fn active_ids(&self) -> impl Iterator<Item = &'a MemberId> + '_ {
        self.active.iter().copied()
    }

    /// Computes what each member owes for `expense`.
    ///
    /// Each share is rounded on its own; whatever the rounding gains or loses
    /// against the expense amount is charged to the payer.
    pub fn allocate(&self, expense: &Expense) -> Allocation {
        let mut owed: Allocation = self
            .active
            .iter()
            .map(|id| ((*id).clone(), Money::ZERO))
            .collect();

        let included: Vec<(&MemberId, Money)> = expense
            .shares
            .iter()
            .filter(|s| s.is_included())
            .map(|s| (&s.member_id, s.value))
            .collect();
        let base = if included.is_empty() {
            self.active.iter().map(|id| (*id, Money::ONE)).collect()
        } else {
            included
        };

        let amount = expense.amount;
        let portions: Vec<(&MemberId, Money)> = match &expense.share_mode {
            ShareMode::Equal => {
                if base.is_empty() {
                    Vec::new()
                } else {
                    let each = amount / Money::from(base.len() as i64);
                    base.iter().map(|(id, _)| (*id, each)).collect()
                }
            }
            ShareMode::Weight => proportional(amount, &base, Money::ONE),
            ShareMode::Percent => proportional(amount, &base, Money::ONE_HUNDRED),
            ShareMode::Fixed => base,
            ShareMode::Other(mode) => {
                tracing::debug!(expense = %expense.id, mode = %mode, "unknown share mode, nothing allocated");
                return owed;
            }
        };

        let mut allocated = Money::ZERO;
        for (id, portion) in portions {
            let rounded = self.rounding.apply(portion);
            let entry = owed.entry(id.clone()).or_default();
            *entry = entry.saturating_add(rounded);
            allocated = allocated.saturating_add(rounded);
        }

        let remainder = amount.saturating_sub(allocated);
        let payer = owed.entry(expense.payer_id.clone()).or_default();
        *payer = payer.saturating_add(remainder);
        owed
    }
}

/// `amount × value / Σvalues`, with `fallback_total` standing in for a zero sum.
///
/// When `amount × value` does not fit, the ratio is taken first. A share that
/// cannot be represented either way is zero, leaving it to the payer.
fn proportional<'m>(
    amount: Money,
    base: &[(&'m MemberId, Money)],
    fallback_total: Money,
) -> Vec<(&'m MemberId, Money)> {
    let total: Money = base.iter().map(|(_, value)| *value).sum();
    let total = if total.is_zero() { fallback_total } else { total };
    base.iter()
        .map(|(id, value)| {
            let share = amount
                .checked_mul(*value)
                .and_then(|product| product.checked_div(total))
                .or_else(|| {
                    value
                        .checked_div(total)
                        .and_then(|ratio| amount.checked_mul(ratio))
                })
                .unwrap_or_else(|| {
                    tracing::warn!(
                        member = %id,
                        %amount,
                        %value,
                        %total,
                        "share out of range, charged to the payer"
                    );
                    Money::ZERO
                });
            (*id, share)
        })
        .collect()
}
