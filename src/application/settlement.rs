use crate::domain::money::{EPSILON, Money};
use crate::domain::project::MemberId;
use indexmap::IndexMap;

/// A payment of `amount` from one member to another.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

impl Transfer {
    pub fn new(from: impl Into<MemberId>, to: impl Into<MemberId>, amount: Money) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

struct Party<'a> {
    id: &'a MemberId,
    remaining: Money,
}

/// Proposes transfers that bring every balance within [`EPSILON`] of zero.
///
/// Debtors and creditors are matched greedily in the order the balances are
/// given, not by magnitude. The result has at most
/// `debtors + creditors - 1` transfers, which is not always the minimum.
pub fn settle(balances: &IndexMap<MemberId, Money>) -> Vec<Transfer> {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();
    for (id, &balance) in balances {
        if balance > EPSILON {
            creditors.push(Party {
                id,
                remaining: balance,
            });
        } else if balance < -EPSILON {
            debtors.push(Party {
                id,
                remaining: -balance,
            });
        }
    }

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let (debtor, creditor) = (&mut debtors[i], &mut creditors[j]);
        let amount = debtor.remaining.min(creditor.remaining);
        if amount > EPSILON {
            transfers.push(Transfer {
                from: debtor.id.clone(),
                to: creditor.id.clone(),
                amount,
            });
        }
        debtor.remaining -= amount;
        creditor.remaining -= amount;
        if debtor.remaining <= EPSILON {
            i += 1;
        }
        if creditor.remaining <= EPSILON {
            j += 1;
        }
    }

    tracing::debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        transfers = transfers.len(),
        "settlement computed"
    );
    transfers
}
