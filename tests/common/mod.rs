use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warikan::domain::money::{Money, RoundingRule};
use warikan::domain::project::{Adjustment, Expense, Member, MemberId, Project, Share, ShareMode};

pub const WHOLE_UNIT_RULES: [RoundingRule; 6] = [
    RoundingRule::Round10,
    RoundingRule::Round100,
    RoundingRule::Floor10,
    RoundingRule::Floor100,
    RoundingRule::Ceil10,
    RoundingRule::Ceil100,
];

/// Builds a reproducible project in which every reference names an active
/// member and every amount is in whole currency units.
pub fn generate_project(seed: u64) -> Project {
    let mut rng = StdRng::seed_from_u64(seed);

    let member_count = rng.gen_range(1..=6);
    let members: Vec<Member> = (0..member_count)
        .map(|i| Member::new(format!("m{i}"), format!("Member {i}")))
        .collect();
    let pick = |rng: &mut StdRng| MemberId::new(format!("m{}", rng.gen_range(0..member_count)));

    let rounding_rule = if rng.gen_bool(0.25) {
        RoundingRule::None
    } else {
        WHOLE_UNIT_RULES[rng.gen_range(0..WHOLE_UNIT_RULES.len())].clone()
    };

    let expenses = (0..rng.gen_range(0..12))
        .map(|i| {
            let share_mode = match rng.gen_range(0..4) {
                0 => ShareMode::Equal,
                1 => ShareMode::Weight,
                2 => ShareMode::Percent,
                _ => ShareMode::Fixed,
            };
            let shares = members
                .iter()
                .map(|m| {
                    if !rng.gen_bool(0.7) {
                        return Share::excluded(m.id.as_str());
                    }
                    let value: i64 = match share_mode {
                        ShareMode::Weight => rng.gen_range(0..5),
                        ShareMode::Percent => rng.gen_range(0..=100),
                        ShareMode::Fixed => rng.gen_range(0..20_000),
                        _ => 1,
                    };
                    Share::included(m.id.as_str(), Money::from(value))
                })
                .collect();
            Expense {
                id: format!("e{i}"),
                title: format!("Expense {i}"),
                amount: Money::from(rng.gen_range(0..50_000i64)),
                payer_id: pick(&mut rng),
                share_mode,
                shares,
                ..Default::default()
            }
        })
        .collect();

    let adjustments = (0..rng.gen_range(0..4))
        .map(|i| Adjustment {
            id: format!("a{i}"),
            from_id: Some(pick(&mut rng)),
            to_id: Some(pick(&mut rng)),
            amount: Money::from(rng.gen_range(1..5_000i64)),
            ..Default::default()
        })
        .collect();

    Project {
        id: format!("generated-{seed}"),
        name: format!("Generated {seed}"),
        rounding_rule,
        members,
        expenses,
        adjustments,
        ..Default::default()
    }
}
