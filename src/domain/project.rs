use crate::domain::money::{Money, RoundingRule};
use crate::error::{LedgerError, Result, ValidationIssue};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

/// Identifier of a project member, as stored in the persisted data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// How an expense's cost is distributed among its included members.
///
/// Unknown modes are preserved in `Other` and allocate nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShareMode {
    #[default]
    Equal,
    Weight,
    Percent,
    Fixed,
    Other(String),
}

/// A stored expense without a mode splits nothing; `ShareMode::default()` is
/// only for expenses built in code.
fn missing_share_mode() -> ShareMode {
    ShareMode::Other(String::new())
}

impl From<String> for ShareMode {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "EQUAL" => ShareMode::Equal,
            "WEIGHT" => ShareMode::Weight,
            "PERCENT" => ShareMode::Percent,
            "FIXED" => ShareMode::Fixed,
            _ => ShareMode::Other(raw),
        }
    }
}

impl From<ShareMode> for String {
    fn from(mode: ShareMode) -> Self {
        match mode {
            ShareMode::Equal => "EQUAL".to_string(),
            ShareMode::Weight => "WEIGHT".to_string(),
            ShareMode::Percent => "PERCENT".to_string(),
            ShareMode::Fixed => "FIXED".to_string(),
            ShareMode::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShareType {
    #[default]
    Included,
    Excluded,
    Other(String),
}

impl From<String> for ShareType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "INCLUDED" => ShareType::Included,
            "EXCLUDED" => ShareType::Excluded,
            _ => ShareType::Other(raw),
        }
    }
}

impl From<ShareType> for String {
    fn from(share_type: ShareType) -> Self {
        match share_type {
            ShareType::Included => "INCLUDED".to_string(),
            ShareType::Excluded => "EXCLUDED".to_string(),
            ShareType::Other(raw) => raw,
        }
    }
}

/// One member's participation in an expense.
///
/// `value` is a weight, a percentage or a fixed amount depending on the
/// expense's share mode, and is ignored in `EQUAL` mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub member_id: MemberId,
    #[serde(default)]
    pub r#type: ShareType,
    #[serde(default)]
    pub value: Money,
}

impl Share {
    pub fn included(member_id: impl Into<String>, value: Money) -> Self {
        Self {
            member_id: MemberId::new(member_id),
            r#type: ShareType::Included,
            value,
        }
    }

    pub fn excluded(member_id: impl Into<String>) -> Self {
        Self {
            member_id: MemberId::new(member_id),
            r#type: ShareType::Excluded,
            value: Money::ZERO,
        }
    }

    pub fn is_included(&self) -> bool {
        self.r#type == ShareType::Included
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub id: String,
    pub title: String,
    pub amount: Money,
    pub payer_id: MemberId,
    pub category_id: String,
    pub date: String,
    pub note: String,
    #[serde(default = "missing_share_mode")]
    pub share_mode: ShareMode,
    pub shares: Vec<Share>,
}

/// A manual balance transfer: `from_id` owes `to_id` the amount.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Adjustment {
    pub id: String,
    pub date: String,
    pub from_id: Option<MemberId>,
    pub to_id: Option<MemberId>,
    pub amount: Money,
    pub reason: String,
}

/// A non-monetary record, such as thanking someone for driving.
///
/// Kept with the project but never part of any balance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Incentive {
    pub id: String,
    pub date: String,
    pub r#type: String,
    pub from_id: Option<MemberId>,
    pub to_id: Option<MemberId>,
    pub title: String,
    pub note: String,
}

/// An immutable snapshot of everything the ledger needs for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub currency_symbol: String,
    pub rounding_rule: RoundingRule,
    pub members: Vec<Member>,
    pub categories: Vec<Category>,
    pub expenses: Vec<Expense>,
    pub incentives: Vec<Incentive>,
    pub adjustments: Vec<Adjustment>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            currency_symbol: "¥".to_string(),
            rounding_rule: RoundingRule::None,
            members: Vec::new(),
            categories: Vec::new(),
            expenses: Vec::new(),
            incentives: Vec::new(),
            adjustments: Vec::new(),
        }
    }
}

/// Criteria for listing expenses; empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub category_id: Option<String>,
    pub member_id: Option<MemberId>,
    pub text: Option<String>,
}

impl Project {
    pub fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_active)
    }

    /// Active member ids in declaration order.
    pub fn active_ids(&self) -> IndexSet<&MemberId> {
        self.active_members().map(|m| &m.id).collect()
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id.as_str() == id)
    }

    pub fn member_name(&self, id: &str) -> &str {
        self.member(id).map_or("(unknown)", |m| m.name.as_str())
    }

    pub fn category_name(&self, id: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map_or("(uncategorized)", |c| c.name.as_str())
    }

    /// Categories referenced by an expense must not be deleted.
    pub fn category_in_use(&self, category_id: &str) -> bool {
        self.expenses.iter().any(|e| e.category_id == category_id)
    }

    /// Number of participants in an expense: its included shares, or every
    /// active member when none are listed.
    pub fn included_count(&self, expense: &Expense) -> usize {
        match expense.shares.iter().filter(|s| s.is_included()).count() {
            0 => self.active_members().count(),
            n => n,
        }
    }

    /// Expenses matching `filter`, newest first.
    pub fn filter_expenses(&self, filter: &ExpenseFilter) -> Vec<&Expense> {
        let needle = filter
            .text
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());

        let mut matches: Vec<&Expense> = self
            .expenses
            .iter()
            .filter(|e| {
                filter
                    .category_id
                    .as_deref()
                    .is_none_or(|c| c.is_empty() || e.category_id == c)
            })
            .filter(|e| {
                filter.member_id.as_ref().is_none_or(|m| {
                    e.payer_id == *m
                        || e.shares.iter().any(|s| s.member_id == *m && s.is_included())
                })
            })
            .filter(|e| {
                needle.as_ref().is_none_or(|needle| {
                    format!("{} {}", e.title, e.note)
                        .to_lowercase()
                        .contains(needle.as_str())
                })
            })
            .collect();

        matches.sort_by(|a, b| b.date.cmp(&a.date));
        matches
    }

    /// Lists every structural problem in this snapshot.
    ///
    /// Inactive members are valid references; only ids absent from the member
    /// list are reported.
    pub fn validation_issues(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut known: HashSet<&str> = HashSet::new();
        for member in &self.members {
            if !known.insert(member.id.as_str()) {
                issues.push(ValidationIssue::DuplicateMemberId(member.id.clone()));
            }
        }
        let categories: HashSet<&str> = self.categories.iter().map(|c| c.id.as_str()).collect();

        for expense in &self.expenses {
            if !known.contains(expense.payer_id.as_str()) {
                issues.push(ValidationIssue::UnknownPayer {
                    expense: expense.id.clone(),
                    payer: expense.payer_id.clone(),
                });
            }
            for share in &expense.shares {
                if !known.contains(share.member_id.as_str()) {
                    issues.push(ValidationIssue::UnknownShareMember {
                        expense: expense.id.clone(),
                        member: share.member_id.clone(),
                    });
                }
            }
            if !expense.category_id.is_empty() && !categories.contains(expense.category_id.as_str())
            {
                issues.push(ValidationIssue::UnknownCategory {
                    expense: expense.id.clone(),
                    category: expense.category_id.clone(),
                });
            }
            if expense.amount < Money::ZERO {
                issues.push(ValidationIssue::NegativeAmount {
                    record: format!("expense {}", expense.id),
                });
            }
        }

        for adjustment in &self.adjustments {
            for member in [&adjustment.from_id, &adjustment.to_id].into_iter().flatten() {
                if !known.contains(member.as_str()) {
                    issues.push(ValidationIssue::UnknownAdjustmentMember {
                        adjustment: adjustment.id.clone(),
                        member: member.clone(),
                    });
                }
            }
            if adjustment.amount < Money::ZERO {
                issues.push(ValidationIssue::NegativeAmount {
                    record: format!("adjustment {}", adjustment.id),
                });
            }
        }

        issues
    }

    pub fn validate(&self) -> Result<()> {
        let issues = self.validation_issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::Validation(issues))
        }
    }
}

/// The complete persisted state: every project plus the one currently open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub active_project_id: Option<String>,
    pub projects: Vec<Project>,
}

fn default_version() -> u32 {
    1
}

impl Workspace {
    /// Wraps a lone project snapshot.
    pub fn single(project: Project) -> Self {
        Self {
            version: default_version(),
            active_project_id: Some(project.id.clone()),
            projects: vec![project],
        }
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// The selected project, falling back to the first one.
    pub fn active_project(&self) -> Option<&Project> {
        self.active_project_id
            .as_deref()
            .and_then(|id| self.project(id))
            .or_else(|| self.projects.first())
    }

    /// Parses persisted state, starting over from the sample when nothing
    /// usable is stored.
    pub fn load_or_sample(raw: Option<&str>) -> Self {
        raw.and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_else(|| Self::sample(&chrono::Local::now().date_naive().to_string()))
    }

    /// A three-member trip with one lunch split equally, dated `date`.
    pub fn sample(date: &str) -> Self {
        let (a, b, c) = ("member-a", "member-b", "member-c");
        let project = Project {
            id: "sample".to_string(),
            name: "Sample trip".to_string(),
            currency_symbol: "¥".to_string(),
            rounding_rule: RoundingRule::None,
            members: vec![Member::new(a, "A"), Member::new(b, "B"), Member::new(c, "C")],
            categories: vec![
                Category {
                    id: "food".to_string(),
                    name: "Food".to_string(),
                },
                Category {
                    id: "misc".to_string(),
                    name: "Other".to_string(),
                },
            ],
            expenses: vec![Expense {
                id: "lunch".to_string(),
                title: "Lunch".to_string(),
                amount: Money::from(3600),
                payer_id: MemberId::from(a),
                category_id: "food".to_string(),
                date: date.to_string(),
                note: String::new(),
                share_mode: ShareMode::Equal,
                shares: [a, b, c]
                    .into_iter()
                    .map(|id| Share::included(id, Money::ONE))
                    .collect(),
            }],
            incentives: vec![Incentive {
                id: "drive".to_string(),
                date: date.to_string(),
                r#type: "DRIVE".to_string(),
                from_id: None,
                to_id: Some(MemberId::from(a)),
                title: "Thanks for driving".to_string(),
                note: String::new(),
            }],
            adjustments: Vec::new(),
        };
        Self::single(project)
    }
}
