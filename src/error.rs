use crate::domain::project::MemberId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    #[error("Invalid project data ({} issue(s)): {}", .0.len(), join_issues(.0))]
    Validation(Vec<ValidationIssue>),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for LedgerError {
    fn from(err: rocksdb::Error) -> Self {
        LedgerError::InternalError(Box::new(err))
    }
}

/// A structural problem in a project snapshot.
///
/// The engine itself tolerates all of these; they are surfaced so that callers
/// can reject broken data before computing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("expense {expense} is paid by unknown member {payer}")]
    UnknownPayer { expense: String, payer: MemberId },
    #[error("expense {expense} shares with unknown member {member}")]
    UnknownShareMember { expense: String, member: MemberId },
    #[error("adjustment {adjustment} references unknown member {member}")]
    UnknownAdjustmentMember {
        adjustment: String,
        member: MemberId,
    },
    #[error("expense {expense} uses unknown category {category}")]
    UnknownCategory { expense: String, category: String },
    #[error("{record} has a negative amount")]
    NegativeAmount { record: String },
    #[error("member id {0} is declared more than once")]
    DuplicateMemberId(MemberId),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, LedgerError>;
