use crate::domain::project::{Project, Workspace};
use crate::error::LedgerError;
use std::io::Read;

/// Reads a saved workspace, or a single exported project, from JSON.
pub struct WorkspaceReader<R: Read> {
    source: R,
}

impl<R: Read> WorkspaceReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// A document with a `projects` array is a workspace; any other object is
    /// taken as one project and wrapped.
    pub fn read(self) -> Result<Workspace, LedgerError> {
        let value: serde_json::Value = serde_json::from_reader(self.source)?;
        if value.get("projects").is_some() {
            return Ok(serde_json::from_value(value)?);
        }
        let project: Project = serde_json::from_value(value)?;
        Ok(Workspace::single(project))
    }
}
