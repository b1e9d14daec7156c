use crate::domain::project::Workspace;
use crate::error::LedgerError;
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// `warikan_export_<YYYY-MM-DD>.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("warikan_export_{}.json", date.format("%Y-%m-%d"))
}

/// Writes the workspace as pretty-printed JSON.
pub fn write_workspace<W: Write>(writer: W, workspace: &Workspace) -> Result<(), LedgerError> {
    serde_json::to_writer_pretty(writer, workspace)?;
    Ok(())
}

/// Exports the workspace into `dir` under a file name carrying `date`, and
/// returns the path written.
pub fn export_workspace(
    dir: &Path,
    workspace: &Workspace,
    date: NaiveDate,
) -> Result<PathBuf, LedgerError> {
    let path = dir.join(export_file_name(date));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_workspace(&mut writer, workspace)?;
    writer.flush()?;
    tracing::info!(path = %path.display(), projects = workspace.projects.len(), "workspace exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::json::workspace_reader::WorkspaceReader;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(date()), "warikan_export_2024-05-01.json");
    }

    #[test]
    fn test_write_workspace_is_pretty() {
        let mut out = Vec::new();
        write_workspace(&mut out, &Workspace::sample("2024-05-01")).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\n  \"activeProjectId\": \"sample\""));
        assert!(text.contains("\"amount\": 3600"));
    }

    #[test]
    fn test_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::sample("2024-05-01");

        let path = export_workspace(dir.path(), &workspace, date()).unwrap();
        assert_eq!(path, dir.path().join("warikan_export_2024-05-01.json"));

        let file = File::open(&path).unwrap();
        let restored = WorkspaceReader::new(file).read().unwrap();
        assert_eq!(restored, workspace);
    }

    #[test]
    fn test_export_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::sample("2024-05-01");
        let result = export_workspace(&dir.path().join("missing"), &workspace, date());
        assert!(matches!(result, Err(LedgerError::Io(_))));
    }
}
