//! Export sinks - JSON files on disk and an in-memory recorder

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, instrument};

use teamdesk_core::error::DomainError;
use teamdesk_core::traits::{ExportSink, RepoResult, Sheet};

/// Convert an I/O failure into a domain export error
fn map_io_error(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::ExportError(format!("{}: {e}", path.display()))
}

#[derive(Serialize)]
struct SheetDocument<'a> {
    name: &'a str,
    columns: Vec<&'a str>,
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
}

impl<'a> From<&'a Sheet> for SheetDocument<'a> {
    fn from(sheet: &'a Sheet) -> Self {
        let rows = sheet
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|(column, cell)| (column.clone(), serde_json::Value::String(cell.clone())))
                    .collect()
            })
            .collect();
        Self {
            name: &sheet.name,
            columns: sheet.columns(),
            rows,
        }
    }
}

/// Writes each workbook as a pretty-printed JSON file
///
/// The requested file name keeps its stem; the extension becomes `.json`.
#[derive(Debug, Clone)]
pub struct JsonExportSink {
    dir: PathBuf,
}

impl JsonExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a workbook with `file_name` is written to
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(Path::new(file_name).with_extension("json"))
    }
}

#[async_trait]
impl ExportSink for JsonExportSink {
    #[instrument(skip(self, sheets), fields(sheets = sheets.len()))]
    async fn write_workbook(&self, sheets: &[Sheet], file_name: &str) -> RepoResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| map_io_error(&self.dir, e))?;

        let documents: Vec<SheetDocument<'_>> = sheets.iter().map(SheetDocument::from).collect();
        let body = serde_json::to_vec_pretty(&documents)
            .map_err(|e| DomainError::ExportError(e.to_string()))?;

        let path = self.path_for(file_name);
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| map_io_error(&path, e))?;

        info!(path = %path.display(), "Export written");
        Ok(())
    }
}

/// A workbook captured by [`MemoryExportSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedWorkbook {
    pub file_name: String,
    pub sheets: Vec<Sheet>,
}

/// Keeps every written workbook in memory
#[derive(Debug, Default)]
pub struct MemoryExportSink {
    written: Mutex<Vec<ExportedWorkbook>>,
}

impl MemoryExportSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> Vec<ExportedWorkbook> {
        self.written.lock().clone()
    }

    pub fn last(&self) -> Option<ExportedWorkbook> {
        self.written.lock().last().cloned()
    }
}

#[async_trait]
impl ExportSink for MemoryExportSink {
    async fn write_workbook(&self, sheets: &[Sheet], file_name: &str) -> RepoResult<()> {
        self.written.lock().push(ExportedWorkbook {
            file_name: file_name.to_string(),
            sheets: sheets.to_vec(),
        });
        Ok(())
    }
}
