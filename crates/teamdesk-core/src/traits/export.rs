//! Export sink port - spreadsheet-style output

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::repositories::RepoResult;

/// One flat row: ordered `(column, cell)` pairs
pub type Row = Vec<(String, String)>;

/// A named sheet of flat rows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Column headers, taken from the first row
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.iter().map(|(column, _)| column.as_str()).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of `column` in row `index`
    pub fn cell(&self, index: usize, column: &str) -> Option<&str> {
        self.rows.get(index).and_then(|row| {
            row.iter()
                .find(|(name, _)| name == column)
                .map(|(_, value)| value.as_str())
        })
    }
}

#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Materialize a workbook of one or more sheets
    async fn write_workbook(&self, sheets: &[Sheet], file_name: &str) -> RepoResult<()>;

    /// Materialize a single sheet
    async fn write(&self, sheet: &Sheet, file_name: &str) -> RepoResult<()> {
        self.write_workbook(std::slice::from_ref(sheet), file_name).await
    }
}
