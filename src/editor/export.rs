use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};

use super::error::ShellError;

/// A serialized document ready to be saved as `report_<YYYY-MM-DD>.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub content: String,
}

impl ExportedReport {
    pub fn new(content: String, date: NaiveDate) -> Self {
        Self {
            file_name: file_name_for(date),
            content,
        }
    }

    /// Names the file after today's UTC date.
    pub fn today(content: String) -> Self {
        Self::new(content, Utc::now().date_naive())
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ShellError> {
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)?;
        Ok(path)
    }
}

pub fn file_name_for(date: NaiveDate) -> String {
    format!("report_{}.html", date.format("%Y-%m-%d"))
}
