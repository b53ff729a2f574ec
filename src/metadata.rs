//! The persisted metadata record.
//!
//! One `key:value` pair per line, written at the root of every
//! materialized project and archive. The record is rewritten in full on
//! each materialization.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Local;

use crate::constants::METADATA_FILE;
use crate::error::{Error, Result};

/// Where a project was materialized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Folder,
    Zip,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Folder => write!(f, "FOLDER"),
            OutputMode::Zip => write!(f, "ZIP"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FOLDER" => Ok(OutputMode::Folder),
            "ZIP" => Ok(OutputMode::Zip),
            other => Err(Error::MetadataError(format!("unknown mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub project: String,
    pub project_version: Option<String>,
    pub mode: OutputMode,
    pub files_count: usize,
    pub update_link: Option<String>,
    pub created_at: String,
}

impl ProjectMetadata {
    /// Creates a record stamped with the current local time.
    pub fn new(
        project: impl Into<String>,
        project_version: Option<String>,
        mode: OutputMode,
        files_count: usize,
        update_link: Option<String>,
    ) -> Self {
        Self {
            project: project.into(),
            project_version,
            mode,
            files_count,
            update_link,
            created_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("project", self.project.clone())];
        if let Some(version) = &self.project_version {
            fields.push(("project_version", version.clone()));
        }
        fields.push(("mode", self.mode.to_string()));
        fields.push(("files_count", self.files_count.to_string()));
        if let Some(link) = &self.update_link {
            fields.push(("update_link", link.clone()));
        }
        fields.push(("created_at", self.created_at.clone()));
        fields
    }

    /// Renders the record.
    ///
    /// # Errors
    /// * `Error::MetadataError` if a value contains a line break
    pub fn render(&self) -> Result<String> {
        let mut record = String::new();
        for (key, value) in self.fields() {
            if value.contains(['\n', '\r']) {
                return Err(Error::MetadataError(format!("value of '{key}' contains a line break")));
            }
            record.push_str(&format!("{key}:{value}\n"));
        }
        Ok(record)
    }

    /// Parses a record. Unknown keys are ignored.
    ///
    /// # Errors
    /// * `Error::MetadataError` if `project` or `mode` is missing or a
    ///   value is malformed
    pub fn parse(record: &str) -> Result<Self> {
        let mut project = None;
        let mut project_version = None;
        let mut mode = None;
        let mut files_count = 0;
        let mut update_link = None;
        let mut created_at = String::new();

        for line in record.lines().filter(|line| !line.trim().is_empty()) {
            let Some((key, value)) = line.split_once(':') else {
                return Err(Error::MetadataError(format!("malformed line '{line}'")));
            };
            let value = value.trim().to_string();
            match key.trim() {
                "project" => project = Some(value),
                "project_version" => project_version = Some(value),
                "mode" => mode = Some(value.parse::<OutputMode>()?),
                "files_count" => {
                    files_count = value.parse().map_err(|_| {
                        Error::MetadataError(format!("invalid files_count '{value}'"))
                    })?
                }
                "update_link" => update_link = Some(value),
                "created_at" => created_at = value,
                _ => {}
            }
        }

        Ok(Self {
            project: project.ok_or_else(|| Error::MetadataError("missing 'project'".into()))?,
            project_version,
            mode: mode.ok_or_else(|| Error::MetadataError("missing 'mode'".into()))?,
            files_count,
            update_link,
            created_at,
        })
    }

    /// Writes the record as `vibezip` inside `project_root`, replacing any
    /// previous record.
    pub fn write_to(&self, project_root: &Path) -> Result<()> {
        std::fs::write(project_root.join(METADATA_FILE), self.render()?)?;
        Ok(())
    }

    /// Reads the record from `project_root`.
    ///
    /// # Errors
    /// * `Error::MetadataAbsent` if there is no record
    pub fn read_from(project_root: &Path) -> Result<Self> {
        let path = project_root.join(METADATA_FILE);
        if !path.is_file() {
            return Err(Error::MetadataAbsent { location: project_root.display().to_string() });
        }
        Self::parse(&std::fs::read_to_string(path)?)
    }
}
