//! Version-aware re-application of a previously materialized project.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

use crate::backup::snapshot;
use crate::constants::METADATA_FILE;
use crate::error::{Error, Result};
use crate::loader::{load_document, DocumentSource, Fetcher};
use crate::materializer::{MaterializeReport, Materializer};
use crate::metadata::ProjectMetadata;
use crate::parser::parse_document;
use crate::version::compare_versions;

/// A materialized project on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectLocation {
    /// Project folder holding the metadata record
    Folder(PathBuf),
    /// `<project>.zip` holding the metadata record as a member
    Archive(PathBuf),
}

impl ProjectLocation {
    /// Determines what kind of project lives at `path`.
    ///
    /// # Errors
    /// * `Error::MetadataAbsent` if `path` is neither a directory nor a zip file
    pub fn detect(path: &Path) -> Result<Self> {
        let absent = || Error::MetadataAbsent { location: path.display().to_string() };
        if !path.exists() {
            return Err(absent());
        }

        let path = fs::canonicalize(path)?;
        if path.is_dir() {
            Ok(Self::Folder(path))
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")) {
            Ok(Self::Archive(path))
        } else {
            Err(absent())
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ProjectLocation::Folder(path) | ProjectLocation::Archive(path) => path,
        }
    }

    /// Directory the project was materialized into.
    pub fn output_dir(&self) -> PathBuf {
        let path = self.path();
        path.parent().map(Path::to_path_buf).unwrap_or_else(|| path.to_path_buf())
    }

    /// Reads the persisted metadata record.
    ///
    /// # Errors
    /// * `Error::MetadataAbsent` if the project holds no record
    pub fn read_metadata(&self) -> Result<ProjectMetadata> {
        match self {
            ProjectLocation::Folder(root) => ProjectMetadata::read_from(root),
            ProjectLocation::Archive(archive_path) => {
                let mut archive = ZipArchive::new(File::open(archive_path)?)?;
                let mut member = match archive.by_name(METADATA_FILE) {
                    Ok(member) => member,
                    Err(ZipError::FileNotFound) => {
                        return Err(Error::MetadataAbsent {
                            location: archive_path.display().to_string(),
                        })
                    }
                    Err(e) => return Err(e.into()),
                };
                let mut record = String::new();
                member.read_to_string(&mut record)?;
                ProjectMetadata::parse(&record)
            }
        }
    }
}

/// Result of an update check.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// The remote document is not newer than the local project
    UpToDate { local: String, remote: String },
    /// The project was re-materialized from the remote document
    Updated {
        from: String,
        to: String,
        snapshot: Option<PathBuf>,
        report: MaterializeReport,
    },
}

/// Checks a materialized project against the document it was created from.
pub struct UpdateChecker<'a> {
    fetcher: &'a dyn Fetcher,
    materializer: &'a Materializer<'a>,
    snapshot: bool,
}

impl<'a> UpdateChecker<'a> {
    /// Creates a new UpdateChecker instance.
    ///
    /// # Arguments
    /// * `fetcher` - Retrieves the remote document
    /// * `materializer` - Re-materializes the project when it is stale
    /// * `snapshot` - Copy the whole project aside before updating it
    pub fn new(fetcher: &'a dyn Fetcher, materializer: &'a Materializer<'a>, snapshot: bool) -> Self {
        Self { fetcher, materializer, snapshot }
    }

    /// Refetches the project's document and re-materializes the project if
    /// the remote version is strictly newer.
    ///
    /// # Errors
    /// * `Error::MetadataAbsent` if `location` holds no metadata record
    /// * `Error::MissingUpdateReference` if the record has no `update_link`
    /// * `Error::VersionIncomparable` if either side has no version
    /// * Any retrieval, parse or materialization error
    pub fn check(&self, location: &Path) -> Result<UpdateOutcome> {
        let location = ProjectLocation::detect(location)?;
        let local = location.read_metadata()?;
        let link = local
            .update_link
            .clone()
            .ok_or_else(|| Error::MissingUpdateReference { project: local.project.clone() })?;

        debug!("Checking '{}' for updates from '{}'", local.project, link);
        let raw = load_document(self.fetcher, &DocumentSource::from_string(&link))?;
        let remote = parse_document(&raw)?;

        let local_version = local.project_version.as_deref();
        let remote_version = remote.project_version.as_deref();
        let ordering = compare_versions(local_version, remote_version).ok_or_else(|| {
            Error::VersionIncomparable {
                local: local_version.unwrap_or("none").to_string(),
                remote: remote_version.unwrap_or("none").to_string(),
            }
        })?;

        let (from, to) = (local_version.unwrap_or_default(), remote_version.unwrap_or_default());
        if ordering != Ordering::Less {
            return Ok(UpdateOutcome::UpToDate { local: from.to_string(), remote: to.to_string() });
        }

        let snapshot = if self.snapshot { Some(snapshot(location.path())?) } else { None };

        if remote.project_name != local.project {
            warn!(
                "Remote document renames project '{}' to '{}'; it is written next to the old one",
                local.project, remote.project_name
            );
        }

        // The snapshot already covers every file, so no per-file copies.
        let materializer = if self.snapshot {
            self.materializer.without_backup()
        } else {
            *self.materializer
        };
        let report = materializer.materialize(&remote, local.mode, &location.output_dir())?;
        Ok(UpdateOutcome::Updated {
            from: from.to_string(),
            to: to.to_string(),
            snapshot,
            report,
        })
    }
}
