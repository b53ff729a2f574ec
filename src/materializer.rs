//! Materialization of parsed documents as a folder or a zip archive.
//!
//! Both modes share entry resolution: the entry path is validated against
//! the project root and the entry body is turned into bytes (inline text,
//! download or base64). They differ in where the bytes go and in whether
//! commands are executed.
//!
//! A failure partway through leaves whatever was already written in place;
//! there is no rollback.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::backup::backup_file;
use crate::commands::{execute_plan, plan_commands, CommandMode, CommandRunner, InstallScript};
use crate::constants::METADATA_FILE;
use crate::document::{DownloadKind, FileEntry, ParsedDocument, Platform};
use crate::error::{Error, Result};
use crate::loader::Fetcher;
use crate::metadata::{OutputMode, ProjectMetadata};
use crate::prompt::Prompter;

/// Switches controlling a materialization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Run every command without asking
    pub auto_confirm: bool,
    /// Copy existing files aside before overwriting them (folder mode only)
    pub backup: bool,
}

/// A file entry that could not be materialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedEntry {
    pub path: String,
    pub reason: String,
}

/// Summary of a materialization run.
#[derive(Debug, Clone)]
pub struct MaterializeReport {
    /// Project folder or archive file
    pub destination: PathBuf,
    /// Entry paths written, relative to the project root, without duplicates
    pub written: Vec<String>,
    pub failed: Vec<FailedEntry>,
    /// Command lines that were executed
    pub executed: Vec<String>,
    /// File name of the generated install script, if any
    pub script: Option<String>,
    pub metadata: ProjectMetadata,
}

/// Checks that a project name can be used as a directory or archive name.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name.trim() != name
        || name == "."
        || name == ".."
        || name.chars().any(|c| c.is_control() || r#"/\:*?"<>|"#.contains(c));
    if invalid {
        return Err(Error::InvalidProjectName { name: name.to_string() });
    }
    Ok(())
}

/// Validates a file entry path and returns it normalized to `/` separators
/// with `.` and empty segments dropped.
///
/// # Errors
/// * `Error::UnsafePath` if the path is empty, absolute, uses a drive
///   prefix or backslashes, or climbs out of the project root
/// * `Error::ReservedPath` if the path names the metadata record or an
///   install script
pub fn resolve_entry_path(path: &str) -> Result<String> {
    let unsafe_path = |reason| Error::UnsafePath { path: path.to_string(), reason };

    if path.starts_with('/') {
        return Err(unsafe_path("absolute path"));
    }
    if path.contains('\\') {
        return Err(unsafe_path("backslash separator"));
    }

    let mut segments = Vec::new();
    for (index, segment) in path.split('/').enumerate() {
        match segment {
            "" | "." => continue,
            ".." => return Err(unsafe_path("escapes the project root")),
            s if index == 0 && is_drive_prefix(s) => {
                return Err(unsafe_path("drive prefix"));
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return Err(unsafe_path("empty path"));
    }

    let normalized = segments.join("/");
    let reserved = normalized.eq_ignore_ascii_case(METADATA_FILE)
        || Platform::ALL.iter().any(|p| normalized.eq_ignore_ascii_case(p.script_name()));
    if reserved {
        return Err(Error::ReservedPath { path: normalized });
    }
    Ok(normalized)
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Fails if the deepest existing ancestor of `dir` resolves outside `root`,
/// e.g. through a symbolic link left in an existing project folder.
fn ensure_inside(root: &Path, dir: &Path, relative: &str) -> Result<()> {
    let root = fs::canonicalize(root)?;
    let existing = dir.ancestors().find(|p| p.exists()).unwrap_or(dir);
    if !fs::canonicalize(existing)?.starts_with(&root) {
        return Err(Error::UnsafePath {
            path: relative.to_string(),
            reason: "resolves outside the project root",
        });
    }
    Ok(())
}

/// Marks a generated script as executable.
fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Turns parsed documents into folders or archives.
#[derive(Clone, Copy)]
pub struct Materializer<'a> {
    fetcher: &'a dyn Fetcher,
    prompt: &'a dyn Prompter,
    runner: &'a dyn CommandRunner,
    platform: Platform,
    options: MaterializeOptions,
}

impl<'a> Materializer<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        prompt: &'a dyn Prompter,
        runner: &'a dyn CommandRunner,
        options: MaterializeOptions,
    ) -> Self {
        Self { fetcher, prompt, runner, platform: Platform::current(), options }
    }

    /// Overrides the platform whose command block is used.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn options(&self) -> MaterializeOptions {
        self.options
    }

    /// The same materializer with per-file backups turned off.
    pub fn without_backup(&self) -> Self {
        Self { options: MaterializeOptions { backup: false, ..self.options }, ..*self }
    }

    /// Materializes `doc` below `output_dir`.
    ///
    /// # Arguments
    /// * `doc` - Parsed document
    /// * `mode` - Folder (`<output_dir>/<project>/`) or archive (`<output_dir>/<project>.zip`)
    /// * `output_dir` - Parent directory of the result
    ///
    /// # Errors
    /// * `Error::InvalidProjectName` if the project name is not a plain file name
    /// * `Error::IoError` / `Error::ArchiveError` if the destination cannot be written
    pub fn materialize(
        &self,
        doc: &ParsedDocument,
        mode: OutputMode,
        output_dir: &Path,
    ) -> Result<MaterializeReport> {
        validate_project_name(&doc.project_name)?;
        match mode {
            OutputMode::Folder => self.materialize_folder(doc, output_dir),
            OutputMode::Zip => self.materialize_zip(doc, output_dir),
        }
    }

    /// Produces the bytes of an entry.
    fn realize(&self, entry: &FileEntry) -> Result<Vec<u8>> {
        match entry {
            FileEntry::Text { content, .. } => Ok(content.as_bytes().to_vec()),
            FileEntry::Empty { .. } => Ok(Vec::new()),
            FileEntry::Base64 { path, blob } => {
                let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                STANDARD.decode(compact).map_err(|e| Error::DecodeFailure {
                    path: path.clone(),
                    message: e.to_string(),
                })
            }
            FileEntry::Download { path, url, kind } => {
                let bytes = self.fetcher.fetch_bytes(url)?;
                if *kind == DownloadKind::Text {
                    if let Err(e) = std::str::from_utf8(&bytes) {
                        return Err(Error::DecodeFailure {
                            path: path.clone(),
                            message: format!("download is not UTF-8 text: {e}"),
                        });
                    }
                }
                Ok(bytes)
            }
        }
    }

    fn resolve(&self, entry: &FileEntry) -> Result<(String, Vec<u8>)> {
        let relative = resolve_entry_path(entry.path())?;
        let bytes = self.realize(entry)?;
        Ok((relative, bytes))
    }

    fn command_block<'d>(&self, doc: &'d ParsedDocument) -> Option<&'d str> {
        doc.commands_for(self.platform).filter(|block| !block.trim().is_empty())
    }

    fn materialize_folder(&self, doc: &ParsedDocument, output_dir: &Path) -> Result<MaterializeReport> {
        let root = output_dir.join(&doc.project_name);
        fs::create_dir_all(&root)?;
        debug!("Materializing '{}' into '{}'", doc.project_name, root.display());

        let mut written = IndexSet::new();
        let mut failed = Vec::new();
        for entry in &doc.file_entries {
            match self.write_folder_entry(&root, entry, &written) {
                Ok(relative) => {
                    written.insert(relative);
                }
                Err(e) => {
                    warn!("Skipping '{}': {}", entry.path(), e);
                    failed.push(FailedEntry { path: entry.path().to_string(), reason: e.to_string() });
                }
            }
        }

        let mut executed = Vec::new();
        let mut script_name = None;
        if let Some(block) = self.command_block(doc) {
            let mode = if self.options.auto_confirm {
                CommandMode::AutoConfirm
            } else {
                CommandMode::Interactive
            };
            let plan = plan_commands(block, mode);
            let outcome = execute_plan(&plan, self.prompt, self.runner, &root);
            let script = InstallScript::new(self.platform, outcome.recorded);
            let script_path = root.join(script.file_name());
            fs::write(&script_path, script.render())?;
            set_executable(&script_path)?;
            executed = outcome.executed;
            script_name = Some(script.file_name().to_string());
        }

        let metadata = ProjectMetadata::new(
            doc.project_name.clone(),
            doc.project_version.clone(),
            OutputMode::Folder,
            written.len(),
            doc.update_reference.clone(),
        );
        metadata.write_to(&root)?;

        Ok(MaterializeReport {
            destination: root,
            written: written.into_iter().collect(),
            failed,
            executed,
            script: script_name,
            metadata,
        })
    }

    /// Writes one entry below `root`. Only the first write of a path in a
    /// run is backed up, so the copy always holds the pre-run content.
    fn write_folder_entry(
        &self,
        root: &Path,
        entry: &FileEntry,
        written: &IndexSet<String>,
    ) -> Result<String> {
        let (relative, bytes) = self.resolve(entry)?;
        let target = root.join(&relative);
        if let Some(parent) = target.parent() {
            ensure_inside(root, parent, &relative)?;
            fs::create_dir_all(parent)?;
        }
        if target.is_symlink() {
            return Err(Error::UnsafePath { path: relative, reason: "is a symbolic link" });
        }
        if self.options.backup && !written.contains(&relative) {
            backup_file(&target)?;
        }
        fs::write(&target, bytes)?;
        debug!("Wrote '{}'", target.display());
        Ok(relative)
    }

    fn materialize_zip(&self, doc: &ParsedDocument, output_dir: &Path) -> Result<MaterializeReport> {
        fs::create_dir_all(output_dir)?;
        let archive_path = output_dir.join(format!("{}.zip", doc.project_name));
        debug!("Materializing '{}' into '{}'", doc.project_name, archive_path.display());

        // Later entries with the same path replace the content of earlier ones.
        let mut members: IndexMap<String, Vec<u8>> = IndexMap::new();
        let mut failed = Vec::new();
        for entry in &doc.file_entries {
            match self.resolve(entry) {
                Ok((relative, bytes)) => {
                    members.insert(relative, bytes);
                }
                Err(e) => {
                    warn!("Skipping '{}': {}", entry.path(), e);
                    failed.push(FailedEntry { path: entry.path().to_string(), reason: e.to_string() });
                }
            }
        }

        let script = match self.command_block(doc) {
            Some(block) => {
                let plan = plan_commands(block, CommandMode::RecordOnly);
                let outcome = execute_plan(&plan, self.prompt, self.runner, output_dir);
                Some(InstallScript::new(self.platform, outcome.recorded))
            }
            None => None,
        };

        let metadata = ProjectMetadata::new(
            doc.project_name.clone(),
            doc.project_version.clone(),
            OutputMode::Zip,
            members.len(),
            doc.update_reference.clone(),
        );
        let record = metadata.render()?;

        let mut zip = ZipWriter::new(File::create(&archive_path)?);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (path, bytes) in &members {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(bytes)?;
        }
        if let Some(script) = &script {
            zip.start_file(script.file_name(), options.unix_permissions(0o755))?;
            zip.write_all(script.render_described().as_bytes())?;
        }
        zip.start_file(METADATA_FILE, options)?;
        zip.write_all(record.as_bytes())?;
        zip.finish()?;

        Ok(MaterializeReport {
            destination: archive_path,
            written: members.into_keys().collect(),
            failed,
            executed: Vec::new(),
            script: script.map(|s| s.file_name().to_string()),
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entry_path() {
        assert_eq!(resolve_entry_path("src/main.rs").unwrap(), "src/main.rs");
        assert_eq!(resolve_entry_path("./src//lib.rs").unwrap(), "src/lib.rs");
        assert!(matches!(resolve_entry_path("/etc/passwd"), Err(Error::UnsafePath { .. })));
        assert!(matches!(resolve_entry_path("../x"), Err(Error::UnsafePath { .. })));
        assert!(matches!(resolve_entry_path("a/../../x"), Err(Error::UnsafePath { .. })));
        assert!(matches!(resolve_entry_path("C:/x"), Err(Error::UnsafePath { .. })));
        assert!(matches!(resolve_entry_path("a\\b"), Err(Error::UnsafePath { .. })));
        assert!(matches!(resolve_entry_path("./"), Err(Error::UnsafePath { .. })));
        assert!(matches!(resolve_entry_path("vibezip"), Err(Error::ReservedPath { .. })));
        assert!(matches!(resolve_entry_path("./install.sh"), Err(Error::ReservedPath { .. })));
        assert!(matches!(resolve_entry_path("INSTALL.SH"), Err(Error::ReservedPath { .. })));
        assert!(matches!(resolve_entry_path("Vibezip"), Err(Error::ReservedPath { .. })));
        assert_eq!(resolve_entry_path("scripts/install.sh").unwrap(), "scripts/install.sh");
    }

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("my-app").is_ok());
        assert!(validate_project_name("my app 2").is_ok());
        assert!(validate_project_name("..").is_err());
        assert!(validate_project_name("a/b").is_err());
        assert!(validate_project_name("  ").is_err());
        assert!(validate_project_name(" demo").is_err());
    }
}
