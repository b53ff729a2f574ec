//! Error handling for vibezip.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use thiserror::Error;

/// All errors that can occur while parsing, materializing or updating a project.
///
/// Entry-level variants (`TransportFailure`, `DecodeFailure`, `UnsafePath`,
/// `ReservedPath`) only fail the single affected file entry when raised
/// during materialization. Everything else aborts the current operation.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// A field the document cannot do without is missing
    #[error("{field} not found in the document.")]
    MissingRequiredField { field: &'static str },

    /// The document does not follow the grammar
    #[error("Parse error at line {line}: {message}.")]
    ParseError { line: usize, message: String },

    /// The same platform command block is declared more than once
    #[error("Parse error at line {line}: command block '{key}' is declared more than once.")]
    DuplicateCommandBlock { key: &'static str, line: usize },

    /// Retrieval of a document or a downloaded file failed
    #[error("Failed to fetch '{url}': {message}.")]
    TransportFailure { url: String, message: String },

    /// A file entry body could not be decoded
    #[error("Failed to decode '{path}': {message}.")]
    DecodeFailure { path: String, message: String },

    /// One of the two versions is absent
    #[error("Cannot compare versions (local: {local}, remote: {remote}).")]
    VersionIncomparable { local: String, remote: String },

    /// No metadata record at the given location
    #[error("No vibezip project found at '{location}'.")]
    MetadataAbsent { location: String },

    /// The metadata record has no update link
    #[error("Project '{project}' has no update_link, cannot check for updates.")]
    MissingUpdateReference { project: String },

    /// The metadata record is malformed or cannot be written
    #[error("Metadata error: {0}.")]
    MetadataError(String),

    /// A file entry path is absolute or escapes the project root
    #[error("Unsafe file path '{path}': {reason}.")]
    UnsafePath { path: String, reason: &'static str },

    /// A file entry path collides with a file vibezip generates itself
    #[error("File path '{path}' is reserved for vibezip.")]
    ReservedPath { path: String },

    /// The project name cannot be used as a directory or archive name
    #[error("Invalid project name '{name}'.")]
    InvalidProjectName { name: String },

    /// A local document path does not exist
    #[error("Document '{path}' does not exist.")]
    DocumentNotFound { path: String },

    /// Represents errors in the tool configuration file
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Interactive confirmation failed
    #[error("Prompt error: {0}.")]
    PromptError(String),

    /// A shell command could not be started or exited unsuccessfully
    #[error("Command error: {0}.")]
    CommandError(String),

    /// Reading or writing a zip archive failed
    #[error("Archive error: {0}.")]
    ArchiveError(#[from] zip::result::ZipError),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
