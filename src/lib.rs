//! vibezip turns a declarative project document into a directory tree or a
//! zip archive, runs or records the post-create commands it declares and
//! re-applies newer versions of the document to projects it created.

/// Timestamped copies taken before files or projects are overwritten
pub mod backup;

/// Command-line interface module for the vz binary
pub mod cli;

/// Post-create command planning, execution and install scripts
pub mod commands;

/// Tool configuration (`.vibezip.json`, `.vibezip.yml`, `.vibezip.yaml`)
pub mod config;

/// Common constants
pub mod constants;

/// Parsed document model
pub mod document;

/// Error types and handling
pub mod error;

/// Tokenizer for the document grammar
pub mod lexer;

/// Document and file retrieval from disk or HTTP
pub mod loader;

/// Logger setup for the binary
pub mod logger;

/// Folder and archive output
pub mod materializer;

/// The persisted `vibezip` metadata record
pub mod metadata;

/// Document parsing pipeline
pub mod parser;

/// Operator confirmation prompts
pub mod prompt;

/// Comparison of the running tool with a remote copy
pub mod selfupdate;

/// Update checks for materialized projects
pub mod update;

/// Dotted numeric version comparison
pub mod version;
