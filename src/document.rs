//! In-memory model of a parsed project document.

use indexmap::IndexMap;
use std::fmt;

/// Execution platform a command block targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Mac,
    Linux,
}

impl Platform {
    /// All platforms, in the order their blocks are looked up.
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Mac, Platform::Linux];

    /// Returns the platform vibezip is running on.
    /// Anything that is neither Windows nor macOS is treated as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Linux
        }
    }

    /// Keyword that opens this platform's command block in a document.
    pub fn block_key(&self) -> &'static str {
        match self {
            Platform::Windows => "commandsWIN",
            Platform::Mac => "commandsMAC",
            Platform::Linux => "commandsLINUX",
        }
    }

    pub fn from_block_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|platform| platform.block_key() == key)
    }

    /// File name of the generated install script.
    pub fn script_name(&self) -> &'static str {
        match self {
            Platform::Windows => "install.bat",
            Platform::Mac | Platform::Linux => "install.sh",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Mac => write!(f, "mac"),
            Platform::Linux => write!(f, "linux"),
        }
    }
}

/// How downloaded bytes are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadKind {
    /// Bytes are written verbatim.
    #[default]
    Binary,
    /// Bytes must be valid UTF-8, otherwise the entry fails.
    Text,
}

/// A single file declared in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEntry {
    /// Inline text written as-is
    Text { path: String, content: String },
    /// Content fetched from a URL at materialization time
    Download { path: String, url: String, kind: DownloadKind },
    /// Base64 blob decoded to raw bytes at materialization time
    Base64 { path: String, blob: String },
    /// Declared without a body, produces a zero-byte file
    Empty { path: String },
}

impl FileEntry {
    pub fn path(&self) -> &str {
        match self {
            FileEntry::Text { path, .. }
            | FileEntry::Download { path, .. }
            | FileEntry::Base64 { path, .. }
            | FileEntry::Empty { path } => path,
        }
    }
}

/// Result of parsing a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub project_name: String,
    pub project_version: Option<String>,
    pub update_reference: Option<String>,
    /// Raw command text per platform, in declaration order
    pub command_blocks: IndexMap<Platform, String>,
    /// File entries in order of appearance; duplicate paths are kept
    pub file_entries: Vec<FileEntry>,
}

impl ParsedDocument {
    /// Returns the command block for `platform`, if the document declares one.
    pub fn commands_for(&self, platform: Platform) -> Option<&str> {
        self.command_blocks.get(&platform).map(String::as_str)
    }
}
