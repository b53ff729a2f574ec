//! Common constants used throughout vibezip.

/// Keyword that opens the version header line (`vibezip v1.2.3`)
pub const PRODUCT_KEYWORD: &str = "vibezip";

/// Name of the metadata record written at the project (or archive) root
pub const METADATA_FILE: &str = "vibezip";

/// Supported tool configuration file names, looked up in the working directory
pub const CONFIG_FILES: [&str; 3] = [".vibezip.json", ".vibezip.yml", ".vibezip.yaml"];

/// Retrieval timeout used when the configuration does not set one
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Timestamp layout for backup and snapshot suffixes
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
