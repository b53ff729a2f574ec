//! Detection of a newer copy of the vibezip binary.
//!
//! This module only compares content. Fetching the candidate and deciding
//! what to do with it is left to the caller.

use sha2::{Digest, Sha256};

/// Outcome of comparing the running tool with a remote copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelfUpdateStatus {
    Identical,
    UpdateAvailable { local_hash: String, remote_hash: String },
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Compares local and remote content by hash.
pub fn compare_self(local: &[u8], remote: &[u8]) -> SelfUpdateStatus {
    let local_hash = content_hash(local);
    let remote_hash = content_hash(remote);
    if local_hash == remote_hash {
        SelfUpdateStatus::Identical
    } else {
        SelfUpdateStatus::UpdateAvailable { local_hash, remote_hash }
    }
}
