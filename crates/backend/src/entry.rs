//! Directory entry records returned by `ls`.

use std::fs::Metadata;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// A single file or directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry type.
    pub entry_type: FileEntryType,
    /// Size in bytes (0 for anything that is not a regular file).
    pub size: u64,
    /// Unix permissions mode.
    pub mode: u32,
    /// Last modified timestamp (Unix epoch seconds).
    pub modified: u64,
}

/// Type of file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileEntryType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Other (device, socket, etc.).
    Other,
}

impl FileEntry {
    /// Build an entry from a name and the entry's own (non-followed) metadata.
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        let entry_type = if file_type.is_symlink() {
            FileEntryType::Symlink
        } else if file_type.is_dir() {
            FileEntryType::Directory
        } else if file_type.is_file() {
            FileEntryType::File
        } else {
            FileEntryType::Other
        };

        let size = if file_type.is_file() { metadata.len() } else { 0 };

        let modified = metadata
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH)
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            name: name.into(),
            entry_type,
            size,
            mode: unix_mode(metadata),
            modified,
        }
    }

    /// Whether this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.entry_type == FileEntryType::Directory
    }
}

#[cfg(unix)]
fn unix_mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    metadata.mode()
}

#[cfg(not(unix))]
fn unix_mode(_metadata: &Metadata) -> u32 {
    0
}
