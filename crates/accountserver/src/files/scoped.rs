//! Session-bound file operations confined to a user root.
//!
//! [`ScopedFs`] is the object handed back by a successful login. It holds
//! nothing but the resolved root path; every operation resolves its
//! session-relative path with [`super::path::resolve`] and then delegates to
//! the host filesystem. Filesystem errors are returned as they are.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use backend::{Backend, FileEntry, Result};

use super::path::resolve;

/// Permission bits for directories created through `mkdir`.
pub const DIR_MODE: u32 = 0o775;

/// A backend bound to one user's root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedFs {
    root: PathBuf,
}

impl ScopedFs {
    /// Bind to `root`. The directory is not checked until first use.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The bound root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a session-relative path to a host path below the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve(&self.root, path)
    }
}

impl Backend for ScopedFs {
    fn home(&self) -> Result<String> {
        Ok("/".to_string())
    }

    fn ls(&self, path: &str) -> Result<Vec<FileEntry>> {
        let mut results = Vec::new();

        for entry in fs::read_dir(self.resolve(path))? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().to_string();
            results.push(FileEntry::from_metadata(name, &metadata));
        }

        // Directories first, then by name
        results.sort_by(|a, b| match (a.is_dir(), b.is_dir()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });

        Ok(results)
    }

    fn cat(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(file))
    }

    fn mkdir(&self, path: &str) -> Result<()> {
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIR_MODE);
        }
        builder.create(self.resolve(path))?;
        Ok(())
    }

    fn rm(&self, path: &str) -> Result<()> {
        let target = self.resolve(path);
        let metadata = fs::symlink_metadata(&target)?;
        if metadata.is_dir() {
            fs::remove_dir(&target)?;
        } else {
            fs::remove_file(&target)?;
        }
        Ok(())
    }

    fn mv(&self, from: &str, to: &str) -> Result<()> {
        fs::rename(self.resolve(from), self.resolve(to))?;
        Ok(())
    }

    fn save(&self, path: &str, content: &mut dyn Read) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.resolve(path))?;
        io::copy(content, &mut file)?;
        Ok(())
    }

    fn touch(&self, path: &str) -> Result<()> {
        // Existing content is left in place.
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.resolve(path))?;
        file.write_all(b"")?;
        file.flush()?;
        Ok(())
    }
}
