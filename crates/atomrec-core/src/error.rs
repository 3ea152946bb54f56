//! Error types for the atomrec-core library.
//!
//! Per-record extraction problems are not errors: the scanner absorbs them
//! and reports an empty payload with a reason. This enum covers the failures
//! that are allowed to surface — bad configuration and I/O on the input
//! directory or the export tree.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for atomrec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for configuration and I/O failures
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read an input storage file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an exported note
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create an output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The Atom database directory does not exist
    #[error("Atom database directory does not exist: {path}")]
    DbDirMissing {
        /// The missing path
        path: PathBuf,
    },

    /// The Atom database path is not a directory
    #[error("Atom database path is not a directory: {path}")]
    DbDirNotDirectory {
        /// The offending path
        path: PathBuf,
    },

    /// No LevelDB storage files found in the database directory
    #[error("no LevelDB files (*.ldb, *.log) found in: {path}")]
    NoStorageFiles {
        /// The directory that was searched
        path: PathBuf,
    },

    /// Requested fallback extension is not in the supported set
    #[error("unsupported extension: '{ext}'. Supported extensions: {supported}")]
    UnsupportedExtension {
        /// The extension that was rejected
        ext: String,
        /// Comma-separated list of supported extensions
        supported: String,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new missing-database-directory error
    pub fn db_dir_missing(path: impl Into<PathBuf>) -> Self {
        Self::DbDirMissing { path: path.into() }
    }

    /// Creates a new not-a-directory error
    pub fn db_dir_not_directory(path: impl Into<PathBuf>) -> Self {
        Self::DbDirNotDirectory { path: path.into() }
    }

    /// Creates a new no-storage-files error
    pub fn no_storage_files(path: impl Into<PathBuf>) -> Self {
        Self::NoStorageFiles { path: path.into() }
    }

    /// Creates a new unsupported-extension error listing the valid set
    pub fn unsupported_extension(
        ext: impl Into<String>,
        supported: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        let supported = supported
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnsupportedExtension {
            ext: ext.into(),
            supported,
        }
    }

    /// Returns true if this error should abort the run rather than skip a file
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::FileRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::db_dir_missing("/nonexistent/atom");
        assert!(err.to_string().contains("does not exist"));
        assert!(err.to_string().contains("/nonexistent/atom"));
    }

    #[test]
    fn test_unsupported_extension_lists_valid_set() {
        let err = Error::unsupported_extension("exe", ["py", "rb", "txt"]);
        let msg = err.to_string();
        assert!(msg.contains("'exe'"));
        assert!(msg.contains("py, rb, txt"));
    }

    #[test]
    fn test_is_fatal() {
        let read = Error::file_read(
            "/tmp/x.ldb",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!read.is_fatal());

        let write = Error::file_write(
            "/tmp/out.txt",
            std::io::Error::other("disk full"),
        );
        assert!(write.is_fatal());
    }
}
