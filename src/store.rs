//! On-disk program store: UMG++ sources keyed by user and program name.
//!
//! Layout is one directory per user under the configured programs root,
//! one `.umgpp` file per program. The store holds raw source text only;
//! compilation artifacts are never persisted.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use std::{error::Error, fmt, fs};

use serde::Serialize;

/// File extension for stored programs, appended when the name lacks it.
pub const PROGRAM_EXTENSION: &str = "umgpp";

#[derive(Debug)]
pub enum StoreError {
    /// Name is empty or would escape the store directory.
    InvalidName {
        name: String,
    },
    ProgramNotFound {
        name: String,
        path: PathBuf,
    },
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    DirectoryReadFailed {
        path: PathBuf,
        source: io::Error,
    },
    FileWriteFailed {
        path: PathBuf,
        source: io::Error,
    },
    FileReadFailed {
        path: PathBuf,
        source: io::Error,
    },
    DeletionFailed {
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidName { name } => {
                write!(f, "Invalid program or user name '{}'", name)
            }
            StoreError::ProgramNotFound { name, path } => {
                write!(f, "Program '{}' not found at '{}'", name, path.display())
            }
            StoreError::DirectoryCreationFailed { path, .. } => {
                write!(f, "Failed to create directory '{}'", path.display())
            }
            StoreError::DirectoryReadFailed { path, .. } => {
                write!(f, "Failed to read directory '{}'", path.display())
            }
            StoreError::FileWriteFailed { path, .. } => {
                write!(f, "Failed to write file '{}'", path.display())
            }
            StoreError::FileReadFailed { path, .. } => {
                write!(f, "Failed to read file '{}'", path.display())
            }
            StoreError::DeletionFailed { path, .. } => {
                write!(f, "Failed to delete file '{}'", path.display())
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::DirectoryCreationFailed { source, .. }
            | StoreError::DirectoryReadFailed { source, .. }
            | StoreError::FileWriteFailed { source, .. }
            | StoreError::FileReadFailed { source, .. }
            | StoreError::DeletionFailed { source, .. } => Some(source),
            StoreError::InvalidName { .. } | StoreError::ProgramNotFound { .. } => None,
        }
    }
}

type Result<T> = std::result::Result<T, StoreError>;

/// One stored program, as reported by [`ProgramStore::list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramInfo {
    /// Program name without the extension.
    pub name: String,
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
    /// Last modification time as seconds since the Unix epoch, when the
    /// filesystem provides one.
    pub modified: Option<u64>,
}

pub struct ProgramStore {
    root: PathBuf,
}

impl ProgramStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProgramStore { root: root.into() }
    }

    fn user_dir(&self, user: &str) -> Result<PathBuf> {
        validate_name(user)?;
        Ok(self.root.join(user))
    }

    fn program_path(&self, user: &str, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        let file_name = if name.ends_with(&format!(".{}", PROGRAM_EXTENSION)) {
            name.to_string()
        } else {
            format!("{}.{}", name, PROGRAM_EXTENSION)
        };
        Ok(self.user_dir(user)?.join(file_name))
    }

    /// Persist one program's source text, creating the user directory on
    /// first use. Returns the path written.
    pub fn save(&self, user: &str, name: &str, source: &str) -> Result<PathBuf> {
        let path = self.program_path(user, name)?;
        let dir = self.user_dir(user)?;
        fs::create_dir_all(&dir).map_err(|e| StoreError::DirectoryCreationFailed {
            path: dir,
            source: e,
        })?;
        fs::write(&path, source).map_err(|e| StoreError::FileWriteFailed {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    pub fn load(&self, user: &str, name: &str) -> Result<String> {
        let path = self.program_path(user, name)?;
        if !path.exists() {
            return Err(StoreError::ProgramNotFound {
                name: name.to_string(),
                path,
            });
        }
        fs::read_to_string(&path).map_err(|e| StoreError::FileReadFailed { path, source: e })
    }

    /// Delete one stored program. Deleting a program that does not exist
    /// is not an error.
    pub fn delete(&self, user: &str, name: &str) -> Result<()> {
        let path = self.program_path(user, name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::DeletionFailed { path, source: e }),
        }
    }

    /// List one user's stored programs, sorted by name. A user with no
    /// directory yet simply has no programs.
    pub fn list(&self, user: &str) -> Result<Vec<ProgramInfo>> {
        let dir = self.user_dir(user)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::DirectoryReadFailed {
                    path: dir,
                    source: e,
                })
            }
        };

        let mut programs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::DirectoryReadFailed {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(PROGRAM_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let metadata = entry.metadata().map_err(|e| StoreError::FileReadFailed {
                path: path.clone(),
                source: e,
            })?;
            let modified = metadata
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|duration| duration.as_secs());

            programs.push(ProgramInfo {
                name: name.to_string(),
                path: path.clone(),
                size: metadata.len(),
                modified,
            });
        }

        programs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(programs)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn validate_name(name: &str) -> Result<()> {
    let escapes = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if escapes {
        return Err(StoreError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
