// Workspace layer: turns the paths given on the command line into
// canonical files and finds the one solution directory they belong to.
//
// The file -> solution lookup goes through the `MetadataStore` trait so the
// resolver can be exercised against an in-memory store in tests.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::WorkspaceError;

/// Metadata file written next to a downloaded solution.
pub const METADATA_FILEPATH: &str = ".exercism/metadata.json";
/// Location used by older versions of the client.
pub const LEGACY_METADATA_FILEPATH: &str = ".solution.json";

/// Solution metadata as stored in the solution directory.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub id: String,
    #[serde(rename = "exercise")]
    pub exercise_slug: String,
    #[serde(rename = "track")]
    pub track_slug: String,
    #[serde(rename = "url", default)]
    pub view_url: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub is_requester: bool,
    #[serde(rename = "auto_approve", default)]
    pub auto_approve_on_completion: bool,
}

/// One file of a solution, addressed relative to the exercise root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    logical_path: String,
    filepath: PathBuf,
}

impl Document {
    /// Build a document for `file` inside `root`. The logical path always
    /// uses `/` separators.
    pub fn new(root: &Path, file: &Path) -> Result<Self, WorkspaceError> {
        let rel = file
            .strip_prefix(root)
            .map_err(|_| WorkspaceError::NotInWorkspace {
                path: file.to_path_buf(),
                workspace: root.to_path_buf(),
            })?;
        let logical_path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok(Document {
            logical_path,
            filepath: file.to_path_buf(),
        })
    }

    /// Path relative to the exercise root, e.g. `src/lib.rs`.
    pub fn path(&self) -> &str {
        &self.logical_path
    }

    /// Absolute path on disk.
    pub fn filepath(&self) -> &Path {
        &self.filepath
    }
}

/// Lookup of the solution that owns a file.
pub trait MetadataStore {
    /// Directory of the solution owning `path`, or `MissingMetadata`.
    fn solution_dir(&self, path: &Path) -> Result<PathBuf, WorkspaceError>;

    /// Metadata for the solution rooted at `dir`.
    fn load_solution(&self, dir: &Path) -> Result<Solution, WorkspaceError>;
}

/// The on-disk workspace rooted at the configured directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    /// Open the workspace at `dir`, resolving symlinks so it compares
    /// equal to canonicalized file paths.
    pub fn new(dir: &Path) -> Result<Self, WorkspaceError> {
        let dir = fs::canonicalize(dir).map_err(|source| WorkspaceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Workspace { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn metadata_path(dir: &Path) -> Option<PathBuf> {
        [METADATA_FILEPATH, LEGACY_METADATA_FILEPATH]
            .iter()
            .map(|rel| dir.join(rel))
            .find(|p| p.is_file())
    }
}

impl MetadataStore for Workspace {
    fn solution_dir(&self, path: &Path) -> Result<PathBuf, WorkspaceError> {
        if !path.starts_with(&self.dir) {
            return Err(WorkspaceError::NotInWorkspace {
                path: path.to_path_buf(),
                workspace: self.dir.clone(),
            });
        }
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir == self.dir {
                break;
            }
            if Self::metadata_path(dir).is_some() {
                return Ok(dir.to_path_buf());
            }
            current = dir.parent();
        }
        Err(WorkspaceError::MissingMetadata {
            path: path.to_path_buf(),
        })
    }

    fn load_solution(&self, dir: &Path) -> Result<Solution, WorkspaceError> {
        let path = Self::metadata_path(dir).ok_or_else(|| WorkspaceError::MissingMetadata {
            path: dir.to_path_buf(),
        })?;
        let bytes = fs::read(&path).map_err(|source| WorkspaceError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| WorkspaceError::Metadata { path, source })
    }
}

/// Normalize one argument: absolute, existing, not a directory, symlinks
/// resolved.
pub fn resolve_path(arg: &Path) -> Result<PathBuf, WorkspaceError> {
    let abs = if arg.is_absolute() {
        arg.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| WorkspaceError::Io {
                path: arg.to_path_buf(),
                source,
            })?
            .join(arg)
    };

    let info = fs::symlink_metadata(&abs).map_err(|source| match source.kind() {
        ErrorKind::NotFound => WorkspaceError::NotFound { path: abs.clone() },
        _ => WorkspaceError::Io {
            path: abs.clone(),
            source,
        },
    })?;
    if info.is_dir() {
        return Err(WorkspaceError::IsDirectory { path: abs });
    }

    let real = fs::canonicalize(&abs).map_err(|source| match source.kind() {
        ErrorKind::NotFound => WorkspaceError::NotFound { path: abs.clone() },
        _ => WorkspaceError::Io {
            path: abs.clone(),
            source,
        },
    })?;
    // A symlink may point at a directory.
    if real.is_dir() {
        return Err(WorkspaceError::IsDirectory { path: abs });
    }
    debug!(arg = %arg.display(), resolved = %real.display(), "resolved path");
    Ok(real)
}

/// Normalize every argument, stopping at the first failure.
pub fn resolve_paths<P: AsRef<Path>>(args: &[P]) -> Result<Vec<PathBuf>, WorkspaceError> {
    args.iter().map(|arg| resolve_path(arg.as_ref())).collect()
}

/// Find the single solution directory shared by all `paths`.
pub fn resolve_solution_dir<S: MetadataStore + ?Sized>(
    store: &S,
    paths: &[PathBuf],
) -> Result<PathBuf, WorkspaceError> {
    let mut expected: Option<PathBuf> = None;
    for path in paths {
        let dir = store.solution_dir(path)?;
        match &expected {
            Some(first) if *first != dir => {
                return Err(WorkspaceError::DifferentSolutions {
                    expected: first.clone(),
                    found: dir,
                });
            }
            Some(_) => {}
            None => {
                debug!(dir = %dir.display(), "solution directory");
                expected = Some(dir);
            }
        }
    }
    expected.ok_or_else(|| WorkspaceError::MissingMetadata {
        path: PathBuf::new(),
    })
}
