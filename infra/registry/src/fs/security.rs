use crate::error::RegistryError;
use std::path::{Component, Path, PathBuf};

/// Collapse `.` lexically and refuse anything that could climb above the sandbox root.
fn normalize_relative(path: &Path) -> Result<PathBuf, RegistryError> {
    let mut out = PathBuf::new();

    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir => {
                return Err(RegistryError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("Node path attempted to escape sandbox via '..'".into()),
                });
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(RegistryError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("Absolute paths are not allowed in sandbox".into()),
                });
            },
        }
    }

    Ok(out)
}

/// Maps node segments onto a directory under `root`, verifying it stays inside the sandbox.
pub(crate) fn node_dir(root: &Path, segments: &[&str]) -> Result<PathBuf, RegistryError> {
    let relative: PathBuf = segments.iter().collect();
    let safe_rel = normalize_relative(&relative)?;
    let joined = root.join(safe_rel);

    match joined.canonicalize() {
        Ok(canonical) => validate_canonical(root, canonical),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => validate_path(root, &joined),
        Err(e) => Err(RegistryError::Io { source: e, context: None }),
    }
}

fn validate_canonical(root: &Path, canonical: PathBuf) -> Result<PathBuf, RegistryError> {
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        Err(RegistryError::PathTraversalAttempt {
            message: canonical.display().to_string().into(),
            context: Some("Node directory resolves outside sandbox".into()),
        })
    }
}

/// Validates a node directory that doesn't exist yet through its first existing ancestor.
///
/// A symlinked ancestor pointing outside the root is rejected.
fn validate_path(root: &Path, joined: &Path) -> Result<PathBuf, RegistryError> {
    if !joined.starts_with(root) {
        return Err(RegistryError::PathTraversalAttempt {
            message: joined.display().to_string().into(),
            context: Some("Path is outside sandbox boundaries".into()),
        });
    }

    let mut current = Some(joined);

    while let Some(path) = current {
        if path == root {
            return Ok(joined.to_path_buf());
        }

        if path.exists() {
            return match path.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(joined.to_path_buf()),
                Ok(canonical) => Err(RegistryError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Existing ancestor is a symlink outside sandbox".into()),
                }),
                Err(e) => Err(RegistryError::Io {
                    source: e,
                    context: Some("Failed to verify ancestor directory".into()),
                }),
            };
        }

        current = path.parent();
    }

    Err(RegistryError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("No valid ancestor found within sandbox".into()),
    })
}
