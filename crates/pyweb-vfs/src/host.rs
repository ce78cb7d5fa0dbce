use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::path::resolve_path;
use crate::{Vfs, VfsError, VfsResult};

/// An implementation of `Vfs` backed by a directory on the host filesystem.
///
/// Every request path is resolved lexically against the root and rejected
/// if any existing component on the way is a symlink.
#[derive(Debug, Clone)]
pub struct HostVfs {
    root: PathBuf,
}

impl HostVfs {
    /// Create a host VFS rooted at `root`. The directory must exist.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The physical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn resolve_physical_path(&self, path: &str) -> VfsResult<PathBuf> {
        let resolved = resolve_path(&self.root, path)?;

        let mut current = resolved.as_path();
        while current != self.root {
            if let Ok(meta) = tokio::fs::symlink_metadata(current).await
                && meta.is_symlink()
            {
                return Err(VfsError::SandboxViolation(
                    "Symlinks are strictly forbidden within the VFS sandbox".into(),
                ));
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Ok(resolved)
    }
}

fn map_io(path: &str, e: std::io::Error) -> VfsError {
    match e.kind() {
        ErrorKind::NotFound => VfsError::NotFound(path.to_owned()),
        ErrorKind::AlreadyExists => VfsError::AlreadyExists(path.to_owned()),
        _ => VfsError::Io(e),
    }
}

#[async_trait]
impl Vfs for HostVfs {
    async fn mkdir(&self, path: &str) -> VfsResult<()> {
        let target = self.resolve_physical_path(path).await?;
        tokio::fs::create_dir(&target)
            .await
            .map_err(|e| map_io(path, e))?;
        debug!(path = %target.display(), "Created directory");
        Ok(())
    }

    async fn write_file(&self, path: &str, contents: &str) -> VfsResult<()> {
        let target = self.resolve_physical_path(path).await?;
        if tokio::fs::metadata(&target)
            .await
            .is_ok_and(|meta| meta.is_dir())
        {
            return Err(VfsError::WrongType(path.to_owned()));
        }
        tokio::fs::write(&target, contents)
            .await
            .map_err(|e| map_io(path, e))?;
        debug!(path = %target.display(), bytes = contents.len(), "Wrote file");
        Ok(())
    }

    async fn read_file(&self, path: &str) -> VfsResult<String> {
        let target = self.resolve_physical_path(path).await?;
        tokio::fs::read_to_string(&target)
            .await
            .map_err(|e| map_io(path, e))
    }
}
