use crate::{VfsError, VfsResult};
use std::path::{Component, Path, PathBuf};

/// Normalize a VFS path into its canonical `/`-joined form.
///
/// `.` segments and empty segments are dropped, `..` pops the previous
/// segment. The empty string denotes the root.
///
/// # Errors
///
/// Returns `VfsError::SandboxViolation` if the path is absolute or if `..`
/// climbs above the root.
pub fn normalize(path: &str) -> VfsResult<String> {
    if path.starts_with('/') {
        return Err(VfsError::SandboxViolation(format!(
            "absolute path not allowed: {path}"
        )));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                if segments.pop().is_none() {
                    return Err(VfsError::SandboxViolation(format!(
                        "path climbs above root: {path}"
                    )));
                }
            },
            other => segments.push(other),
        }
    }

    Ok(segments.join("/"))
}

/// Parent of a normalized path. The root has no parent.
#[must_use]
pub fn parent(normalized: &str) -> Option<&str> {
    if normalized.is_empty() {
        return None;
    }
    Some(normalized.rsplit_once('/').map_or("", |(dir, _)| dir))
}

/// Lexically resolves a relative path against a base directory.
/// Does NOT touch the filesystem.
///
/// # Errors
///
/// Returns `VfsError::SandboxViolation` if `request_path` is absolute or
/// traverses above `base_root` using `..`.
pub fn resolve_path(base_root: &Path, request_path: &str) -> VfsResult<PathBuf> {
    let req = Path::new(request_path);

    if req.is_absolute() {
        return Err(VfsError::SandboxViolation(
            "Absolute paths are not allowed in the VFS sandbox".into(),
        ));
    }

    let mut resolved = base_root.to_path_buf();

    for component in req.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(VfsError::SandboxViolation(
                    "Prefix or root components are not allowed".into(),
                ));
            },
            Component::CurDir => {},
            Component::ParentDir => {
                if resolved == base_root {
                    return Err(VfsError::SandboxViolation(
                        "Attempted to traverse above sandbox root".into(),
                    ));
                }
                resolved.pop();
            },
            Component::Normal(p) => {
                resolved.push(p);
            },
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_dots() {
        assert_eq!(normalize("./pyweb//__init__.py").unwrap(), "pyweb/__init__.py");
        assert_eq!(normalize("pyweb/sub/../tags.py").unwrap(), "pyweb/tags.py");
        assert_eq!(normalize("").unwrap(), "");
    }

    #[test]
    fn test_normalize_rejects_escape() {
        assert!(matches!(
            normalize("pyweb/../../etc"),
            Err(VfsError::SandboxViolation(_))
        ));
        assert!(matches!(
            normalize("/etc/passwd"),
            Err(VfsError::SandboxViolation(_))
        ));
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("pyweb/tags.py"), Some("pyweb"));
        assert_eq!(parent("pyweb"), Some(""));
        assert_eq!(parent(""), None);
    }

    #[test]
    fn test_resolve_path_valid() {
        let base = Path::new("/srv/stage");
        let res = resolve_path(base, "pyweb/__init__.py").unwrap();
        assert_eq!(res, Path::new("/srv/stage/pyweb/__init__.py"));
    }

    #[test]
    fn test_resolve_path_traversal_blocked() {
        let base = Path::new("/srv/stage");
        let res = resolve_path(base, "pyweb/../../etc/passwd");
        assert!(matches!(res, Err(VfsError::SandboxViolation(_))));
    }
}
