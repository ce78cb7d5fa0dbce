use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::path::{normalize, parent};
use crate::{Vfs, VfsError, VfsResult};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(String),
}

/// An in-memory implementation of `Vfs`.
///
/// Entries are keyed by normalized path in a sharded map, so writes to
/// independent files never contend on a single lock. The root directory
/// always exists and is not stored.
#[derive(Debug, Default)]
pub struct MemoryVfs {
    nodes: DashMap<String, Node>,
}

impl MemoryVfs {
    /// Create an empty in-memory VFS.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently stored.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|entry| matches!(entry.value(), Node::File(_)))
            .count()
    }

    fn ensure_parent_dir(&self, normalized: &str) -> VfsResult<()> {
        let Some(dir) = parent(normalized) else {
            return Err(VfsError::AlreadyExists(String::new()));
        };
        if dir.is_empty() {
            return Ok(());
        }
        match self.nodes.get(dir).as_deref() {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(VfsError::WrongType(dir.to_owned())),
            None => Err(VfsError::NotFound(dir.to_owned())),
        }
    }
}

#[async_trait]
impl Vfs for MemoryVfs {
    async fn mkdir(&self, path: &str) -> VfsResult<()> {
        let key = normalize(path)?;
        self.ensure_parent_dir(&key)?;
        match self.nodes.entry(key) {
            Entry::Occupied(occupied) => Err(VfsError::AlreadyExists(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(Node::Dir);
                Ok(())
            },
        }
    }

    async fn write_file(&self, path: &str, contents: &str) -> VfsResult<()> {
        let key = normalize(path)?;
        if key.is_empty() {
            return Err(VfsError::WrongType(path.to_owned()));
        }
        self.ensure_parent_dir(&key)?;
        match self.nodes.entry(key) {
            Entry::Occupied(mut occupied) => {
                if matches!(occupied.get(), Node::Dir) {
                    return Err(VfsError::WrongType(occupied.key().clone()));
                }
                occupied.insert(Node::File(contents.to_owned()));
            },
            Entry::Vacant(vacant) => {
                vacant.insert(Node::File(contents.to_owned()));
            },
        }
        Ok(())
    }

    async fn read_file(&self, path: &str) -> VfsResult<String> {
        let key = normalize(path)?;
        match self.nodes.get(&key).as_deref() {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Dir) => Err(VfsError::WrongType(key)),
            None => Err(VfsError::NotFound(key)),
        }
    }
}
