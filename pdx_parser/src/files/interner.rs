//! Shared path table
//!
//! Every file the tool touches gets a small `PathId`. Locations carry the id
//! instead of a path string; the interner turns it back into a path for
//! rendering. One interner is shared by every worker in a batch run.

use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Index into a [`PathInterner`]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct PathId(u32);

impl PathId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathTableError {
    #[error("path id {0} is out of bounds")]
    IndexOutOfBounds(PathId),
}

impl PathTableError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::file_processing::UNKNOWN_PATH_ID
    }
}

#[derive(Debug)]
struct PathRecord {
    /// Path relative to the game or mod root
    path: PathBuf,
    fullpath: PathBuf,
}

#[derive(Debug, Default)]
struct PathTable {
    records: Vec<PathRecord>,
    by_fullpath: HashMap<PathBuf, PathId>,
}

/// Cloneable handle to a concurrent path table
#[derive(Debug, Clone, Default)]
pub struct PathInterner {
    inner: Arc<RwLock<PathTable>>,
}

impl PathInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `fullpath`, allocating one on first sight
    pub fn store(&self, path: impl AsRef<Path>, fullpath: impl AsRef<Path>) -> PathId {
        let fullpath = fullpath.as_ref();

        {
            let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(id) = table.by_fullpath.get(fullpath) {
                return *id;
            }
        }

        let mut table = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        // Another writer may have stored it between the two locks
        if let Some(id) = table.by_fullpath.get(fullpath) {
            return *id;
        }

        let id = PathId(table.records.len() as u32);
        table.records.push(PathRecord {
            path: path.as_ref().to_path_buf(),
            fullpath: fullpath.to_path_buf(),
        });
        table.by_fullpath.insert(fullpath.to_path_buf(), id);
        id
    }

    /// Relative path of a stored file
    pub fn lookup_path(&self, id: PathId) -> Result<PathBuf, PathTableError> {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        table
            .records
            .get(id.0 as usize)
            .map(|record| record.path.clone())
            .ok_or(PathTableError::IndexOutOfBounds(id))
    }

    pub fn lookup_fullpath(&self, id: PathId) -> Result<PathBuf, PathTableError> {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        table
            .records
            .get(id.0 as usize)
            .map(|record| record.fullpath.clone())
            .ok_or(PathTableError::IndexOutOfBounds(id))
    }

    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::thread;

    #[test]
    fn test_store_is_idempotent() {
        let interner = PathInterner::new();

        let a = interner.store("common/traits.txt", "/game/common/traits.txt");
        let b = interner.store("common/traits.txt", "/game/common/traits.txt");
        let c = interner.store("events/a.txt", "/game/events/a.txt");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_lookup() {
        let interner = PathInterner::new();
        let id = interner.store("events/a.txt", "/mod/events/a.txt");

        assert_eq!(interner.lookup_path(id).unwrap(), PathBuf::from("events/a.txt"));
        assert_eq!(
            interner.lookup_fullpath(id).unwrap(),
            PathBuf::from("/mod/events/a.txt")
        );
    }

    #[test]
    fn test_unknown_id() {
        let interner = PathInterner::new();
        assert_matches!(
            interner.lookup_path(PathId::new(7)),
            Err(PathTableError::IndexOutOfBounds(id)) if id == PathId::new(7)
        );
        assert!(interner.lookup_fullpath(PathId::new(0)).is_err());
    }

    #[test]
    fn test_fresh_interners_are_independent() {
        let first = PathInterner::new();
        first.store("a.txt", "/a.txt");

        let second = PathInterner::new();
        assert!(second.is_empty());
    }

    #[test]
    fn test_concurrent_store() {
        let interner = PathInterner::new();

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let interner = interner.clone();
                thread::spawn(move || {
                    (0..100)
                        .map(|i| {
                            // Half the paths are shared between workers
                            let name = if i % 2 == 0 {
                                format!("shared_{}.txt", i)
                            } else {
                                format!("worker_{}_{}.txt", worker, i)
                            };
                            let id = interner.store(&name, format!("/root/{}", name));
                            (name, id)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            for (name, id) in handle.join().unwrap() {
                assert_eq!(interner.lookup_path(id).unwrap(), PathBuf::from(name));
            }
        }

        assert_eq!(interner.len(), 50 + 8 * 50);
    }
}
