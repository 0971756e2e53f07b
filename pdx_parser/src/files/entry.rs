use super::interner::{PathId, PathInterner};
use super::loc::Loc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Where a file came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FileKind {
    Vanilla,
    Mod,
}

/// A script file found under the game or mod directory
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path components below the game or mod root
    path: PathBuf,
    fullpath: PathBuf,
    kind: FileKind,
    idx: OnceLock<PathId>,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, fullpath: impl Into<PathBuf>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            fullpath: fullpath.into(),
            kind,
            idx: OnceLock::new(),
        }
    }

    /// Entry for a standalone file, relative path = file name
    pub fn standalone(fullpath: impl Into<PathBuf>) -> Self {
        let fullpath = fullpath.into();
        let path = fullpath
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| fullpath.clone());
        Self::new(path, fullpath, FileKind::Mod)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fullpath(&self) -> &Path {
        &self.fullpath
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn filename(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }

    /// Id in `interner`, if `store_in` has run
    pub fn path_idx(&self) -> Option<PathId> {
        self.idx.get().copied()
    }

    /// Store the entry's paths and remember the id; repeated calls return it
    pub fn store_in(&self, interner: &PathInterner) -> PathId {
        *self
            .idx
            .get_or_init(|| interner.store(&self.path, &self.fullpath))
    }

    /// Start-of-file anchor
    pub fn loc(&self, interner: &PathInterner) -> Loc {
        Loc::for_file(self.store_in(interner))
    }
}
