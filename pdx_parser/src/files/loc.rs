use super::interner::{PathId, PathInterner, PathTableError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a source file: file id, 1-based line and column.
///
/// Line 0 means "the whole file" and is used for diagnostics that are not
/// tied to a specific token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Loc {
    pub file_id: PathId,
    pub line: u32,
    pub column: u16,
}

impl Loc {
    pub fn new(file_id: PathId, line: u32, column: u16) -> Self {
        Self {
            file_id,
            line,
            column,
        }
    }

    /// Anchor for a whole file
    pub fn for_file(file_id: PathId) -> Self {
        Self {
            file_id,
            line: 0,
            column: 0,
        }
    }

    /// Location of an empty input with no file attached
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn same_file(&self, other: &Loc) -> bool {
        self.file_id == other.file_id
    }

    pub fn is_whole_file(&self) -> bool {
        self.line == 0
    }

    /// `path:line:column`, or just the path for a whole-file location
    pub fn fullpath(&self, interner: &PathInterner) -> Result<String, PathTableError> {
        let path = interner.lookup_fullpath(self.file_id)?;
        if self.is_whole_file() {
            Ok(path.display().to_string())
        } else {
            Ok(format!("{}:{}:{}", path.display(), self.line, self.column))
        }
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
