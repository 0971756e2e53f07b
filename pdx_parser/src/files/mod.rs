//! Files, paths and source locations
//!
//! - [`PathInterner`] maps file paths to compact [`PathId`]s
//! - [`Loc`] is a (file, line, column) triple
//! - [`FileEntry`] describes a vanilla or mod script file
//! - [`scan_game_and_mod`] discovers a project's files

pub mod bom;
pub mod cache;
pub mod entry;
pub mod interner;
pub mod loc;
pub mod scanner;

pub use bom::strip_bom;
pub use cache::SourceCache;
pub use entry::{FileEntry, FileKind};
pub use interner::{PathId, PathInterner, PathTableError};
pub use loc::Loc;
pub use scanner::{scan_game_and_mod, ScanError};
