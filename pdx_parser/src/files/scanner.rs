//! Game + mod directory scanning
//!
//! Collects `.txt` files from the vanilla game directory and the mod
//! directory. A mod file replaces any vanilla file with the same file name,
//! and vanilla subtrees listed in `replace_paths` are skipped entirely.

use super::entry::{FileEntry, FileKind};
use crate::logging::codes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    MissingRoot { path: PathBuf },

    #[error("Failed to walk {root}: {message}")]
    Walk { root: PathBuf, message: String },
}

impl ScanError {
    pub fn error_code(&self) -> crate::logging::Code {
        codes::file_processing::SCAN_FAILED
    }
}

fn is_script_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

fn walk_root(
    root: &Path,
    kind: FileKind,
    replace_paths: &[PathBuf],
    found: &mut HashMap<String, FileEntry>,
) -> Result<(), ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(root).follow_links(true).into_iter();

    // Only vanilla subtrees are subject to replacement
    let walker = walker.filter_entry(|entry| {
        if kind == FileKind::Mod || !entry.file_type().is_dir() {
            return true;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        !replace_paths.iter().any(|replaced| relative.starts_with(replaced))
    });

    for entry in walker {
        let entry = entry.map_err(|e| ScanError::Walk {
            root: root.to_path_buf(),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() || !is_script_file(entry.path()) {
            continue;
        }

        let fullpath = entry.path().to_path_buf();
        let relative = fullpath
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| fullpath.clone());

        let filename = entry.file_name().to_string_lossy().into_owned();
        found.insert(filename, FileEntry::new(relative, fullpath, kind));
    }

    Ok(())
}

/// Scan the game and mod directories, sorted by relative path
pub fn scan_game_and_mod(
    game_dir: &Path,
    mod_dir: &Path,
    replace_paths: &[PathBuf],
) -> Result<Vec<FileEntry>, ScanError> {
    let replace_paths: Vec<PathBuf> = replace_paths
        .iter()
        .map(|p| p.components().collect::<PathBuf>())
        .collect();

    let mut found = HashMap::new();

    crate::log_info!("Scanning game folder", "path" => game_dir.display());
    walk_root(game_dir, FileKind::Vanilla, &replace_paths, &mut found)?;

    crate::log_info!("Scanning mod folder", "path" => mod_dir.display());
    walk_root(mod_dir, FileKind::Mod, &replace_paths, &mut found)?;

    let mut entries: Vec<FileEntry> = found.into_values().collect();
    entries.sort_by(|a, b| a.path().cmp(b.path()).then(a.kind().cmp(&b.kind())));

    crate::log_success!(
        codes::success::PROJECT_SCAN_COMPLETE,
        "Project scan completed",
        "files" => entries.len(),
        "mod_files" => entries.iter().filter(|e| e.kind() == FileKind::Mod).count()
    );

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_mod_overrides_vanilla_by_filename() {
        let game = tempdir().unwrap();
        let modd = tempdir().unwrap();

        write(game.path(), "common/traits/00_traits.txt", "a = 1");
        write(game.path(), "common/traits/01_traits.txt", "b = 1");
        write(modd.path(), "common/traits/00_traits.txt", "a = 2");
        write(game.path(), "readme.md", "not a script");

        let entries = scan_game_and_mod(game.path(), modd.path(), &[]).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path(), Path::new("common/traits/00_traits.txt"));
        assert_eq!(entries[0].kind(), FileKind::Mod);
        assert!(entries[0].fullpath().starts_with(modd.path()));
        assert_eq!(entries[1].kind(), FileKind::Vanilla);
    }

    #[test]
    fn test_replace_paths_skip_vanilla_subtree() {
        let game = tempdir().unwrap();
        let modd = tempdir().unwrap();

        write(game.path(), "history/characters/a.txt", "");
        write(game.path(), "history/titles/b.txt", "");
        write(modd.path(), "history/characters/c.txt", "");

        let replace = vec![PathBuf::from("history/characters")];
        let entries = scan_game_and_mod(game.path(), modd.path(), &replace).unwrap();

        let names: Vec<_> = entries.iter().filter_map(|e| e.filename()).collect();
        assert_eq!(names, vec!["c.txt", "b.txt"]);
    }

    #[test]
    fn test_missing_root() {
        let game = tempdir().unwrap();
        let missing = game.path().join("nope");

        assert_matches!(
            scan_game_and_mod(game.path(), &missing, &[]),
            Err(ScanError::MissingRoot { .. })
        );
    }
}
