use super::bom::strip_bom;
use super::interner::{PathId, PathInterner};
use std::collections::HashMap;

/// Source lines per file, loaded lazily for diagnostic excerpts
#[derive(Debug, Default)]
pub struct SourceCache {
    lines: HashMap<PathId, Vec<String>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with text that is already in memory
    pub fn insert(&mut self, id: PathId, source: &str) {
        self.lines.insert(id, split_lines(source));
    }

    /// 1-based line of a file; `None` if the file cannot be read or is too short
    pub fn line(&mut self, interner: &PathInterner, id: PathId, line: u32) -> Option<&str> {
        if !self.lines.contains_key(&id) {
            let fullpath = interner.lookup_fullpath(id).ok()?;
            let bytes = std::fs::read(fullpath).ok()?;
            let text = String::from_utf8_lossy(strip_bom(&bytes)).into_owned();
            self.lines.insert(id, split_lines(&text));
        }

        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        self.lines.get(&id)?.get(index).map(String::as_str)
    }
}

fn split_lines(source: &str) -> Vec<String> {
    source
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_from_disk_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "\u{feff}first\r\nsecond\n").unwrap();

        let interner = PathInterner::new();
        let id = interner.store("a.txt", &path);
        let mut cache = SourceCache::new();

        assert_eq!(cache.line(&interner, id, 1), Some("first"));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cache.line(&interner, id, 2), Some("second"));
        assert_eq!(cache.line(&interner, id, 3), None);
        assert_eq!(cache.line(&interner, id, 0), None);
    }

    #[test]
    fn test_in_memory_source() {
        let interner = PathInterner::new();
        let mut cache = SourceCache::new();
        cache.insert(PathId::new(9), "a = b\nc = d");

        assert_eq!(cache.line(&interner, PathId::new(9), 2), Some("c = d"));
        assert_eq!(cache.line(&interner, PathId::new(3), 1), None);
    }
}
