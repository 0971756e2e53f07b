use super::diagnostic::DiagnosticItem;
use super::severity::Severity;

/// Append-only sink for the diagnostics of one lex or parse pass.
///
/// Items stay in insertion order. No deduplication or filtering happens
/// here; that belongs to whoever renders them.
#[derive(Debug, Default, Clone)]
pub struct ErrorManager {
    items: Vec<DiagnosticItem>,
}

impl ErrorManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<DiagnosticItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.items.iter().filter(|i| i.severity == severity).count()
    }

    /// Any Error or Critical item present
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity.is_failure())
    }
}

impl Extend<DiagnosticItem> for ErrorManager {
    fn extend<T: IntoIterator<Item = DiagnosticItem>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}
