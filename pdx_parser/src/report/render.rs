use super::diagnostic::DiagnosticItem;
use crate::config::compile_time;
use crate::files::{PathInterner, SourceCache};
use std::fmt::Write;

/// Render a diagnostic for a terminal:
///
/// ```text
/// path/to/file.txt:3:9: Error: message
///     scope:character = = 5
///                       ^
/// ```
///
/// Without a pointer only the `Severity: message` line is produced. The
/// excerpt is omitted when the source line cannot be loaded.
pub fn render_diagnostic(
    item: &DiagnosticItem,
    interner: &PathInterner,
    cache: &mut SourceCache,
) -> String {
    render_diagnostic_with_tab_width(item, interner, cache, compile_time::lexical::TAB_WIDTH)
}

/// As [`render_diagnostic`], for columns counted with a non-default tab width
pub fn render_diagnostic_with_tab_width(
    item: &DiagnosticItem,
    interner: &PathInterner,
    cache: &mut SourceCache,
    tab_width: u16,
) -> String {
    let Some(pointer) = item.pointer else {
        return item.to_string();
    };

    let location = pointer
        .loc
        .fullpath(interner)
        .unwrap_or_else(|_| format!("<unknown file {}>", pointer.loc.file_id));

    let mut out = format!("{location}: {item}");

    if pointer.loc.is_whole_file() {
        return out;
    }

    if let Some(line) = cache.line(interner, pointer.loc.file_id, pointer.loc.line) {
        let indent = caret_indent(line, pointer.loc.column, tab_width);
        let _ = write!(
            out,
            "\n    {line}\n    {indent}{}",
            "^".repeat(pointer.length.max(1))
        );
    }

    out
}

/// Whitespace that lines a caret up under `column`, echoing tabs so the
/// excerpt and the caret line expand the same way
fn caret_indent(line: &str, column: u16, tab_width: u16) -> String {
    let mut indent = String::new();
    let mut current: u32 = 1;
    for c in line.chars() {
        if current >= u32::from(column) {
            break;
        }
        if c == '\t' {
            indent.push('\t');
            current += u32::from(tab_width);
        } else {
            indent.push(' ');
            current += 1;
        }
    }
    indent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::{Loc, PathId};
    use crate::report::Severity;

    #[test]
    fn test_renders_excerpt_and_caret() {
        let interner = PathInterner::new();
        let id = interner.store("events/a.txt", "/mod/events/a.txt");
        let mut cache = SourceCache::new();
        cache.insert(id, "namespace = cooking\nentity = = 5\n");

        let item = DiagnosticItem::from_loc(Severity::Error, "bad operator", Loc::new(id, 2, 10), 1);
        let rendered = render_diagnostic(&item, &interner, &mut cache);

        assert_eq!(
            rendered,
            format!(
                "/mod/events/a.txt:2:10: Error: bad operator\n    entity = = 5\n    {}^",
                " ".repeat(9)
            )
        );
    }

    #[test]
    fn test_tab_indent_is_kept() {
        let interner = PathInterner::new();
        let id = interner.store("a.txt", "/a.txt");
        let mut cache = SourceCache::new();
        cache.insert(id, "\tkey = !");

        // '!' sits at column 11 once the tab expands to 4 columns
        let item = DiagnosticItem::from_loc(Severity::Critical, "x", Loc::new(id, 1, 11), 1);
        let rendered = render_diagnostic_with_tab_width(&item, &interner, &mut cache, 4);
        assert!(rendered.ends_with("\n    \tkey = !\n    \t      ^"));
    }

    #[test]
    fn test_without_pointer_or_source() {
        let interner = PathInterner::new();
        let mut cache = SourceCache::new();

        let bare = DiagnosticItem::new(Severity::Info, "note");
        assert_eq!(render_diagnostic(&bare, &interner, &mut cache), "Info: note");

        let unknown = DiagnosticItem::from_loc(Severity::Error, "lost", Loc::new(PathId::new(7), 1, 1), 2);
        assert_eq!(
            render_diagnostic(&unknown, &interner, &mut cache),
            "<unknown file 7>: Error: lost"
        );
    }
}
