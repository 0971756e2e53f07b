//! Diagnostics about the parsed input
//!
//! Lexer and parser never fail on bad input. They append
//! [`DiagnosticItem`]s to an [`ErrorManager`] and return a best-effort result.

pub mod diagnostic;
pub mod error_manager;
pub mod render;
pub mod severity;

pub use diagnostic::{DiagnosticItem, DiagnosticPointer};
pub use error_manager::ErrorManager;
pub use render::{render_diagnostic, render_diagnostic_with_tab_width};
pub use severity::Severity;
