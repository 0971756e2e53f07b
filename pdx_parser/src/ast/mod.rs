//! Syntax tree produced by the parser
//!
//! A file is a [`FileBlock`] of [`Field`]s. Each field's value is a [`BV`]:
//! a scalar token, a nested [`FieldBlock`], a [`TokenBlock`] list, or empty.

pub mod access;
pub mod nodes;

pub use nodes::{Field, FieldBlock, FileBlock, TokenBlock, BV};
