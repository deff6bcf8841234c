//! Non-fatal analysis diagnostics.
//!
//! The core never throws out of a phase boundary; instead
//! every phase accumulates [`Diagnostic`]s on [`crate::context::AnalysisContext`]
//! and keeps going. Only configuration errors (an unknown strategy name) are
//! fatal, and those are reported through [`crate::config::UnknownStrategyError`]
//! instead of this enum.

use std::fmt;

use crate::ast::Span;
use crate::ids::FileId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A source file failed to parse. The file is omitted entirely; nothing
    /// downstream ever sees its AST.
    ParseFailure { file: FileId, message: String },
    /// A construct the decorator or edge builder does not model precisely
    /// (computed method keys, a method key that isn't a valid identifier,
    /// unsupported Vue SFC syntax). Analysis continues with a best-effort,
    /// usually-anonymous, stand-in.
    UnsupportedConstruct {
        file: FileId,
        span: Span,
        detail: String,
    },
    /// A module specifier could not be resolved against the file set. The
    /// importing binding is left connected only to `Unknown`.
    UnresolvedModule { importer: FileId, specifier: String },
    /// A `let`/`const`/`class` binding shadowed an existing binding in the
    /// same block scope. The first binding wins; this is a diagnostic, not
    /// a fatal error.
    DuplicateBinding {
        file: FileId,
        span: Span,
        name: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseFailure { file, message } => {
                write!(f, "parse failure in file {file}: {message}")
            }
            Self::UnsupportedConstruct { file, detail, .. } => {
                write!(f, "unsupported construct in file {file}: {detail}")
            }
            Self::UnresolvedModule { importer, specifier } => {
                write!(f, "file {importer} imports unresolved module \"{specifier}\"")
            }
            Self::DuplicateBinding { file, name, .. } => {
                write!(f, "duplicate binding \"{name}\" in file {file}")
            }
        }
    }
}

impl std::error::Error for Diagnostic {}

/// An append-only log of diagnostics collected across all phases. Order is
/// insertion order, matching the determinism requirement that applies to
/// every other iteration in the crate.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
