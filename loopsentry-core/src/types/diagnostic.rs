//! `Diagnostic` (spec §3/§6).

use crate::types::position::{SourcePos, Span};

/// Supplementary information attached to a `Diagnostic`. `related[0]` is
/// always the file path of the site (spec §6); `related[1]`, if present,
/// carries pass-specific supplementary text (e.g. the callee that forwards
/// the reference to a goroutine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Related {
    pub message: String,
}

impl Related {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn file_path(path: impl Into<String>) -> Self {
        Self::new(path)
    }
}

/// A single finding emitted by `LoopPointer` or `LoopClosure` (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub message: String,
    pub related: Vec<Related>,
}

impl Diagnostic {
    pub fn new(span: Span, message: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            related: vec![Related::file_path(file_path)],
        }
    }

    /// Attach the optional second `related` entry (supplementary text).
    pub fn with_supplementary(mut self, text: impl Into<String>) -> Self {
        self.related.push(Related::new(text));
        self
    }

    pub fn file_path(&self) -> Option<&str> {
        self.related.first().map(|r| r.message.as_str())
    }

    pub fn supplementary(&self) -> Option<&str> {
        self.related.get(1).map(|r| r.message.as_str())
    }

    pub fn start(&self) -> &SourcePos {
        &self.span.start
    }

    pub fn end(&self) -> &SourcePos {
        &self.span.end
    }
}
