//! `AnalysisUnit` (spec §6 Inputs): `(files, contents, file-set)`.
//!
//! The `file-set` of the original spec — a map from opaque source
//! positions to `(filename, line, column)` — is folded into [`SourcePos`]
//! itself in this model: every position the front end hands us already
//! carries its resolved filename/line/column, so there is no separate
//! interning table to thread through the passes.

use loopsentry_core::types::collections::FxHashMap;

use crate::ast::SourceFile;

/// One repository snapshot analyzed as a whole (spec glossary: "Unit").
#[derive(Debug, Clone, Default)]
pub struct AnalysisUnit {
    pub files: Vec<SourceFile>,
    /// File path → raw source text, used only for diagnostic quoting.
    pub contents: FxHashMap<String, String>,
}

impl AnalysisUnit {
    pub fn new(files: Vec<SourceFile>, contents: FxHashMap<String, String>) -> Self {
        Self { files, contents }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Total number of declared functions and interface methods across
    /// every file, used by [`AnalysisConfig::effective_max_functions`]
    /// gating.
    pub fn declared_function_count(&self) -> usize {
        self.files
            .iter()
            .map(|f| {
                f.decls
                    .iter()
                    .map(|d| match d {
                        crate::ast::Decl::Func(_) => 1,
                        crate::ast::Decl::Interface(i) => i.methods.len(),
                    })
                    .sum::<usize>()
            })
            .sum()
    }

    /// Extract the source text spanning `start_line..=end_line` of `path`,
    /// used to build the code quotation attached to a reported diagnostic
    /// (spec §6).
    pub fn quote(&self, path: &str, start_line: u32, end_line: u32) -> Option<String> {
        let content = self.contents.get(path)?;
        let start = start_line.max(1) as usize;
        let end = end_line.max(start_line) as usize;
        let lines: Vec<&str> = content.lines().collect();
        if start > lines.len() {
            return None;
        }
        let end = end.min(lines.len());
        Some(lines[start - 1..end].join("\n"))
    }
}
