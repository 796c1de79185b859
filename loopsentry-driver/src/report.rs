//! Permalink + quote rendering (spec §6): turns a `Diagnostic` into the
//! text an issue comment or CLI report would show, grounded in the
//! teacher's `report_test.rs` (`drift-bench`), which exercises the same
//! link-plus-snippet shape for its own findings.

use loopsentry_analysis::AnalysisUnit;
use loopsentry_core::Diagnostic;

/// Identifies the hosted commit a set of diagnostics was produced against,
/// needed to build a stable permalink (spec §6).
#[derive(Debug, Clone)]
pub struct PermalinkConfig {
    pub origin: String,
    pub owner: String,
    pub name: String,
    pub commit: String,
}

/// `<origin>/<owner>/<name>/blob/<commit>/<path>#L<start>-L<end>` (spec
/// §6).
pub fn permalink(config: &PermalinkConfig, diagnostic: &Diagnostic) -> String {
    let path = diagnostic.file_path().unwrap_or_default();
    let start = diagnostic.start().line;
    let end = diagnostic.end().line;
    format!(
        "{}/{}/{}/blob/{}/{}#L{}-L{}",
        config.origin, config.owner, config.name, config.commit, path, start, end
    )
}

/// The full body of one reported finding: its message, permalink, and the
/// quoted source it points at (empty unit contents quietly drop the
/// quote rather than render an empty code fence).
pub fn render_finding(config: &PermalinkConfig, unit: &AnalysisUnit, diagnostic: &Diagnostic) -> String {
    let link = permalink(config, diagnostic);
    let path = diagnostic.file_path().unwrap_or_default();
    let quote = unit.quote(path, diagnostic.start().line, diagnostic.end().line);

    match quote {
        Some(quote) if !quote.is_empty() => {
            format!("{}\n{}\n```go\n{}\n```", diagnostic.message, link, quote)
        }
        _ => format!("{}\n{}", diagnostic.message, link),
    }
}
