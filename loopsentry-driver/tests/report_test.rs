use loopsentry_analysis::AnalysisUnit;
use loopsentry_core::types::position::{SourcePos, Span};
use loopsentry_core::types::collections::FxHashMap;
use loopsentry_core::Diagnostic;
use loopsentry_driver::{permalink, render_finding, PermalinkConfig};

fn config() -> PermalinkConfig {
    PermalinkConfig {
        origin: "https://github.com".to_string(),
        owner: "acme".to_string(),
        name: "widgets".to_string(),
        commit: "deadbeef".to_string(),
    }
}

fn diagnostic() -> Diagnostic {
    Diagnostic::new(
        Span::new(SourcePos::new("main.go", 10, 2, 0), SourcePos::new("main.go", 12, 3, 0)),
        "function call at line 11 may store a reference to v",
        "main.go",
    )
}

#[test]
fn permalink_has_the_expected_shape() {
    let link = permalink(&config(), &diagnostic());
    assert_eq!(link, "https://github.com/acme/widgets/blob/deadbeef/main.go#L10-L12");
}

#[test]
fn render_finding_includes_the_quoted_source_when_available() {
    let mut contents = FxHashMap::default();
    contents.insert(
        "main.go".to_string(),
        "func caller() {\n\tfor _, v := range items {\n\t\tsink(&v)\n\t}\n}".to_string(),
    );
    let unit = AnalysisUnit::new(vec![], contents);

    let diag = Diagnostic::new(
        Span::new(SourcePos::new("main.go", 2, 2, 0), SourcePos::new("main.go", 3, 3, 0)),
        "function call at line 3 may store a reference to v",
        "main.go",
    );

    let rendered = render_finding(&config(), &unit, &diag);
    assert!(rendered.contains("may store a reference to v"));
    assert!(rendered.contains("https://github.com/acme/widgets/blob/deadbeef/main.go#L2-L3"));
    assert!(rendered.contains("```go"));
    assert!(rendered.contains("sink(&v)"));
}

#[test]
fn render_finding_falls_back_to_no_quote_when_source_is_unavailable() {
    let unit = AnalysisUnit::new(vec![], FxHashMap::default());
    let rendered = render_finding(&config(), &unit, &diagnostic());

    assert!(!rendered.contains("```"));
    assert!(rendered.contains("may store a reference to v"));
}
