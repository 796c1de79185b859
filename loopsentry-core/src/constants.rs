//! Built-in defaults (spec §9 "Allow-list representation").

/// Fully-qualified external callees known not to retain their arguments
/// beyond the call. Kept intentionally small — the original implementation
/// lists formatted printers/loggers whose receivers treat arguments as
/// read-only.
pub fn default_allow_list() -> Vec<String> {
    vec![
        "fmt.Println".to_string(),
        "fmt.Printf".to_string(),
        "fmt.Print".to_string(),
        "fmt.Sprintf".to_string(),
        "fmt.Sprint".to_string(),
        "fmt.Fprintf".to_string(),
        "fmt.Fprintln".to_string(),
        "log.Println".to_string(),
        "log.Printf".to_string(),
        "log.Print".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allow_list_has_no_duplicates() {
        let list = default_allow_list();
        let unique: std::collections::HashSet<_> = list.iter().collect();
        assert_eq!(unique.len(), list.len());
    }

    #[test]
    fn default_allow_list_only_names_fmt_and_log_printers() {
        for name in default_allow_list() {
            assert!(name.starts_with("fmt.") || name.starts_with("log."), "unexpected entry: {name}");
        }
    }
}
