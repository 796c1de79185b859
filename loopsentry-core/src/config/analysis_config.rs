//! Configuration for one analysis run.

use serde::{Deserialize, Serialize};

use crate::constants::default_allow_list;

/// Configuration for the analysis pipeline.
///
/// Every field is optional so a TOML file only needs to override what it
/// cares about; `effective_*` accessors provide the defaults, following the
/// teacher's `ScanConfig` convention.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fully-qualified external callees assumed not to retain pointer
    /// arguments (spec §6 Allow-list). `None` means "use the built-in
    /// default list"; `Some(vec![])` means "no allow-list at all".
    pub allow_list: Option<Vec<String>>,
    /// Maximum number of declared functions a unit may contain before it
    /// is rejected with `StructuralError::UnitTooLarge` rather than
    /// analyzed (spec §6, mirrors the teacher's `in_memory_threshold`).
    pub max_functions: Option<usize>,
    /// When true, a non-structural pass error aborts the unit instead of
    /// letting downstream passes run on a partial result (spec §7 default:
    /// false).
    pub fail_fast: Option<bool>,
    /// Number of worker threads the driver's pool should use. 0 = let
    /// rayon auto-detect.
    pub worker_threads: Option<usize>,
}

impl AnalysisConfig {
    /// The effective allow-list: the configured list, or the built-in
    /// default (formatted printers/loggers) if unset.
    pub fn effective_allow_list(&self) -> Vec<String> {
        self.allow_list
            .clone()
            .unwrap_or_else(default_allow_list)
    }

    /// The effective unit-size cap, defaulting to 500_000 functions —
    /// the same order of magnitude as the teacher's `in_memory_threshold`.
    pub fn effective_max_functions(&self) -> usize {
        self.max_functions.unwrap_or(500_000)
    }

    /// Whether a non-structural pass failure should abort the unit.
    /// Default: false (best-effort, spec §7).
    pub fn effective_fail_fast(&self) -> bool {
        self.fail_fast.unwrap_or(false)
    }

    /// The effective worker thread count, 0 meaning auto-detect.
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or(0)
    }

    /// Parse a config from TOML source.
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_fallbacks() {
        let config = AnalysisConfig::default();
        assert_eq!(config.effective_allow_list(), default_allow_list());
        assert_eq!(config.effective_max_functions(), 500_000);
        assert!(!config.effective_fail_fast());
        assert_eq!(config.effective_worker_threads(), 0);
    }

    #[test]
    fn an_explicit_empty_allow_list_is_not_the_same_as_unset() {
        let config = AnalysisConfig {
            allow_list: Some(Vec::new()),
            ..Default::default()
        };
        assert!(config.effective_allow_list().is_empty());
    }

    #[test]
    fn from_toml_only_overrides_the_fields_present() {
        let config = AnalysisConfig::from_toml("max_functions = 10\n").unwrap();
        assert_eq!(config.effective_max_functions(), 10);
        assert_eq!(config.effective_allow_list(), default_allow_list());
    }

    #[test]
    fn from_toml_rejects_malformed_input() {
        assert!(AnalysisConfig::from_toml("max_functions = \"not a number\"").is_err());
    }
}
