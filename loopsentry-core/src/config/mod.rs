//! Analysis configuration (spec §6 Allow-list, §7 `fail_fast`).

mod analysis_config;

pub use analysis_config::AnalysisConfig;
