//! Archive fetcher (spec §6): retrieves a repository's source tree before
//! it can be parsed into an `AnalysisUnit`. Modeled as a trait boundary
//! only — per spec §1, a real network-backed fetcher, and the
//! parser/type-checker front end that turns its output into an
//! `AnalysisUnit`, are both out of scope for this crate.

use std::path::PathBuf;

use crate::sampler::RepoId;

#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("fetching {repo} is not implemented by this archive fetcher")]
    NotImplemented { repo: RepoId },
}

/// Retrieves the on-disk location of a repository's source tree, ready for
/// the (also out-of-scope) front end to parse into an `AnalysisUnit`.
pub trait ArchiveFetcher: Send + Sync {
    fn fetch(&self, repo: &RepoId) -> Result<PathBuf, FetchError>;
}

/// The only `ArchiveFetcher` this crate ships: documents the contract
/// without doing any fetching, since a real implementation (network I/O,
/// archive extraction) is out of scope here.
#[derive(Debug, Default)]
pub struct UnimplementedFetcher;

impl ArchiveFetcher for UnimplementedFetcher {
    fn fetch(&self, repo: &RepoId) -> Result<PathBuf, FetchError> {
        Err(FetchError::NotImplemented { repo: repo.clone() })
    }
}
