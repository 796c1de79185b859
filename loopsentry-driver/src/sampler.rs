//! Repository sampler (spec §6): draws repositories to analyze from a
//! flat `owner,name` list, skipping anything already recorded in the
//! visited-units log. Grounded in the teacher's tolerant-line-parsing,
//! append-only-log style (`drift-core`'s config file loaders) and the
//! spec's own `sampler.go` `RepositorySampler`/`MutexWriter` — re-expressed
//! with plain `std::io` buffered readers/writers rather than a new `csv`
//! dependency, since the format is just two comma-separated fields.

use std::collections::{HashSet, VecDeque};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use loopsentry_core::errors::error_code;

/// `owner/name`, the unit of work the driver samples and marks visited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A source of units to analyze (spec §6): draw the next repository to
/// fetch and analyze, and record one as visited once its unit has run to
/// completion (whether or not it produced diagnostics) — or re-offer it if
/// the unit instead aborted on a structural pass error.
pub trait UnitSampler: Send + Sync {
    fn sample(&self) -> Option<RepoId>;
    fn mark_visited(&self, repo: &RepoId);
    /// Re-offer a repository whose unit aborted on a structural pass error
    /// (spec §5/§7) — put it back in the pool instead of marking it
    /// visited, so a later `sample()` can hand it out again.
    fn requeue(&self, repo: RepoId);
}

/// A `UnitSampler` backed by two delimited-text files: the full candidate
/// list and an append-only visited log. The unvisited pool lives in memory
/// behind one `Mutex` — sampling and the decision not to re-offer a
/// repository happen under the same critical section (spec §5).
pub struct FileBackedSampler {
    pool: Mutex<VecDeque<RepoId>>,
    visited_writer: Mutex<BufWriter<std::fs::File>>,
}

impl FileBackedSampler {
    /// Load `all_units_path`, subtract anything already present in
    /// `visited_units_path` (if it exists), and open the visited log for
    /// append.
    pub fn open(all_units_path: &Path, visited_units_path: &Path) -> std::io::Result<Self> {
        let all = read_repo_list(all_units_path)?;
        let visited: HashSet<RepoId> = if visited_units_path.exists() {
            read_repo_list(visited_units_path)?.into_iter().collect()
        } else {
            HashSet::new()
        };

        let pool: VecDeque<RepoId> = all.into_iter().filter(|r| !visited.contains(r)).collect();

        let file = OpenOptions::new().create(true).append(true).open(visited_units_path)?;

        Ok(Self {
            pool: Mutex::new(pool),
            visited_writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Number of repositories still unsampled, mostly useful for tests and
    /// progress reporting.
    pub fn remaining(&self) -> usize {
        self.pool.lock().expect("sampler pool mutex poisoned").len()
    }
}

impl UnitSampler for FileBackedSampler {
    fn sample(&self) -> Option<RepoId> {
        self.pool.lock().expect("sampler pool mutex poisoned").pop_front()
    }

    fn mark_visited(&self, repo: &RepoId) {
        let mut writer = self.visited_writer.lock().expect("visited writer mutex poisoned");
        if writeln!(writer, "{},{}", repo.owner, repo.name).is_err() {
            tracing::warn!(
                error_code = error_code::INPUT_FILE_SKIPPED,
                repo = %repo,
                "failed to append to visited-units log"
            );
            return;
        }
        let _ = writer.flush();
    }

    fn requeue(&self, repo: RepoId) {
        self.pool.lock().expect("sampler pool mutex poisoned").push_back(repo);
    }
}

/// Parse one `owner,name` line. Blank lines are silently skipped; anything
/// else malformed is skipped and logged rather than aborting the whole
/// load.
fn parse_line(line: &str) -> Option<RepoId> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (owner, name) = line.split_once(',')?;
    let (owner, name) = (owner.trim(), name.trim());
    if owner.is_empty() || name.is_empty() {
        return None;
    }
    Some(RepoId::new(owner, name))
}

fn read_repo_list(path: &Path) -> std::io::Result<Vec<RepoId>> {
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(repo) => out.push(repo),
            None => {
                tracing::warn!(
                    error_code = error_code::INPUT_FILE_SKIPPED,
                    line = lineno + 1,
                    path = %path.display(),
                    "skipping malformed repository list line"
                );
            }
        }
    }
    Ok(out)
}
