//! Per-repository outcomes of a command.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::RepoId;
use crate::resolver::{ResolveError, WalkReport};

/// Results of a fan-out operation, keyed by repository.
pub type NodeResults<T> = BTreeMap<RepoId, Result<T, ResolveError>>;

/// What happened to one repository.
#[derive(Debug, Clone)]
pub enum NodeOutcome {
    /// The operation did its work; carries a short detail line
    Succeeded(String),
    /// There was nothing to work on
    Skipped(String),
    /// A collaborator failed
    Failed(ResolveError),
}

impl NodeOutcome {
    /// Classify an error: unavailable repositories are skipped, the rest failed.
    pub fn from_error(err: ResolveError) -> Self {
        if err.is_unavailable() {
            NodeOutcome::Skipped(err.to_string())
        } else {
            NodeOutcome::Failed(err)
        }
    }

    /// Classify a result, describing successes with `detail`.
    pub fn from_result<T>(result: Result<T, ResolveError>, detail: impl FnOnce(T) -> String) -> Self {
        match result {
            Ok(value) => NodeOutcome::Succeeded(detail(value)),
            Err(err) => NodeOutcome::from_error(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, NodeOutcome::Failed(_))
    }
}

/// Outcomes of one command across the graph.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    outcomes: BTreeMap<RepoId, NodeOutcome>,
}

impl Summary {
    pub fn new() -> Self {
        Summary::default()
    }

    /// Record the outcome for `repo`, replacing any earlier one.
    pub fn record(&mut self, repo: RepoId, outcome: NodeOutcome) {
        self.outcomes.insert(repo, outcome);
    }

    /// Record every failure of a walk.
    pub fn record_walk_failures(&mut self, report: &WalkReport) {
        for (repo, err) in &report.failures {
            self.record(repo.clone(), NodeOutcome::from_error(err.clone()));
        }
    }

    /// Record fan-out results, describing successes with `detail`.
    pub fn record_results<T>(&mut self, results: NodeResults<T>, detail: impl Fn(T) -> String) {
        for (repo, result) in results {
            self.record(repo, NodeOutcome::from_result(result, &detail));
        }
    }

    /// Outcome of one repository.
    pub fn get(&self, repo: &RepoId) -> Option<&NodeOutcome> {
        self.outcomes.get(repo)
    }

    /// All outcomes, ordered by repository.
    pub fn iter(&self) -> impl Iterator<Item = (&RepoId, &NodeOutcome)> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Succeeded(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, NodeOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(NodeOutcome::is_failed)
    }

    /// Whether no repository failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&NodeOutcome) -> bool) -> usize {
        self.outcomes.values().filter(|o| pred(o)).count()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded(),
            self.skipped(),
            self.failed()
        )
    }
}
