use std::collections::BTreeSet;

use serde_json::Value;

use crate::view_model::{AppViewModel, CandidateRowView, ResultsView};
use crate::AnalysisGoal;

/// Token identifying one submission. Monotonically increasing; only the
/// completion carrying the latest issued token may update run state.
pub type SubmissionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Externally discovered analysis target, individually selectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSource {
    pub id: String,
    pub url: String,
}

/// Column descriptor for the tabular result payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub id: String,
    pub name: String,
}

/// Payload of a successful run, stored verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisResults {
    pub rows: Vec<Value>,
    pub columns: Vec<ColumnSpec>,
    pub wordcloud: Option<String>,
}

/// One submission's lifecycle and outcome. Replaced wholesale per run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunState {
    pub status: RunStatus,
    pub results: Option<AnalysisResults>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    goal: AnalysisGoal,
    manual_sites: String,
    candidates: Vec<CandidateSource>,
    selected: BTreeSet<String>,
    run: RunState,
    last_submission: SubmissionId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn goal(&self) -> AnalysisGoal {
        self.goal
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            goal: self.goal,
            manual_sites: self.manual_sites.clone(),
            candidates: self
                .candidates
                .iter()
                .map(|candidate| CandidateRowView {
                    id: candidate.id.clone(),
                    url: candidate.url.clone(),
                    selected: self.selected.contains(&candidate.id),
                })
                .collect(),
            run_status: self.run.status,
            error: self.run.error.clone(),
            results: self.run.results.as_ref().map(|results| ResultsView {
                columns: results.columns.clone(),
                rows: results.rows.clone(),
                wordcloud: results.wordcloud.clone(),
            }),
            submit_enabled: self.run.status != RunStatus::Running,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn manual_sites(&self) -> &str {
        &self.manual_sites
    }

    /// Urls of candidates currently toggled on, in candidate-list order.
    pub(crate) fn selected_candidate_urls(&self) -> impl Iterator<Item = &str> {
        self.candidates
            .iter()
            .filter(|candidate| self.selected.contains(&candidate.id))
            .map(|candidate| candidate.url.as_str())
    }

    pub(crate) fn set_goal(&mut self, goal: AnalysisGoal) {
        if self.goal != goal {
            self.goal = goal;
            self.dirty = true;
        }
    }

    pub(crate) fn set_manual_sites(&mut self, text: String) {
        if self.manual_sites != text {
            self.manual_sites = text;
            self.dirty = true;
        }
    }

    /// Toggles a candidate; ids not in the current list are ignored.
    pub(crate) fn set_candidate_selected(&mut self, id: &str, selected: bool) {
        if !self.candidates.iter().any(|candidate| candidate.id == id) {
            return;
        }
        let changed = if selected {
            self.selected.insert(id.to_owned())
        } else {
            self.selected.remove(id)
        };
        if changed {
            self.dirty = true;
        }
    }

    /// Replaces the candidate list, keeping selections for ids still present.
    pub(crate) fn replace_candidates(&mut self, candidates: Vec<CandidateSource>) {
        let present: BTreeSet<&str> = candidates
            .iter()
            .map(|candidate| candidate.id.as_str())
            .collect();
        self.selected.retain(|id| present.contains(id.as_str()));
        self.candidates = candidates;
        self.dirty = true;
    }

    /// Issues a fresh submission token and moves the run to `Running`.
    pub(crate) fn begin_submission(&mut self) -> SubmissionId {
        self.last_submission += 1;
        self.run = RunState {
            status: RunStatus::Running,
            results: None,
            error: None,
        };
        self.dirty = true;
        self.last_submission
    }

    /// Fails the run before any delivery was attempted.
    pub(crate) fn fail_validation(&mut self, message: String) {
        self.run = RunState {
            status: RunStatus::Failed,
            results: None,
            error: Some(message),
        };
        self.dirty = true;
    }

    /// Records a completed delivery. Completions for anything but the latest
    /// issued token are stale and discarded; returns whether it was applied.
    pub(crate) fn complete_submission(
        &mut self,
        submission: SubmissionId,
        result: Result<AnalysisResults, String>,
    ) -> bool {
        if submission != self.last_submission {
            return false;
        }
        self.run = match result {
            Ok(results) => RunState {
                status: RunStatus::Succeeded,
                results: Some(results),
                error: None,
            },
            Err(message) => RunState {
                status: RunStatus::Failed,
                results: None,
                error: Some(message),
            },
        };
        self.dirty = true;
        true
    }
}
