use std::collections::BTreeSet;

use crate::{AppState, Effect, Msg};

/// Error recorded when a submission is attempted with no targets.
pub const EMPTY_TARGETS_MESSAGE: &str =
    "Please provide at least one target site before starting an analysis.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::GoalSelected(goal) => {
            state.set_goal(goal);
            Vec::new()
        }
        Msg::ManualSitesChanged(text) => {
            state.set_manual_sites(text);
            Vec::new()
        }
        Msg::CandidateToggled { id, selected } => {
            state.set_candidate_selected(&id, selected);
            Vec::new()
        }
        Msg::CandidatesRequested => vec![Effect::LoadCandidates],
        Msg::CandidatesLoaded(candidates) => {
            state.replace_candidates(candidates);
            Vec::new()
        }
        Msg::SubmitClicked => {
            // The union is recomputed fresh on every submission, never cached.
            let targets =
                effective_targets(state.manual_sites(), state.selected_candidate_urls());
            if targets.is_empty() {
                // Fail fast: no submission token is issued and no delivery happens.
                state.fail_validation(EMPTY_TARGETS_MESSAGE.to_string());
                Vec::new()
            } else {
                let submission = state.begin_submission();
                vec![Effect::SubmitAnalysis {
                    submission,
                    goal: state.goal(),
                    sites: targets.join("\n"),
                }]
            }
        }
        Msg::SubmissionCompleted { submission, result } => {
            state.complete_submission(submission, result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Union of manual lines and selected candidate urls: trimmed, blanks
/// dropped, duplicates removed by exact string equality, first-seen order.
fn effective_targets<'a>(manual: &'a str, selected: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut targets = Vec::new();
    for entry in manual.lines().chain(selected) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if seen.insert(entry.to_owned()) {
            targets.push(entry.to_owned());
        }
    }
    targets
}
