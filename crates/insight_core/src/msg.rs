#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a different analysis goal.
    GoalSelected(crate::AnalysisGoal),
    /// User edited the manual target input (debounced text).
    ManualSitesChanged(String),
    /// User toggled one discovered candidate on or off.
    CandidateToggled { id: String, selected: bool },
    /// Rendering layer asked for the candidate list to be (re)loaded.
    CandidatesRequested,
    /// Candidate fetch finished; degraded reads deliver an empty list.
    CandidatesLoaded(Vec<crate::CandidateSource>),
    /// User clicked Start Analysis.
    SubmitClicked,
    /// Delivery finished for the identified submission.
    SubmissionCompleted {
        submission: crate::SubmissionId,
        result: Result<crate::AnalysisResults, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
