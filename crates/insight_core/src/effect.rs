#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the externally maintained candidate list.
    LoadCandidates,
    /// Deliver one analysis submission to the remote service.
    SubmitAnalysis {
        submission: crate::SubmissionId,
        goal: crate::AnalysisGoal,
        /// Newline-joined effective target set.
        sites: String,
    },
}
