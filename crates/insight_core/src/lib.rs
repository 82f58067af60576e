//! Insight core: pure submission state machine and view-model helpers.
mod effect;
mod goal;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use goal::AnalysisGoal;
pub use msg::Msg;
pub use state::{
    AnalysisResults, AppState, CandidateSource, ColumnSpec, RunState, RunStatus, SubmissionId,
};
pub use update::{update, EMPTY_TARGETS_MESSAGE};
pub use view_model::{AppViewModel, CandidateRowView, ResultsView};
