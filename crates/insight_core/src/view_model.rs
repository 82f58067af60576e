use serde_json::Value;

use crate::{AnalysisGoal, ColumnSpec, RunStatus};

/// Projection of [`crate::AppState`] for a rendering layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub goal: AnalysisGoal,
    pub manual_sites: String,
    pub candidates: Vec<CandidateRowView>,
    pub run_status: RunStatus,
    pub error: Option<String>,
    pub results: Option<ResultsView>,
    pub submit_enabled: bool,
    pub dirty: bool,
}

/// One row of the selectable candidate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRowView {
    pub id: String,
    pub url: String,
    pub selected: bool,
}

/// Result table plus the optional auxiliary visual summary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsView {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Value>,
    pub wordcloud: Option<String>,
}
