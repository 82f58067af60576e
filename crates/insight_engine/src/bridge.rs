use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use insight_core::{AnalysisResults, CandidateSource, ColumnSpec, Effect, Msg};

use crate::{AnalysisPayload, ApiClient, ClientEvent, ClientHandle};

/// Executes core effects against the background client and feeds outcomes
/// back into the state machine as messages.
pub struct EffectRunner {
    handle: ClientHandle,
}

impl EffectRunner {
    pub fn new(client: ApiClient, msg_tx: mpsc::Sender<Msg>) -> Self {
        let handle = ClientHandle::new(client);
        let runner = Self { handle };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadCandidates => {
                    client_info!("LoadCandidates");
                    self.handle.load_candidates();
                }
                Effect::SubmitAnalysis {
                    submission,
                    goal,
                    sites,
                } => {
                    client_info!(
                        "SubmitAnalysis submission={} goal={} sites_len={}",
                        submission,
                        goal.code(),
                        sites.len()
                    );
                    self.handle.submit(submission, goal.code(), sites);
                }
            }
        }
    }

    /// Abandons deliveries the caller no longer wants (stale submissions).
    pub fn cancel_all(&self) {
        self.handle.cancel_all();
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let handle = self.handle.clone();
        thread::spawn(move || loop {
            if let Some(event) = handle.try_recv() {
                match event {
                    ClientEvent::CandidatesLoaded { candidates } => {
                        let candidates = candidates
                            .into_iter()
                            .map(|entry| CandidateSource {
                                id: entry.id,
                                url: entry.url,
                            })
                            .collect();
                        let _ = msg_tx.send(Msg::CandidatesLoaded(candidates));
                    }
                    ClientEvent::SubmissionCompleted { submission, result } => {
                        let result = match result {
                            Ok(payload) => Ok(map_results(payload)),
                            Err(error) => {
                                client_warn!("submission {} failed: {}", submission, error);
                                Err(error.to_string())
                            }
                        };
                        let _ = msg_tx.send(Msg::SubmissionCompleted { submission, result });
                    }
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_results(payload: AnalysisPayload) -> AnalysisResults {
    AnalysisResults {
        rows: payload.data,
        columns: payload
            .columns
            .into_iter()
            .map(|column| ColumnSpec {
                id: column.id,
                name: column.name,
            })
            .collect(),
        wordcloud: payload.wordcloud,
    }
}
