use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use tokio_util::sync::CancellationToken;

use crate::{ApiClient, ClientEvent, SubmissionId};

enum ClientCommand {
    LoadCandidates,
    SubmitAnalysis {
        submission: SubmissionId,
        goal: String,
        sites: String,
    },
}

/// Handle to the background delivery runtime.
///
/// Commands are executed as concurrent tasks on a dedicated tokio runtime;
/// outcomes come back as [`ClientEvent`]s through `try_recv`.
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<ClientEvent>>>,
    cancel: Arc<Mutex<CancellationToken>>,
}

impl ClientHandle {
    pub fn new(client: ApiClient) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(client);
        let cancel = Arc::new(Mutex::new(CancellationToken::new()));
        let cancel_source = cancel.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                let cancel = cancel_source
                    .lock()
                    .expect("lock cancel token")
                    .clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, cancel, event_tx).await;
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
            cancel,
        }
    }

    pub fn load_candidates(&self) {
        let _ = self.cmd_tx.send(ClientCommand::LoadCandidates);
    }

    pub fn submit(
        &self,
        submission: SubmissionId,
        goal: impl Into<String>,
        sites: impl Into<String>,
    ) {
        let _ = self.cmd_tx.send(ClientCommand::SubmitAnalysis {
            submission,
            goal: goal.into(),
            sites: sites.into(),
        });
    }

    /// Abandons every in-flight delivery at its next suspend point.
    /// Commands issued afterwards run under a fresh token.
    pub fn cancel_all(&self) {
        let mut guard = self.cancel.lock().expect("lock cancel token");
        let old = std::mem::replace(&mut *guard, CancellationToken::new());
        old.cancel();
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn handle_command(
    client: &ApiClient,
    command: ClientCommand,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::LoadCandidates => {
            let candidates = client.fetch_candidates(&cancel).await;
            let _ = event_tx.send(ClientEvent::CandidatesLoaded { candidates });
        }
        ClientCommand::SubmitAnalysis {
            submission,
            goal,
            sites,
        } => {
            let result = client.submit_analysis(&goal, &sites, &cancel).await;
            let _ = event_tx.send(ClientEvent::SubmissionCompleted { submission, result });
        }
    }
}
