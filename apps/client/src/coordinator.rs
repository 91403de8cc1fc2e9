//! Request coordinator — the per-kind submission state machine.
//!
//! One submission = one spawned task = one HTTP call. Overlapping
//! submissions are permitted, including for the same kind; there is no
//! cancellation, so every request runs to completion and whichever resolves
//! last determines the stored artifact and the visible state
//! (last-completion-wins, by resolution order, not submission order).
//! Acceptable for a single-user client; pinned down by the tests below.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api_client::GenerationService;
use crate::errors::ClientError;
use crate::extract;
use crate::models::{ExtractedDocument, GenerationRequest, RequestKind};
use crate::notify::Severity;
use crate::store::ContentStore;

/// Presentation port. Keeps the coordinator free of rendering concerns; the
/// shell provides the terminal implementation, tests record the calls.
pub trait UiPort: Send + Sync {
    fn notify(&self, severity: Severity, message: String);
    fn show_loading(&self);
    fn hide_loading(&self);
    fn show_result(&self, kind: RequestKind, body: String);
}

/// Lifecycle of one form kind's submissions. Re-entrant: every state accepts
/// a new submission, which simply repeats the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

/// Shared loading assertion. Visibility is a function of "any submission in
/// flight", so the port is driven only on the 0↔1 transitions — a request
/// finishing while a sibling is still in flight must not hide the indicator.
struct LoadingGauge {
    in_flight: Mutex<usize>,
    ui: Arc<dyn UiPort>,
}

impl LoadingGauge {
    /// Asserts the indicator for one submission. The returned guard releases
    /// the assertion on drop, so every exit path — success, service error,
    /// transport failure — clears it.
    fn begin(self: Arc<Self>) -> LoadingGuard {
        {
            let mut in_flight = self.in_flight.lock().expect("loading gauge poisoned");
            *in_flight += 1;
            if *in_flight == 1 {
                self.ui.show_loading();
            }
        }
        LoadingGuard { gauge: self }
    }
}

struct LoadingGuard {
    gauge: Arc<LoadingGauge>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut in_flight = self.gauge.in_flight.lock().expect("loading gauge poisoned");
        *in_flight -= 1;
        if *in_flight == 0 {
            self.gauge.ui.hide_loading();
        }
    }
}

#[derive(Debug, Default)]
struct KindState {
    state: SubmissionState,
    // Monotone per-kind sequence, for log correlation only: resolution is
    // last-completion-wins regardless of sequence.
    next_seq: u64,
}

#[derive(Clone)]
pub struct RequestCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    service: Arc<dyn GenerationService>,
    store: Arc<ContentStore>,
    ui: Arc<dyn UiPort>,
    gauge: Arc<LoadingGauge>,
    kinds: Mutex<[KindState; 3]>,
}

fn slot(kind: RequestKind) -> usize {
    match kind {
        RequestKind::JobSearch => 0,
        RequestKind::Cv => 1,
        RequestKind::CoverLetter => 2,
    }
}

impl RequestCoordinator {
    pub fn new(
        service: Arc<dyn GenerationService>,
        store: Arc<ContentStore>,
        ui: Arc<dyn UiPort>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                service,
                store,
                gauge: Arc::new(LoadingGauge {
                    in_flight: Mutex::new(0),
                    ui: Arc::clone(&ui),
                }),
                ui,
                kinds: Mutex::new(Default::default()),
            }),
        }
    }

    /// Current submission state of `kind`.
    pub fn state(&self, kind: RequestKind) -> SubmissionState {
        self.inner.kinds.lock().expect("kind table poisoned")[slot(kind)].state
    }

    /// Starts one submission cycle. Always permitted, including while an
    /// earlier submission of the same kind is still in flight. The loading
    /// assertion is taken synchronously, before the task is scheduled.
    pub fn submit(&self, request: GenerationRequest) -> JoinHandle<()> {
        let kind = request.kind();
        let seq = {
            let mut kinds = self.inner.kinds.lock().expect("kind table poisoned");
            let entry = &mut kinds[slot(kind)];
            entry.state = SubmissionState::InFlight;
            entry.next_seq += 1;
            entry.next_seq
        };
        let guard = Arc::clone(&self.inner.gauge).begin();
        debug!(%kind, seq, "submission started");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.service.generate(&request).await;
            inner.resolve(kind, seq, outcome);
            drop(guard);
        })
    }
}

impl Inner {
    fn resolve(&self, kind: RequestKind, seq: u64, outcome: Result<Value, ClientError>) {
        {
            let mut kinds = self.kinds.lock().expect("kind table poisoned");
            kinds[slot(kind)].state = match &outcome {
                Ok(_) => SubmissionState::Succeeded,
                Err(_) => SubmissionState::Failed,
            };
        }

        match outcome {
            Ok(payload) => self.on_success(kind, seq, payload),
            Err(ClientError::Service(message)) => {
                debug!(%kind, seq, "service reported failure");
                let label = match kind {
                    RequestKind::JobSearch => "Search",
                    _ => "Generation",
                };
                self.ui
                    .notify(Severity::Error, format!("{label} failed: {message}"));
            }
            Err(err) => {
                debug!(%kind, seq, "transport failure");
                self.ui
                    .notify(Severity::Error, format!("Connection error: {err}"));
            }
        }
    }

    fn on_success(&self, kind: RequestKind, seq: u64, payload: Value) {
        debug!(%kind, seq, "submission resolved successfully");
        match kind {
            RequestKind::JobSearch => {
                // Search results are rendered, never stored.
                self.ui
                    .show_result(kind, extract::payload_text(&payload).into_owned());
            }
            RequestKind::Cv => {
                if extract::latex_span(&extract::payload_text(&payload)).is_none() {
                    warn!(seq, "response carries no LaTeX document markers, keeping the whole payload");
                }
                let document = extract::extract_latex(&payload);
                let body = document.text.clone();
                self.store.set_current(ExtractedDocument::Latex(document));
                self.ui.show_result(kind, body);
                self.ui.notify(
                    Severity::Success,
                    "CV generated successfully. Copy the LaTeX into Overleaf to compile it.".to_string(),
                );
            }
            RequestKind::CoverLetter => {
                let letter = extract::extract_letter(&payload);
                let body = letter.text.clone();
                self.store.set_current(ExtractedDocument::Letter(letter));
                self.ui.show_result(kind, body);
                self.ui
                    .notify(Severity::Success, "Cover letter generated successfully.".to_string());
            }
        }
    }
}
