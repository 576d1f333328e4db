use crate::core::models::recommendation::{Narrative, ReExplainRequest};
use crate::core::sequencer::RequestSequencer;
use crate::infrastructure::optimizer::Optimizer;
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
pub struct SequencedNarrative {
    pub sequence: u64,
    pub narrative: Narrative,
}

/// Runs re-explain calls in the background and keeps only the newest answer.
///
/// Each dispatch supersedes every earlier one. A slow answer for an older edit that
/// arrives after a newer one is dropped instead of overwriting it.
pub struct ExplainCoordinator<O: Optimizer> {
    optimizer: Arc<O>,
    sequencer: Arc<RequestSequencer>,
    current: Arc<RwLock<Option<SequencedNarrative>>>,
}

impl<O: Optimizer + 'static> ExplainCoordinator<O> {
    pub fn new(optimizer: Arc<O>) -> Self {
        ExplainCoordinator {
            optimizer,
            sequencer: Arc::new(RequestSequencer::new()),
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub fn dispatch(&self, request: ReExplainRequest) -> (u64, JoinHandle<()>) {
        let sequence = self.sequencer.issue();
        let optimizer = Arc::clone(&self.optimizer);
        let sequencer = Arc::clone(&self.sequencer);
        let current = Arc::clone(&self.current);

        let handle = tokio::spawn(async move {
            let narrative = match optimizer.re_explain(&request).await {
                Ok(narrative) => narrative,
                Err(e) => {
                    warn!("Re-explain {} failed, keeping previous text: {}", sequence, e);
                    return;
                }
            };
            let mut slot = current.write().await;
            // Checked under the lock so a newer answer stored first is never replaced.
            if !sequencer.is_latest(sequence) {
                debug!("Discarding stale re-explain {} (latest {})", sequence, sequencer.latest());
                return;
            }
            *slot = Some(SequencedNarrative { sequence, narrative });
        });
        (sequence, handle)
    }

    /// Invalidates any in-flight answer, e.g. after a reset or cancel.
    pub async fn supersede(&self) -> u64 {
        let sequence = self.sequencer.issue();
        *self.current.write().await = None;
        sequence
    }

    pub async fn current(&self) -> Option<SequencedNarrative> {
        self.current.read().await.clone()
    }
}
