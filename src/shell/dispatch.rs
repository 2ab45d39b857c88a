//! Background saves: each request runs on its own task and reports back over a channel

use std::sync::Arc;
use std::time::Instant;

use log::warn;
use tokio::sync::mpsc;

use super::session::Session;
use crate::error::SaveError;
use crate::snapshot::{RemoteSaver, Transport};

type SaveOutcome = Result<(), SaveError>;

/// Launches saves without blocking the session. Overlapping saves are
/// independent; nothing is coalesced or cancelled.
pub struct SaveDispatcher<T: Transport> {
    saver: Arc<RemoteSaver<T>>,
    tx: mpsc::UnboundedSender<SaveOutcome>,
    rx: mpsc::UnboundedReceiver<SaveOutcome>,
}

impl<T: Transport> SaveDispatcher<T> {
    pub fn new(saver: RemoteSaver<T>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { saver: Arc::new(saver), tx, rx }
    }

    /// Start a save of the session's current snapshot.
    ///
    /// Validation failures are recorded immediately and nothing is spawned.
    /// Returns whether a request was launched. Must be called inside a tokio
    /// runtime.
    pub fn dispatch(&self, session: &mut Session, now: Instant) -> bool {
        if let Err(e) = RemoteSaver::<T>::validate(session.meta()) {
            warn!("Save rejected: {}", e);
            session.record_save(&Err(e), now);
            return false;
        }

        let saver = Arc::clone(&self.saver);
        let tx = self.tx.clone();
        let meta = session.meta().clone();
        let inputs = session.inputs().clone();
        let results = *session.results();

        tokio::spawn(async move {
            let outcome = saver.save(&meta, &inputs, &results).await;
            // Receiver lives as long as the dispatcher
            let _ = tx.send(outcome);
        });
        true
    }

    /// Wait for the next launched save to finish
    pub async fn next_outcome(&mut self) -> Option<SaveOutcome> {
        self.rx.recv().await
    }

    /// Record every save that has already finished; returns how many
    pub fn apply_finished(&mut self, session: &mut Session, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            session.record_save(&outcome, now);
            applied += 1;
        }
        applied
    }
}
