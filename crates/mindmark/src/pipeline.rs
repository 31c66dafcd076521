//! The debounced recompute pipeline.
//!
//! Every change of the source text schedules a regeneration of the tree.
//! Regeneration waits for a quiet period first; a newer change restarts the
//! wait, so a burst of keystrokes costs a single parse of the final text.
//!
//! Each scheduled regeneration is tagged with a generation number. A parse
//! that completes after a newer change was scheduled is discarded instead of
//! being published, so results can never land out of order.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use log::{debug, trace};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use mindmark_core::{layout::RetainedLayout, node::DiagramNode};

use crate::{
    parser::{SourceParser, parse_source},
    state::{StateStore, StateUpdate},
};

#[derive(Debug, Default)]
struct Schedule {
    generation: u64,
    retained: RetainedLayout,
}

struct Shared {
    store: StateStore,
    parser: Arc<dyn SourceParser>,
    debounce: Duration,
    schedule: Mutex<Schedule>,
}

impl Shared {
    /// Publishes `roots` if `generation` is still the latest one.
    fn publish(&self, generation: u64, mut roots: Vec<DiagramNode>) -> bool {
        let mut schedule = self.schedule.lock();
        if schedule.generation != generation {
            debug!(generation, latest = schedule.generation; "Discarding stale parse result");
            return false;
        }

        // Capture before replacing: an empty result must not lose the layout.
        schedule.retained.observe(self.store.snapshot().children());
        if !roots.is_empty() {
            schedule.retained.apply(&mut roots);
        }
        debug!(generation, roots = roots.len(); "Publishing regenerated tree");
        self.store.update(StateUpdate::new().children(roots));
        true
    }
}

struct PendingTimer {
    handle: JoinHandle<()>,
    parsing: Arc<AtomicBool>,
}

/// Turns source text changes into tree updates on a [`StateStore`].
///
/// Scheduling spawns onto the current Tokio runtime.
pub struct RecomputePipeline {
    shared: Arc<Shared>,
    pending: Option<PendingTimer>,
}

impl RecomputePipeline {
    pub fn new(store: StateStore, parser: Arc<dyn SourceParser>, debounce: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                parser,
                debounce,
                schedule: Mutex::new(Schedule::default()),
            }),
            pending: None,
        }
    }

    /// The quiet period before a scheduled parse runs.
    pub fn debounce(&self) -> Duration {
        self.shared.debounce
    }

    /// Generation of the most recently scheduled regeneration.
    pub fn generation(&self) -> u64 {
        self.shared.schedule.lock().generation
    }

    /// Whether a scheduled regeneration has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    /// Schedules a regeneration of the tree from `text`.
    ///
    /// Replaces any regeneration that is still waiting. Blank text is not
    /// debounced: the tree is cleared right away and the retained layout is
    /// forgotten.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn schedule(&mut self, text: &str) {
        self.cancel();

        let generation = {
            let mut schedule = self.shared.schedule.lock();
            schedule.generation += 1;
            if text.trim().is_empty() {
                schedule.retained.clear();
                None
            } else {
                Some(schedule.generation)
            }
        };

        let Some(generation) = generation else {
            debug!("Source text is empty, clearing tree");
            self.shared.store.update(StateUpdate::new().children(Vec::new()));
            return;
        };

        trace!(generation, len = text.len(); "Scheduling regeneration");
        let shared = Arc::clone(&self.shared);
        let parsing = Arc::new(AtomicBool::new(false));
        let started = Arc::clone(&parsing);
        let text = text.to_string();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            started.store(true, Ordering::SeqCst);
            let roots = parse_source(shared.parser.as_ref(), &text).await;
            shared.publish(generation, roots);
        });

        self.pending = Some(PendingTimer { handle, parsing });
    }

    /// Cancels a regeneration that is still waiting out its quiet period.
    ///
    /// A parse that already started runs to completion; the generation check
    /// discards its result if it has been superseded.
    pub fn cancel(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        if !pending.parsing.load(Ordering::SeqCst) {
            pending.handle.abort();
        }
    }
}

impl Drop for RecomputePipeline {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}
