//! The playback session state machine.
//!
//! A [`PlaybackSession`] owns everything one sort run touches: the live
//! array, the per-index highlights and the trace cursor. It knows nothing
//! about time; the scheduler decides when each transition happens.
//!
//! ```text
//! Idle ──begin──▶ Running ──finish──▶ Finished
//!                    │
//!                    └────stop─────▶ Paused   (terminal for the run)
//! ```

use serde::{Deserialize, Serialize};
use sortvis_trace::{
    Algorithm, ArrayState, Trace, TraceEvent, TraceSummary, VisualState, VisualTable,
};
use tracing::trace;

use crate::error::{Error, Result};
use crate::renderer::Renderer;

/// Lifecycle of a single sort run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Created, no event dispatched yet
    #[default]
    Idle,
    /// Events are being dispatched
    Running,
    /// Stopped by the user; the run is over
    Paused,
    /// Every event dispatched and all bars marked sorted
    Finished,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Paused => write!(f, "Paused"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// A highlight to undo shortly after the event that set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRevert {
    pub indices: Vec<usize>,
    pub state: VisualState,
}

/// State owned by one sort run.
#[derive(Debug)]
pub struct PlaybackSession {
    algorithm: Algorithm,
    array: ArrayState,
    visuals: VisualTable,
    trace: Trace,
    state: SessionState,
    dispatched: usize,
    summary: TraceSummary,
}

impl PlaybackSession {
    /// Prepare a run of `algorithm` over `values`.
    pub fn new(algorithm: Algorithm, values: Vec<u32>) -> Self {
        let trace = algorithm.trace(&values);
        let visuals = VisualTable::new(values.len());
        Self {
            algorithm,
            array: ArrayState::new(values),
            visuals,
            trace,
            state: SessionState::Idle,
            dispatched: 0,
            summary: TraceSummary::default(),
        }
    }

    /// Swap in a hand-built trace.
    #[cfg(test)]
    pub(crate) fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = trace;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn array(&self) -> &ArrayState {
        &self.array
    }

    pub fn visuals(&self) -> &VisualTable {
        &self.visuals
    }

    /// Number of events dispatched so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Counts of the events dispatched so far.
    pub fn summary(&self) -> TraceSummary {
        self.summary
    }

    /// Move `Idle → Running`, clearing any highlight left on the renderer.
    pub fn begin(&mut self, renderer: &mut impl Renderer) -> bool {
        if self.state != SessionState::Idle {
            return false;
        }
        self.visuals.reset_all();
        for index in 0..self.visuals.len() {
            renderer.set_visual_state(index, VisualState::Normal);
        }
        self.state = SessionState::Running;
        true
    }

    /// Pull the next event from the trace. `None` once exhausted or not running.
    pub fn next_event(&mut self) -> Option<TraceEvent> {
        if !self.is_running() {
            return None;
        }
        self.trace.next()
    }

    /// Apply one event to the array and the renderer.
    ///
    /// Returns the highlight to revert later, if the event sets a transient
    /// one. Events arriving when the session is not running are discarded.
    pub fn dispatch(
        &mut self,
        event: TraceEvent,
        renderer: &mut impl Renderer,
    ) -> Result<Option<PendingRevert>> {
        if !self.is_running() {
            trace!(state = %self.state, kind = event.kind(), ?event, "discarding event");
            return Ok(None);
        }
        trace!(seq = self.dispatched, kind = event.kind(), ?event, "dispatch");

        let revert = match event {
            TraceEvent::Compare { i, j } => {
                self.array.apply(&event)?;
                Some(self.highlight(&[i, j], VisualState::Comparing, renderer))
            }
            TraceEvent::Swap { .. } | TraceEvent::Overwrite { .. } => {
                let changed = self.array.apply(&event)?;
                let revert = self.highlight(&changed, VisualState::Swapping, renderer);
                for &index in &changed {
                    let value = self.array.get(index).unwrap_or_default();
                    renderer.set_value(index, value, self.array.height_of(index));
                }
                Some(revert)
            }
            TraceEvent::PivotMark { index } => {
                self.array.apply(&event)?;
                Some(self.highlight(&[index], VisualState::Pivot, renderer))
            }
            TraceEvent::SortedMark { index } => {
                self.array.apply(&event)?;
                self.visuals.set(index, VisualState::Sorted);
                renderer.set_visual_state(index, VisualState::Sorted);
                None
            }
        };

        self.dispatched += 1;
        self.summary.record(&event);
        Ok(revert)
    }

    /// Undo a highlight, leaving indices that have since changed state alone.
    ///
    /// Skipped entirely unless the session is still running.
    pub fn revert(&mut self, revert: &PendingRevert, renderer: &mut impl Renderer) {
        if !self.is_running() {
            return;
        }
        for &index in &revert.indices {
            if self.visuals.get(index) == Some(revert.state) {
                self.visuals.set(index, VisualState::Normal);
                renderer.set_visual_state(index, VisualState::Normal);
            }
        }
    }

    /// Move `Running → Finished` and mark every bar sorted.
    pub fn finish(&mut self, renderer: &mut impl Renderer) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = SessionState::Finished;
        self.visuals.mark_all_sorted();
        for index in 0..self.visuals.len() {
            renderer.set_visual_state(index, VisualState::Sorted);
        }
        true
    }

    /// Move `Running → Paused`, resetting every highlight.
    ///
    /// The array keeps whatever values the last dispatched mutation left.
    pub fn stop(&mut self, renderer: &mut impl Renderer) -> Result<()> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }
        self.state = SessionState::Paused;
        self.visuals.reset_all();
        for index in 0..self.visuals.len() {
            renderer.set_visual_state(index, VisualState::Normal);
        }
        Ok(())
    }

    fn highlight(
        &mut self,
        indices: &[usize],
        state: VisualState,
        renderer: &mut impl Renderer,
    ) -> PendingRevert {
        for &index in indices {
            self.visuals.set(index, state);
            renderer.set_visual_state(index, state);
        }
        PendingRevert {
            indices: indices.to_vec(),
            state,
        }
    }
}
