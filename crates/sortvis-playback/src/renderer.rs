//! The rendering surface the playback core drives.
//!
//! The core only ever calls into a [`Renderer`]; nothing flows back.

use std::sync::{Arc, Mutex};

use sortvis_trace::VisualState;

/// Sink for the visual consequences of playback.
pub trait Renderer: Send + 'static {
    /// Apply a highlight to one bar.
    fn set_visual_state(&mut self, index: usize, state: VisualState);

    /// Update one bar's value; `height` is `value / current max`.
    fn set_value(&mut self, index: usize, value: u32, height: f64);

    /// Redraw every bar from scratch.
    fn snapshot_rendered(&mut self, values: &[u32]);

    /// The run is over and controls may be re-enabled.
    fn run_finished(&mut self) {}
}

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    VisualState { index: usize, state: VisualState },
    Value { index: usize, value: u32, height: f64 },
    Snapshot(Vec<u32>),
    RunFinished,
}

/// Renderer that keeps every call in memory.
///
/// Clones share the same log, so a handle kept outside the scheduler sees
/// what the scheduler rendered.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    calls: Arc<Mutex<Vec<RenderCall>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every call so far.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of `RunFinished` notifications received.
    pub fn finished_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RenderCall::RunFinished))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn push(&self, call: RenderCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }
}

impl Renderer for RecordingRenderer {
    fn set_visual_state(&mut self, index: usize, state: VisualState) {
        self.push(RenderCall::VisualState { index, state });
    }

    fn set_value(&mut self, index: usize, value: u32, height: f64) {
        self.push(RenderCall::Value { index, value, height });
    }

    fn snapshot_rendered(&mut self, values: &[u32]) {
        self.push(RenderCall::Snapshot(values.to_vec()));
    }

    fn run_finished(&mut self) {
        self.push(RenderCall::RunFinished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let recorder = RecordingRenderer::new();
        let mut handle = recorder.clone();

        handle.snapshot_rendered(&[1, 2]);
        handle.set_visual_state(0, VisualState::Pivot);
        handle.run_finished();

        assert_eq!(
            recorder.calls(),
            vec![
                RenderCall::Snapshot(vec![1, 2]),
                RenderCall::VisualState { index: 0, state: VisualState::Pivot },
                RenderCall::RunFinished,
            ]
        );
        assert_eq!(recorder.finished_count(), 1);

        recorder.clear();
        assert!(handle.calls().is_empty());
    }
}
