//! WebSocket rendering.
//!
//! [`BroadcastRenderer`] turns every renderer call into a [`RenderCommand`]
//! and publishes it to all connected browsers.

use serde::Serialize;
use sortvis_playback::{Renderer, VisualState};
use tokio::sync::broadcast;
use tracing::trace;

/// Capacity of the command channel. Slow clients past this resync from a
/// fresh snapshot.
pub const CHANNEL_CAPACITY: usize = 1024;

/// Messages streamed to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Full redraw
    Snapshot {
        values: Vec<u32>,
        visuals: Vec<VisualState>,
    },
    /// Highlight change on one bar
    Visual { index: usize, state: VisualState },
    /// Value change on one bar
    Value {
        index: usize,
        value: u32,
        height: f64,
    },
    /// The run is over
    RunFinished,
}

/// Renderer that fans commands out over a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastRenderer {
    tx: broadcast::Sender<RenderCommand>,
}

impl BroadcastRenderer {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Receive every command published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RenderCommand> {
        self.tx.subscribe()
    }

    fn publish(&self, command: RenderCommand) {
        // No receivers just means no browser is connected.
        if self.tx.send(command).is_err() {
            trace!("render command dropped, no subscribers");
        }
    }
}

impl Default for BroadcastRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for BroadcastRenderer {
    fn set_visual_state(&mut self, index: usize, state: VisualState) {
        self.publish(RenderCommand::Visual { index, state });
    }

    fn set_value(&mut self, index: usize, value: u32, height: f64) {
        self.publish(RenderCommand::Value {
            index,
            value,
            height,
        });
    }

    fn snapshot_rendered(&mut self, values: &[u32]) {
        self.publish(RenderCommand::Snapshot {
            values: values.to_vec(),
            visuals: vec![VisualState::Normal; values.len()],
        });
    }

    fn run_finished(&mut self) {
        self.publish(RenderCommand::RunFinished);
    }
}
