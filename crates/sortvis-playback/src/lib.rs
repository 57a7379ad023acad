//! SortVis Playback
//!
//! Replays sorting traces against a live array and a [`Renderer`] at a
//! configurable cadence.
//!
//! # Architecture
//!
//! - **Session**: owns the array, highlights and trace cursor of one run
//! - **Scheduler**: drives a session on the tokio timer, one task per run
//! - **Cancellation**: per-run tokens so a stopped run never acts again
//! - **Renderer**: the sink every visual change is reported to
//!
//! # Usage
//!
//! ```ignore
//! let scheduler = PlaybackScheduler::new(renderer, PlaybackConfig::default());
//! scheduler.start_run(Algorithm::Merge, values, SpeedPreset::Fast.step_delay()).await?;
//! // ... later, from a control handler
//! scheduler.stop_run().await?;
//! ```

mod cancel;
mod config;
mod error;
mod renderer;
mod scheduler;
mod session;

pub use cancel::{CancelSource, RunToken};
pub use config::{PlaybackConfig, SpeedPreset};
pub use error::{Error, Result};
pub use renderer::{RecordingRenderer, RenderCall, Renderer};
pub use scheduler::{PlaybackScheduler, SessionStatus};
pub use session::{PendingRevert, PlaybackSession, SessionState};

pub use sortvis_trace::{Algorithm, VisualState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_replays_whole_trace() {
        let mut renderer = RecordingRenderer::new();
        let mut session = PlaybackSession::new(Algorithm::Quick, vec![5, 3, 1, 4, 2]);
        session.begin(&mut renderer);

        while let Some(event) = session.next_event() {
            session.dispatch(event, &mut renderer).unwrap();
        }
        session.finish(&mut renderer);

        assert_eq!(session.array().values(), &[1, 2, 3, 4, 5]);
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn status_serializes() {
        let status = SessionStatus {
            state: SessionState::Running,
            algorithm: Some(Algorithm::Merge),
            values: vec![1, 2],
            dispatched: 3,
            summary: Default::default(),
            step_delay_ms: 50,
            busy: true,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"running\""));
        assert!(json.contains("\"merge\""));
    }
}
