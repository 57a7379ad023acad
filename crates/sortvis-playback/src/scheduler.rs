//! Timed playback of a session against a renderer.
//!
//! # Timeline
//!
//! For a run started at `t0` with step delay `d`:
//!
//! - event `k` is dispatched at `t0 + k·d`
//! - its highlight (if any) is reverted at `t0 + k·d + revert_offset(d)`,
//!   always before event `k + 1`
//! - after the last event, the run finishes at `t0 + n·d` (immediately when
//!   the trace is empty)
//! - `finish_grace` later the renderer is told the run is over
//!
//! One tokio task drives each run. It sleeps until each deadline and then
//! re-checks its [`RunToken`] under the session lock before doing anything,
//! so a stopped run can never touch state again.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use sortvis_trace::{Algorithm, ArrayState, TraceSummary, VisualState};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::cancel::{CancelSource, RunToken};
use crate::config::PlaybackConfig;
use crate::error::{Error, Result};
use crate::renderer::Renderer;
use crate::session::{PlaybackSession, SessionState};

struct Shared<R> {
    renderer: R,
    /// Array shown while no session exists.
    idle_array: ArrayState,
    session: Option<PlaybackSession>,
    step_delay: Duration,
    source: Option<CancelSource>,
    driver: Option<JoinHandle<()>>,
    next_run_id: u64,
}

impl<R: Renderer> Shared<R> {
    fn admits(&self, token: &RunToken) -> bool {
        self.source.as_ref().is_some_and(|s| s.admits(token))
    }

    fn values(&self) -> Vec<u32> {
        match &self.session {
            Some(session) => session.array().values().to_vec(),
            None => self.idle_array.values().to_vec(),
        }
    }
}

/// Drives sort runs against a [`Renderer`] on the tokio timer.
///
/// At most one run is active at a time. A run stays active through its
/// finish grace period, and starting another in the meantime is refused.
pub struct PlaybackScheduler<R: Renderer> {
    shared: Arc<Mutex<Shared<R>>>,
    busy: watch::Sender<bool>,
    config: PlaybackConfig,
}

impl<R: Renderer> PlaybackScheduler<R> {
    pub fn new(renderer: R, config: PlaybackConfig) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                renderer,
                idle_array: ArrayState::default(),
                session: None,
                step_delay: config.step_delay,
                source: None,
                driver: None,
                next_run_id: 1,
            })),
            busy,
            config,
        }
    }

    /// Whether a run (or its finish grace) is in progress.
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Replace the displayed array, e.g. after randomize or resize.
    pub async fn load(&self, values: Vec<u32>) -> Result<()> {
        let mut shared = self.shared.lock().await;
        if self.is_busy() {
            warn!("refusing to replace the array during a run");
            return Err(Error::AlreadyRunning);
        }
        shared.session = None;
        shared.idle_array = ArrayState::new(values);
        let Shared {
            renderer,
            idle_array,
            ..
        } = &mut *shared;
        renderer.snapshot_rendered(idle_array.values());
        Ok(())
    }

    /// Start sorting `values` with `algorithm`, one event every `step_delay`.
    ///
    /// Refused without touching the active run when one is in progress.
    /// Returns the new run's id.
    pub async fn start_run(
        &self,
        algorithm: Algorithm,
        values: Vec<u32>,
        step_delay: Duration,
    ) -> Result<u64> {
        let mut shared = self.shared.lock().await;
        if self.is_busy() {
            warn!(%algorithm, "start requested while a run is active");
            return Err(Error::AlreadyRunning);
        }

        let run_id = shared.next_run_id;
        shared.next_run_id += 1;
        let source = CancelSource::new(run_id);
        let token = source.token();

        let mut session = PlaybackSession::new(algorithm, values);
        let Shared { renderer, .. } = &mut *shared;
        renderer.snapshot_rendered(session.array().values());
        session.begin(renderer);

        info!(
            run_id,
            %algorithm,
            len = session.array().len(),
            step_ms = step_delay.as_millis() as u64,
            "starting sort run"
        );

        shared.session = Some(session);
        shared.step_delay = step_delay;
        shared.source = Some(source);
        self.busy.send_replace(true);

        let driver = tokio::spawn(drive(
            Arc::clone(&self.shared),
            self.busy.clone(),
            token,
            Instant::now(),
            step_delay,
            self.config,
        ));
        shared.driver = Some(driver);
        Ok(run_id)
    }

    /// Start a run with the configured default step delay.
    pub async fn start(&self, algorithm: Algorithm, values: Vec<u32>) -> Result<u64> {
        self.start_run(algorithm, values, self.config.step_delay).await
    }

    /// Stop the active run.
    ///
    /// Every pending action of the run is cancelled, all highlights are reset
    /// and the array is left exactly as the last dispatched mutation left it.
    pub async fn stop_run(&self) -> Result<()> {
        let mut shared = self.shared.lock().await;
        let Shared {
            renderer,
            session,
            source,
            driver,
            ..
        } = &mut *shared;

        let Some(session) = session.as_mut().filter(|s| s.is_running()) else {
            warn!("stop requested with no active run");
            return Err(Error::NotRunning);
        };

        if let Some(source) = source.take() {
            source.cancel();
            info!(run_id = source.run_id(), dispatched = session.dispatched(), "sort run stopped");
        }
        if let Some(driver) = driver.take() {
            driver.abort();
        }
        session.stop(renderer)?;
        renderer.run_finished();
        self.busy.send_replace(false);
        Ok(())
    }

    /// Resolve once no run is in progress.
    pub async fn wait_until_idle(&self) {
        let mut rx = self.busy.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|busy| !*busy).await;
    }

    pub async fn state(&self) -> SessionState {
        let shared = self.shared.lock().await;
        shared
            .session
            .as_ref()
            .map(PlaybackSession::state)
            .unwrap_or_default()
    }

    /// Current array values.
    pub async fn values(&self) -> Vec<u32> {
        self.shared.lock().await.values()
    }

    /// Current highlight of every index.
    pub async fn visuals(&self) -> Vec<VisualState> {
        self.frame().await.1
    }

    /// Snapshot for status reporting.
    pub async fn status(&self) -> SessionStatus {
        let shared = self.shared.lock().await;
        let session = shared.session.as_ref();
        SessionStatus {
            state: session.map(PlaybackSession::state).unwrap_or_default(),
            algorithm: session.map(PlaybackSession::algorithm),
            values: shared.values(),
            dispatched: session.map(PlaybackSession::dispatched).unwrap_or(0),
            summary: session.map(PlaybackSession::summary).unwrap_or_default(),
            step_delay_ms: shared.step_delay.as_millis() as u64,
            busy: self.is_busy(),
        }
    }

    /// Values and highlights read under one lock, for full redraws.
    pub async fn frame(&self) -> (Vec<u32>, Vec<VisualState>) {
        let shared = self.shared.lock().await;
        let visuals = match &shared.session {
            Some(session) => session.visuals().iter().collect(),
            None => vec![VisualState::Normal; shared.idle_array.len()],
        };
        (shared.values(), visuals)
    }
}

/// Playback status for sending to a frontend.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub state: SessionState,
    pub algorithm: Option<Algorithm>,
    pub values: Vec<u32>,
    pub dispatched: usize,
    pub summary: TraceSummary,
    pub step_delay_ms: u64,
    pub busy: bool,
}

/// Sleep until `deadline`. Returns false if the run was cancelled first.
async fn sleep_or_cancel(deadline: Instant, token: &RunToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep_until(deadline) => !token.is_cancelled(),
        _ = token.cancelled() => false,
    }
}

async fn drive<R: Renderer>(
    shared: Arc<Mutex<Shared<R>>>,
    busy: watch::Sender<bool>,
    token: RunToken,
    start: Instant,
    step_delay: Duration,
    config: PlaybackConfig,
) {
    let revert_offset = config.revert_offset(step_delay);
    let mut step: u32 = 0;

    loop {
        let due = start + step_delay * step;
        if !sleep_or_cancel(due, &token).await {
            return;
        }

        let pending = {
            let mut guard = shared.lock().await;
            if !guard.admits(&token) {
                return;
            }
            let Shared {
                renderer, session, ..
            } = &mut *guard;
            let Some(session) = session.as_mut() else {
                return;
            };
            let Some(event) = session.next_event() else {
                break;
            };
            match session.dispatch(event, renderer) {
                Ok(pending) => pending,
                Err(e) => {
                    warn!(run_id = token.run_id(), error = %e, "aborting run on bad trace event");
                    let _ = session.stop(renderer);
                    renderer.run_finished();
                    guard.source = None;
                    guard.driver = None;
                    busy.send_replace(false);
                    return;
                }
            }
        };

        if let Some(revert) = pending {
            if !sleep_or_cancel(due + revert_offset, &token).await {
                return;
            }
            let mut guard = shared.lock().await;
            if !guard.admits(&token) {
                return;
            }
            let Shared {
                renderer, session, ..
            } = &mut *guard;
            if let Some(session) = session.as_mut() {
                session.revert(&revert, renderer);
            }
        }

        step += 1;
    }

    // Exhaustion was observed at `start + step·d`: one delay after the last event.
    {
        let mut guard = shared.lock().await;
        if !guard.admits(&token) {
            return;
        }
        let Shared {
            renderer, session, ..
        } = &mut *guard;
        if let Some(session) = session.as_mut() {
            session.finish(renderer);
            info!(
                run_id = token.run_id(),
                events = session.dispatched(),
                "sort run finished"
            );
            debug!(summary = ?session.summary(), "trace summary");
        }
    }

    if !sleep_or_cancel(Instant::now() + config.finish_grace, &token).await {
        return;
    }
    let mut guard = shared.lock().await;
    if !guard.admits(&token) {
        return;
    }
    guard.source = None;
    guard.driver = None;
    guard.renderer.run_finished();
    busy.send_replace(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RecordingRenderer, RenderCall};
    use sortvis_trace::{Trace, TraceEvent};

    const STEP: Duration = Duration::from_millis(50);

    fn scheduler() -> (PlaybackScheduler<RecordingRenderer>, RecordingRenderer) {
        let renderer = RecordingRenderer::new();
        let scheduler = PlaybackScheduler::new(renderer.clone(), PlaybackConfig::default());
        (scheduler, renderer)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_starts_idle() {
        let (scheduler, _) = scheduler();
        assert_eq!(scheduler.state().await, SessionState::Idle);
        assert!(!scheduler.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn events_fire_one_step_apart() {
        let (scheduler, _) = scheduler();
        // bubble [2,1]: compare@0 swap@50 sorted(1)@100 sorted(0)@150 finish@200
        scheduler.start_run(Algorithm::Bubble, vec![2, 1], STEP).await.unwrap();

        advance(10).await;
        assert_eq!(scheduler.status().await.dispatched, 1);
        assert_eq!(scheduler.visuals().await, vec![VisualState::Comparing; 2]);

        advance(50).await; // t = 60, revert at 45 done, swap dispatched at 50
        assert_eq!(scheduler.values().await, vec![1, 2]);
        assert_eq!(scheduler.visuals().await, vec![VisualState::Swapping; 2]);

        advance(50).await; // t = 110
        assert_eq!(
            scheduler.visuals().await,
            vec![VisualState::Normal, VisualState::Sorted]
        );
        assert_eq!(scheduler.state().await, SessionState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn reverts_land_before_next_event() {
        let (scheduler, _) = scheduler();
        scheduler.start_run(Algorithm::Quick, vec![3, 1, 2], STEP).await.unwrap();

        advance(46).await; // pivot at 0, reverted at 45
        assert_eq!(scheduler.visuals().await, vec![VisualState::Normal; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn finishes_one_step_after_last_event() {
        let (scheduler, renderer) = scheduler();
        scheduler.start_run(Algorithm::Bubble, vec![2, 1], STEP).await.unwrap();

        advance(190).await;
        assert_eq!(scheduler.state().await, SessionState::Running);

        advance(20).await; // t = 210
        assert_eq!(scheduler.state().await, SessionState::Finished);
        assert_eq!(scheduler.visuals().await, vec![VisualState::Sorted; 2]);
        assert!(scheduler.is_busy(), "grace period still running");
        assert_eq!(renderer.finished_count(), 0);

        advance(500).await;
        assert!(!scheduler.is_busy());
        assert_eq!(renderer.finished_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_array_finishes_immediately() {
        let (scheduler, _) = scheduler();
        scheduler.start_run(Algorithm::Merge, vec![], STEP).await.unwrap();

        advance(5).await;
        let status = scheduler.status().await;
        assert_eq!(status.state, SessionState::Finished);
        assert_eq!(status.dispatched, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_running_is_rejected() {
        let (scheduler, _) = scheduler();
        scheduler.start_run(Algorithm::Bubble, vec![3, 2, 1], STEP).await.unwrap();
        advance(60).await;
        let before = scheduler.status().await;

        let second = scheduler.start_run(Algorithm::Quick, vec![9, 8], STEP).await;
        assert!(matches!(second, Err(Error::AlreadyRunning)));

        let after = scheduler.status().await;
        assert_eq!(after.algorithm, Some(Algorithm::Bubble));
        assert_eq!(after.values, before.values);
        assert_eq!(after.dispatched, before.dispatched);
    }

    #[tokio::test(start_paused = true)]
    async fn start_during_grace_is_rejected() {
        let (scheduler, _) = scheduler();
        scheduler.start_run(Algorithm::Quick, vec![1], STEP).await.unwrap();
        advance(60).await;
        assert_eq!(scheduler.state().await, SessionState::Finished);

        let again = scheduler.start_run(Algorithm::Quick, vec![1], STEP).await;
        assert!(matches!(again, Err(Error::AlreadyRunning)));

        scheduler.wait_until_idle().await;
        assert!(scheduler.start_run(Algorithm::Quick, vec![1], STEP).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_everything() {
        let (scheduler, renderer) = scheduler();
        scheduler.start_run(Algorithm::Bubble, vec![3, 2, 1], STEP).await.unwrap();

        advance(60).await; // compare@0, swap@50 dispatched, swap revert pending at 95
        scheduler.stop_run().await.unwrap();
        let frozen = scheduler.values().await;
        assert_eq!(frozen, vec![2, 3, 1]);
        assert_eq!(scheduler.state().await, SessionState::Paused);
        assert_eq!(scheduler.visuals().await, vec![VisualState::Normal; 3]);
        assert!(!scheduler.is_busy());
        assert_eq!(renderer.finished_count(), 1);

        renderer.clear();
        advance(2_000).await;
        assert!(renderer.calls().is_empty(), "no callback after stop");
        assert_eq!(scheduler.values().await, frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_event_ends_run_and_releases_driver() {
        let (scheduler, renderer) = scheduler();
        scheduler.start_run(Algorithm::Bubble, vec![2, 1], STEP).await.unwrap();
        {
            let mut shared = scheduler.shared.lock().await;
            let session = shared.session.take().unwrap();
            let bad = vec![TraceEvent::Swap { i: 0, j: 9 }];
            shared.session = Some(session.with_trace(Trace::Recorded(bad.into_iter())));
        }

        scheduler.wait_until_idle().await;
        assert_eq!(scheduler.state().await, SessionState::Paused);
        assert_eq!(scheduler.values().await, vec![2, 1]);
        assert_eq!(renderer.finished_count(), 1);

        let shared = scheduler.shared.lock().await;
        assert!(shared.source.is_none());
        assert!(shared.driver.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn frame_reads_values_and_highlights_together() {
        let (scheduler, _) = scheduler();
        scheduler.load(vec![3, 1]).await.unwrap();
        assert_eq!(scheduler.frame().await, (vec![3, 1], vec![VisualState::Normal; 2]));

        scheduler.start_run(Algorithm::Bubble, vec![2, 1], STEP).await.unwrap();
        advance(60).await;
        let (values, visuals) = scheduler.frame().await;
        assert_eq!(values, vec![1, 2]);
        assert_eq!(visuals, vec![VisualState::Swapping; 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_run_is_an_error() {
        let (scheduler, _) = scheduler();
        assert!(matches!(scheduler.stop_run().await, Err(Error::NotRunning)));
    }

    #[tokio::test(start_paused = true)]
    async fn new_run_after_stop_is_not_disturbed() {
        let (scheduler, _) = scheduler();
        scheduler.start_run(Algorithm::Bubble, vec![3, 2, 1], STEP).await.unwrap();
        advance(20).await;
        scheduler.stop_run().await.unwrap();

        scheduler.start_run(Algorithm::Merge, vec![2, 1], STEP).await.unwrap();
        advance(10).await;
        let status = scheduler.status().await;
        assert_eq!(status.algorithm, Some(Algorithm::Merge));
        assert_eq!(status.dispatched, 1);

        scheduler.wait_until_idle().await;
        assert_eq!(scheduler.values().await, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn load_renders_snapshot_and_is_refused_while_busy() {
        let (scheduler, renderer) = scheduler();
        scheduler.load(vec![4, 5, 6]).await.unwrap();
        assert_eq!(renderer.calls(), vec![RenderCall::Snapshot(vec![4, 5, 6])]);
        assert_eq!(scheduler.values().await, vec![4, 5, 6]);

        scheduler.start(Algorithm::Bubble, vec![2, 1]).await.unwrap();
        assert!(matches!(scheduler.load(vec![1]).await, Err(Error::AlreadyRunning)));
    }
}
