//! Axum web server with WebSocket streaming for the visualizer.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use sortvis_playback::{Algorithm, PlaybackConfig, PlaybackScheduler, SessionStatus, SpeedPreset};
use tokio::sync::{broadcast, Mutex};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::config::VisConfig;
use crate::error::Result;
use crate::generator::ArrayGenerator;
use crate::renderer::{BroadcastRenderer, RenderCommand};

/// Shared application state.
pub struct AppState {
    scheduler: PlaybackScheduler<BroadcastRenderer>,
    renderer: BroadcastRenderer,
    generator: Mutex<ArrayGenerator>,
    config: VisConfig,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server showing a fresh random array of `config.size` bars.
    pub async fn new(config: VisConfig) -> Result<Self> {
        let renderer = BroadcastRenderer::new();
        let playback = PlaybackConfig::default().with_speed(config.speed);
        let scheduler = PlaybackScheduler::new(renderer.clone(), playback);

        let mut generator = ArrayGenerator::new(config.seed);
        scheduler.load(generator.generate(config.size)).await?;

        Ok(Self {
            state: Arc::new(AppState {
                scheduler,
                renderer,
                generator: Mutex::new(generator),
                config,
            }),
        })
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/api/status", get(status_handler))
            .route("/api/randomize", post(randomize_handler))
            .route("/api/sort", post(sort_handler))
            .route("/api/stop", post(stop_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address.
    pub async fn serve(self) -> Result<()> {
        let addr = self.state.config.addr;
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Visualization server running on http://{}", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Map playback refusals onto HTTP.
fn status_code(err: sortvis_playback::Error) -> StatusCode {
    match err {
        sortvis_playback::Error::AlreadyRunning | sortvis_playback::Error::NotRunning => {
            StatusCode::CONFLICT
        }
        sortvis_playback::Error::Trace(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    Json(state.scheduler.status().await)
}

#[derive(Debug, Default, Deserialize)]
struct RandomizeRequest {
    #[serde(default)]
    size: Option<usize>,
}

async fn randomize_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RandomizeRequest>,
) -> std::result::Result<Json<SessionStatus>, StatusCode> {
    let size = state.config.clamp_size(req.size.unwrap_or(state.config.size));
    let values = state.generator.lock().await.generate(size);
    state.scheduler.load(values).await.map_err(status_code)?;
    debug!(size, "array randomized");
    Ok(Json(state.scheduler.status().await))
}

#[derive(Debug, Deserialize)]
struct SortRequest {
    algorithm: Algorithm,
    #[serde(default)]
    speed: Option<SpeedPreset>,
}

async fn sort_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SortRequest>,
) -> std::result::Result<(StatusCode, Json<SessionStatus>), StatusCode> {
    let speed = req.speed.unwrap_or(state.config.speed);
    let values = state.scheduler.values().await;
    state
        .scheduler
        .start_run(req.algorithm, values, speed.step_delay())
        .await
        .map_err(status_code)?;
    Ok((StatusCode::ACCEPTED, Json(state.scheduler.status().await)))
}

async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<SessionStatus>, StatusCode> {
    state.scheduler.stop_run().await.map_err(status_code)?;
    Ok(Json(state.scheduler.status().await))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Current frame as a full redraw.
async fn snapshot(state: &AppState) -> RenderCommand {
    let (values, visuals) = state.scheduler.frame().await;
    RenderCommand::Snapshot { values, visuals }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");

    // Subscribe before snapshotting so no command falls between the two.
    let mut rx = state.renderer.subscribe();
    if let Err(e) = send_command(&mut socket, &snapshot(&state).await).await {
        warn!("Failed to send initial snapshot: {}", e);
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = socket.send(Message::Pong(data)).await {
                            warn!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            command = rx.recv() => {
                let command = match command {
                    Ok(command) => command,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagged, resending snapshot");
                        snapshot(&state).await
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if let Err(e) = send_command(&mut socket, &command).await {
                    warn!("Failed to send render command: {}", e);
                    break;
                }
            }
        }
    }
}

async fn send_command(socket: &mut WebSocket, command: &RenderCommand) -> std::result::Result<(), axum::Error> {
    let json = serde_json::to_string(command).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn test_state() -> Arc<AppState> {
        let config = VisConfig {
            size: 8,
            seed: Some(3),
            ..VisConfig::default()
        };
        VisServer::new(config).await.unwrap().state
    }

    #[tokio::test(start_paused = true)]
    async fn router_builds() {
        let server = VisServer::new(VisConfig::default()).await.unwrap();
        let _router = server.router();
    }

    #[tokio::test(start_paused = true)]
    async fn starts_with_configured_array() {
        let state = test_state().await;
        let Json(status) = status_handler(State(state)).await;
        assert_eq!(status.values.len(), 8);
        assert!(!status.busy);
    }

    #[tokio::test(start_paused = true)]
    async fn randomize_clamps_size() {
        let state = test_state().await;
        let req = RandomizeRequest { size: Some(1_000) };
        let Json(status) = randomize_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(status.values.len(), state.config.max_size);

        let Json(status) = randomize_handler(State(state.clone()), Json(RandomizeRequest::default()))
            .await
            .unwrap();
        assert_eq!(status.values.len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn sort_conflicts_while_busy() {
        let state = test_state().await;
        let req = || SortRequest {
            algorithm: Algorithm::Quick,
            speed: Some(SpeedPreset::Fast),
        };

        let (code, Json(status)) = sort_handler(State(state.clone()), Json(req())).await.unwrap();
        assert_eq!(code, StatusCode::ACCEPTED);
        assert!(status.busy);

        let second = sort_handler(State(state.clone()), Json(req())).await;
        assert_eq!(second.unwrap_err(), StatusCode::CONFLICT);

        let randomize = randomize_handler(State(state.clone()), Json(RandomizeRequest::default())).await;
        assert_eq!(randomize.unwrap_err(), StatusCode::CONFLICT);

        state.scheduler.wait_until_idle().await;
        let mut sorted = status.values.clone();
        sorted.sort_unstable();
        assert_eq!(state.scheduler.values().await, sorted);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_conflicts_when_idle() {
        let state = test_state().await;
        assert_eq!(stop_handler(State(state.clone())).await.unwrap_err(), StatusCode::CONFLICT);

        let req = SortRequest {
            algorithm: Algorithm::Bubble,
            speed: None,
        };
        let (code, _) = sort_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(code, StatusCode::ACCEPTED);
        tokio::time::sleep(Duration::from_millis(120)).await;

        let Json(status) = stop_handler(State(state.clone())).await.unwrap();
        assert!(!status.busy);
        assert_eq!(status.values.len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn run_streams_render_commands() {
        let state = test_state().await;
        let mut rx = state.renderer.subscribe();
        let req = SortRequest {
            algorithm: Algorithm::Merge,
            speed: Some(SpeedPreset::Fast),
        };
        let (_, Json(started)) = sort_handler(State(state.clone()), Json(req)).await.unwrap();
        assert!(started.busy);
        state.scheduler.wait_until_idle().await;

        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        assert!(matches!(commands.first(), Some(RenderCommand::Snapshot { .. })));
        assert_eq!(commands.last(), Some(&RenderCommand::RunFinished));
        assert!(commands.iter().any(|c| matches!(c, RenderCommand::Value { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_matches_scheduler_mid_run() {
        let state = test_state().await;
        let req = SortRequest {
            algorithm: Algorithm::Quick,
            speed: Some(SpeedPreset::Medium),
        };
        let _accepted = sort_handler(State(state.clone()), Json(req)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let RenderCommand::Snapshot { values, visuals } = snapshot(&state).await else {
            panic!("snapshot must be a full redraw");
        };
        assert_eq!(values.len(), visuals.len());
        assert_eq!((values, visuals), state.scheduler.frame().await);
    }

    #[tokio::test]
    async fn index_page_labels_every_bar() {
        let Html(page) = index_handler().await;
        assert!(page.contains("label.textContent = v"));
        assert!(page.contains("firstChild.textContent = cmd.value"));
    }

    #[test]
    fn sort_request_parses() {
        let req: SortRequest = serde_json::from_str(r#"{"algorithm":"merge","speed":"slow"}"#).unwrap();
        assert_eq!(req.algorithm, Algorithm::Merge);
        assert_eq!(req.speed, Some(SpeedPreset::Slow));

        let req: SortRequest = serde_json::from_str(r#"{"algorithm":"bubble"}"#).unwrap();
        assert_eq!(req.speed, None);
    }
}
