//! SortVis Web Front
//!
//! Serves a bar chart over HTTP and animates sort runs in the browser.
//!
//! # Architecture
//!
//! - **Generator**: random arrays for the chart
//! - **Renderer**: turns playback calls into JSON commands on a broadcast channel
//! - **WebSocket**: streams those commands to every connected page
//! - **REST API**: randomize, sort, stop, status
//!
//! # Usage
//!
//! ```ignore
//! let server = VisServer::new(VisConfig::from_env()?).await?;
//! server.serve().await?;
//! ```

mod config;
mod error;
mod generator;
mod renderer;
mod server;

pub use config::VisConfig;
pub use error::{Error, Result};
pub use generator::{ArrayGenerator, MAX_VALUE, MIN_VALUE};
pub use renderer::{BroadcastRenderer, RenderCommand, CHANNEL_CAPACITY};
pub use server::{AppState, VisServer};
