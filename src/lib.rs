//! Short Architect: turns a topic into a faceless YouTube Short script
//! (title, narration and scene-by-scene visual prompts) using Gemini.
//!
//! - [`server`] exposes `GET /api/debug` and `POST /api/short`
//! - [`api`] wraps the Gemini model listing and `generateContent` calls
//! - [`ui`] is the terminal front end that talks to the server

pub mod api;
pub mod config;
pub mod error;
pub mod scene;
pub mod server;
pub mod ui;

pub use api::GeminiClient;
pub use config::{Config, Overrides};
pub use error::{Result, ShortError};
pub use scene::{ErrorResult, Scene, ScriptRequest, ShortScript};
