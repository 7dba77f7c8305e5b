//! Terminal front end: collects a topic, calls the script endpoint and
//! renders either the script with its scene cards or an error banner.

pub mod client;
pub mod render;
pub mod state;
pub mod terminal;

pub use client::{ScriptClient, FALLBACK_ERROR};
pub use render::render;
pub use state::{Control, Outcome, SceneData, ShortData, Ticket, Trigger, ViewState};
pub use terminal::{run_interactive, run_once};
