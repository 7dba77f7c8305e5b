use std::fmt::Write;

use super::state::{Outcome, SceneData, ShortData, ViewState};

pub const HEADING: &str = "Faceless Short Architect";
pub const TAGLINE: &str = "Global content creation, powered by Gemini.";
pub const UNTITLED: &str = "Untitled";
pub const NO_SCRIPT: &str = "No script content generated.";
pub const VIDEO_CLIP_LABEL: &str = "Generate Video Clip";

/// Renders the whole view as plain text for the terminal.
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", HEADING);
    let _ = writeln!(out, "{}", TAGLINE);
    let _ = writeln!(out);
    let _ = writeln!(out, "Topic: {}", state.topic());

    let control = state.control();
    let marker = if control.busy { "… " } else { "" };
    let suffix = if control.disabled { " (disabled)" } else { "" };
    let _ = writeln!(out, "[ {}{} ]{}", marker, control.label, suffix);

    match state.result() {
        None => {}
        Some(Outcome::Error(message)) => {
            let _ = writeln!(out);
            out.push_str(&render_error(message));
        }
        Some(Outcome::Script(data)) => {
            let _ = writeln!(out);
            out.push_str(&render_script(data));
        }
    }

    out
}

pub fn render_error(message: &str) -> String {
    format!("! {}\n", message)
}

/// Renders the script card followed by one card per scene.
pub fn render_script(data: &ShortData) -> String {
    let mut out = String::new();

    let title = data.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(UNTITLED);
    let script = data.script.as_deref().filter(|s| !s.is_empty()).unwrap_or(NO_SCRIPT);
    let _ = writeln!(out, "Full Script: {}", title);
    let _ = writeln!(out, "\"{}\"", script);

    for (idx, scene) in data.scenes.iter().flatten().enumerate() {
        let _ = writeln!(out);
        out.push_str(&render_scene(idx, scene));
    }

    out
}

fn render_scene(idx: usize, scene: &SceneData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SCENE {}", idx + 1);
    let _ = writeln!(out, "  Voiceover: {}", scene.voiceover.as_deref().unwrap_or_default());
    let _ = writeln!(
        out,
        "  Visual Prompt: {}",
        scene.visual_prompt.as_deref().unwrap_or_default()
    );
    let _ = writeln!(out, "  [ {} ]", VIDEO_CLIP_LABEL);
    out
}
