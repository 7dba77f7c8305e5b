pub mod gemini;

pub use gemini::{build_prompt, GeminiClient, UpstreamReply};
