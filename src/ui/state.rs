use serde::{Deserialize, Serialize};
use tracing::debug;

/// Scene card data as received from the script endpoint. Every field is
/// optional so that a partial payload still renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneData {
    pub voiceover: Option<String>,
    pub visual_prompt: Option<String>,
}

/// Script as received from the script endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortData {
    pub title: Option<String>,
    pub script: Option<String>,
    pub scenes: Option<Vec<SceneData>>,
}

/// The last thing a generate action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Script(ShortData),
    Error(String),
}

/// How a generate action was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The generate control; ignored while it is disabled.
    Button,
    /// Enter pressed in the topic field.
    Enter,
}

/// Issued for every accepted generate action. Only the newest ticket may
/// commit a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    topic: String,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Appearance of the generate control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub label: &'static str,
    pub busy: bool,
    pub disabled: bool,
}

pub const IDLE_LABEL: &str = "Generate Concept";
pub const BUSY_LABEL: &str = "Architecting...";

#[derive(Debug, Default)]
pub struct ViewState {
    topic: String,
    result: Option<Outcome>,
    loading: bool,
    generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn result(&self) -> Option<&Outcome> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn control(&self) -> Control {
        Control {
            label: if self.loading { BUSY_LABEL } else { IDLE_LABEL },
            busy: self.loading,
            disabled: self.loading || self.topic.is_empty(),
        }
    }

    /// Starts a generate action, clearing the previous result.
    ///
    /// Returns `None` when no request must be issued: the topic is empty, or
    /// the button was used while disabled. An Enter press during a pending
    /// request supersedes it.
    pub fn submit(&mut self, trigger: Trigger) -> Option<Ticket> {
        if self.topic.is_empty() {
            return None;
        }
        if trigger == Trigger::Button && self.control().disabled {
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.result = None;

        Some(Ticket {
            generation: self.generation,
            topic: self.topic.clone(),
        })
    }

    /// Commits the outcome of `ticket` if it is still the current request.
    pub fn finish(&mut self, ticket: &Ticket, outcome: Outcome) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping result of superseded request {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }

        self.result = Some(outcome);
        self.loading = false;
        true
    }
}
