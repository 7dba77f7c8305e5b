use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::client::ScriptClient;
use super::render::render;
use super::state::{Outcome, Ticket, Trigger, ViewState};
use crate::error::{Result, ShortError};

const QUIT_COMMANDS: &[&str] = &[":q", ":quit", ":exit"];

/// Generates one script for `topic` and prints the view before and after.
pub async fn run_once(client: &ScriptClient, topic: &str) -> Result<ViewState> {
    let mut state = ViewState::new();
    state.set_topic(topic);

    let ticket = state
        .submit(Trigger::Button)
        .ok_or_else(|| ShortError::RequestError("topic must not be empty".to_string()))?;
    println!("{}", render(&state));

    let outcome = client.generate(ticket.topic()).await;
    state.finish(&ticket, outcome);
    println!("{}", render(&state));

    Ok(state)
}

/// Reads topics from stdin, one per line, until EOF or a quit command.
///
/// Each line is an Enter press in the topic field. A new line while a
/// request is pending aborts that request and starts a new one.
pub async fn run_interactive(client: ScriptClient) -> Result<()> {
    let mut state = ViewState::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<(Ticket, Outcome)>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: Option<JoinHandle<()>> = None;

    println!("{}", render(&state));
    println!("Type a topic and press Enter (:q to quit).");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let topic = line.trim_end_matches('\r');
                if QUIT_COMMANDS.contains(&topic.trim()) {
                    break;
                }

                state.set_topic(topic);
                let Some(ticket) = state.submit(Trigger::Enter) else {
                    println!("Enter a topic first.");
                    continue;
                };

                if let Some(handle) = in_flight.take() {
                    debug!("Aborting superseded request");
                    handle.abort();
                }

                let client = client.clone();
                let tx = tx.clone();
                in_flight = Some(tokio::spawn(async move {
                    let outcome = client.generate(ticket.topic()).await;
                    let _ = tx.send((ticket, outcome));
                }));

                println!("{}", render(&state));
            }
            Some((ticket, outcome)) = rx.recv() => {
                if state.finish(&ticket, outcome) {
                    in_flight = None;
                    println!("{}", render(&state));
                }
            }
        }
    }

    if let Some(handle) = in_flight.take() {
        handle.abort();
    }
    info!("Interactive session closed");
    Ok(())
}
