//! The interactive chat loop
//!
//! A session owns the transcript and drives one completion call per line of
//! input. It is generic over the client and the console streams so the whole
//! loop can run against in-memory buffers.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::ai::{CompletionClient, CompletionRequest};
use crate::config::Settings;
use crate::state::{ChatMessage, Transcript};

pub const PROMPT: &str = "You: ";
pub const ASSISTANT_LABEL: &str = "Claude:";
pub const FAREWELL: &str = "Goodbye!";

/// Outcome of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// The user asked to leave.
    Exit,
    /// Blank input; nothing was sent.
    Skipped,
    /// The assistant's reply, already appended to the transcript.
    Replied(String),
    /// The call failed and the user message was rolled back.
    Failed(String),
}

pub struct ChatSession<C> {
    client: C,
    settings: Settings,
    transcript: Transcript,
}

impl<C: CompletionClient> ChatSession<C> {
    pub fn new(client: C, settings: Settings) -> Self {
        Self {
            client,
            settings,
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub async fn handle_line(&mut self, line: &str) -> Turn {
        let input = line.trim();

        if input.to_lowercase() == "exit" {
            return Turn::Exit;
        }
        if input.is_empty() {
            return Turn::Skipped;
        }

        self.transcript.push(ChatMessage::user(input));

        let request = CompletionRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            messages: self.transcript.messages(),
        };

        match self.client.complete(&request).await {
            Ok(text) => {
                self.transcript.push(ChatMessage::assistant(text.clone()));
                tracing::info!(messages = self.transcript.len(), "reply appended");
                Turn::Replied(text)
            }
            Err(e) => {
                self.transcript.rollback_user();
                tracing::debug!(error = %e, messages = self.transcript.len(), "completion failed, rolled back");
                Turn::Failed(describe(&e))
            }
        }
    }

    /// Prompt, read and answer lines until `exit` or end of input.
    pub async fn run<R: BufRead, W: Write>(&mut self, mut input: R, output: &mut W) -> Result<()> {
        let mut line = String::new();

        loop {
            write!(output, "{}", PROMPT)?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                writeln!(output, "{}", FAREWELL)?;
                break;
            }

            match self.handle_line(&line).await {
                Turn::Exit => {
                    writeln!(output, "{}", FAREWELL)?;
                    break;
                }
                Turn::Skipped => {}
                Turn::Replied(text) => writeln!(output, "\n{} {}\n", ASSISTANT_LABEL, text)?,
                Turn::Failed(error) => writeln!(output, "Error: {}", error)?,
            }
            output.flush()?;
        }

        Ok(())
    }
}

/// Top-level message plus the root cause; intermediate sources are omitted.
fn describe(error: &anyhow::Error) -> String {
    if error.chain().count() == 1 {
        error.to_string()
    } else {
        format!("{}: {}", error, error.root_cause())
    }
}
