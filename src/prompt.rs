//! Non-blocking description prompt used before an update.
//!
//! The prompt yields either the entered text or an explicit cancellation;
//! the controller decides what an empty answer means.

#[cfg(test)]
#[path = "prompt_test.rs"]
mod prompt_test;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::net::types::ItemId;

/// Result of asking the user for a new description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    Entered(String),
    Cancelled,
}

impl PromptOutcome {
    /// Interpret one raw input line. `None` (end of input) cancels; the line
    /// terminator is stripped and nothing else is.
    #[must_use]
    pub fn from_line(line: Option<&str>) -> Self {
        match line {
            Some(raw) => Self::Entered(raw.trim_end_matches(['\r', '\n']).to_owned()),
            None => Self::Cancelled,
        }
    }

    /// The description to send, if there is one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Entered(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl From<Option<String>> for PromptOutcome {
    fn from(value: Option<String>) -> Self {
        Self::from_line(value.as_deref())
    }
}

/// Source of new descriptions for `update_item`.
#[async_trait]
pub trait DescriptionPrompt: Send {
    async fn ask(&mut self, id: &ItemId) -> PromptOutcome;
}

/// Line-oriented prompt over any async reader/writer pair.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl LinePrompt<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Read answers from stdin; the question goes to stderr so stdout stays
    /// clean for the rendered view.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

#[async_trait]
impl<R, W> DescriptionPrompt for LinePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn ask(&mut self, id: &ItemId) -> PromptOutcome {
        let question = format!("New description for item {id}: ");
        if let Err(e) = self.writer.write_all(question.as_bytes()).await {
            tracing::warn!(error = %e, "prompt write failed");
        }
        if let Err(e) = self.writer.flush().await {
            tracing::warn!(error = %e, "prompt flush failed");
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => PromptOutcome::Cancelled,
            Ok(_) => PromptOutcome::from_line(Some(&line)),
            Err(e) => {
                tracing::warn!(error = %e, "prompt read failed");
                PromptOutcome::Cancelled
            }
        }
    }
}
