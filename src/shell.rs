//! Interactive shell: the terminal stand-in for the gallery page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each input line is one user action. Draft edits apply immediately;
//! mutations are spawned so update/delete can overlap, and every completed
//! mutation re-renders the view. `submit` renders once more as soon as the
//! create is staged, so the disabled in-flight form is visible. `edit <id>` opens a one-line modal: the
//! next line is the new description and an empty line cancels it.

#[cfg(test)]
#[path = "shell_test.rs"]
mod shell_test;

use std::io;
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;

use crate::client::{GalleryClient, MutationOutcome, SkipReason};
use crate::net::api::ItemApi;
use crate::net::types::ItemId;
use crate::net::upload::ImageUpload;
use crate::prompt::PromptOutcome;

pub const HELP: &str = "\
commands:
  list | refresh     reload items from the server
  pick <path>        choose an image for the new item
  unpick             clear the chosen image
  desc <text>        set the new item's description
  submit             create the item from the form
  edit <id>          change an item's description (next line; empty cancels)
  delete <id>        delete an item
  dismiss            hide the current notice
  show               redraw the gallery
  help               show this help
  quit               wait for pending requests and exit
";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Refresh,
    Pick(PathBuf),
    Unpick,
    Describe(String),
    Submit,
    Edit(ItemId),
    Delete(ItemId),
    Dismiss,
    Quit,
}

/// Parse one input line. Blank lines parse to `Ok(None)`.
///
/// # Errors
///
/// Returns a message for unknown commands or missing arguments.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match word {
        "help" | "?" => Command::Help,
        "show" => Command::Show,
        "list" | "refresh" => Command::Refresh,
        "pick" => Command::Pick(PathBuf::from(required(rest, "pick <path>")?)),
        "unpick" => Command::Unpick,
        "desc" => Command::Describe(rest.to_owned()),
        "submit" => Command::Submit,
        "edit" => Command::Edit(parse_id(rest, "edit <id>")?),
        "delete" | "rm" => Command::Delete(parse_id(rest, "delete <id>")?),
        "dismiss" => Command::Dismiss,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(Some(command))
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() { Err(format!("usage: {usage}")) } else { Ok(rest) }
}

fn parse_id(rest: &str, usage: &str) -> Result<ItemId, String> {
    let raw = required(rest, usage)?;
    raw.parse::<ItemId>().map_err(|e| e.to_string())
}

/// Run the shell until `quit` or end of input, then wait for in-flight
/// requests.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<A, R, W>(client: GalleryClient<A>, input: R, mut output: W) -> io::Result<()>
where
    A: ItemApi + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut tasks: JoinSet<String> = JoinSet::new();
    let mut editing: Option<ItemId> = None;

    // A failed first load is recorded as a notice and shown by the render.
    client.load_items().await.ok();
    render(&client, &mut output).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };

                if let Some(id) = editing.take() {
                    let outcome = PromptOutcome::from_line(Some(&line));
                    let client = client.clone();
                    tasks.spawn(async move {
                        let result = client.update_item(&id, outcome).await;
                        describe(&format!("update {id}"), &result)
                    });
                    continue;
                }

                let command = match parse_command(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(message) => {
                        say(&mut output, &message).await?;
                        continue;
                    }
                };

                match command {
                    Command::Quit => break,
                    Command::Help => output.write_all(HELP.as_bytes()).await?,
                    Command::Show => render(&client, &mut output).await?,
                    Command::Refresh => {
                        let client = client.clone();
                        tasks.spawn(async move {
                            match client.load_items().await {
                                Ok(count) => format!("refresh: {count} items"),
                                Err(e) => format!("refresh: failed ({e})"),
                            }
                        });
                    }
                    Command::Pick(path) => match ImageUpload::from_path(&path).await {
                        Ok(upload) => {
                            client.select_image(upload).await;
                            render(&client, &mut output).await?;
                        }
                        Err(e) => say(&mut output, &format!("pick: {e}")).await?,
                    },
                    Command::Unpick => {
                        client.clear_image().await;
                        render(&client, &mut output).await?;
                    }
                    Command::Describe(text) => {
                        client.set_description(text).await;
                        render(&client, &mut output).await?;
                    }
                    Command::Submit => match client.stage_draft().await {
                        Ok(pending) => {
                            render(&client, &mut output).await?;
                            let client = client.clone();
                            tasks.spawn(async move {
                                let result = client.send_create(pending).await;
                                describe("create", &result)
                            });
                        }
                        Err(reason) => {
                            let skipped = MutationOutcome::Skipped(reason);
                            say(&mut output, &describe("create", &skipped)).await?;
                        }
                    },
                    Command::Edit(id) => {
                        say(&mut output, &format!("New description for item {id} (empty line cancels):")).await?;
                        editing = Some(id);
                    }
                    Command::Delete(id) => {
                        let client = client.clone();
                        tasks.spawn(async move {
                            let result = client.delete_item(&id).await;
                            describe(&format!("delete {id}"), &result)
                        });
                    }
                    Command::Dismiss => {
                        client.dismiss_notice().await;
                        render(&client, &mut output).await?;
                    }
                }
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                report(&client, &mut output, joined).await?;
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        report(&client, &mut output, joined).await?;
    }
    output.flush().await
}

async fn report<A, W>(
    client: &GalleryClient<A>,
    output: &mut W,
    joined: Result<String, tokio::task::JoinError>,
) -> io::Result<()>
where
    A: ItemApi,
    W: AsyncWrite + Unpin,
{
    match joined {
        Ok(summary) => say(output, &summary).await?,
        Err(e) => {
            tracing::error!(error = %e, "shell task failed");
            say(output, &format!("task failed: {e}")).await?;
        }
    }
    render(client, output).await
}

async fn render<A, W>(client: &GalleryClient<A>, output: &mut W) -> io::Result<()>
where
    A: ItemApi,
    W: AsyncWrite + Unpin,
{
    let view = client.view().await;
    output.write_all(format!("\n{view}").as_bytes()).await?;
    output.flush().await
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, message: &str) -> io::Result<()> {
    output.write_all(message.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

/// One-line summary of a finished mutation.
#[must_use]
pub fn describe(label: &str, outcome: &MutationOutcome) -> String {
    match outcome {
        MutationOutcome::Skipped(reason) => {
            let why = match reason {
                SkipReason::Busy => "a create is already in progress",
                SkipReason::MissingImage => "pick an image first",
                SkipReason::EmptyDescription => "description is empty",
                SkipReason::Cancelled => "cancelled",
            };
            format!("{label}: skipped ({why})")
        }
        MutationOutcome::Resynced { request, refetch } => {
            let sent = match request {
                Ok(()) => "ok".to_owned(),
                Err(e) => format!("failed ({e})"),
            };
            match refetch {
                Ok(count) => format!("{label}: {sent}, {count} items"),
                Err(e) => format!("{label}: {sent}, refresh failed ({e})"),
            }
        }
    }
}
