use std::path::PathBuf;

use clap::{Parser, Subcommand};
use item_gallery::client::{GalleryClient, MutationOutcome};
use item_gallery::config::{ConfigError, GalleryConfig};
use item_gallery::net::api::{ApiError, HttpItemApi};
use item_gallery::net::types::ItemId;
use item_gallery::net::upload::{ImageUpload, UploadError};
use item_gallery::prompt::{LinePrompt, PromptOutcome};
use item_gallery::shell;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("{0}")]
    Skipped(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "gallery", about = "Image gallery client for the items REST API")]
struct Cli {
    /// Server root; falls back to `VITE_API_URL` when unset.
    #[arg(long, env = "GALLERY_API_URL")]
    base_url: Option<String>,

    #[arg(long)]
    request_timeout_secs: Option<u64>,

    #[arg(long)]
    connect_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the gallery.
    List {
        /// Print the raw item array instead of the rendered view.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Upload an image with a description.
    Create {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        description: String,
    },
    /// Change an item's description. Prompts on stdin when `--description`
    /// is absent.
    Update {
        id: ItemId,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an item.
    Delete { id: ItemId },
    /// Interactive session (default).
    Shell,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    tracing::info!(base_url = %config.base_url, "gallery client configured");

    let client = GalleryClient::new(HttpItemApi::new(&config)?);
    match cli.command.unwrap_or(Command::Shell) {
        Command::List { json } => run_list(&client, json).await,
        Command::Create { image, description } => {
            let upload = ImageUpload::from_path(&image).await?;
            let outcome = client.create_item(upload, &description).await;
            finish(&client, "create", outcome).await
        }
        Command::Update { id, description } => {
            let outcome = match description {
                Some(text) => client.update_item(&id, PromptOutcome::Entered(text)).await,
                None => client.update_with_prompt(&id, &mut LinePrompt::stdio()).await,
            };
            finish(&client, &format!("update {id}"), outcome).await
        }
        Command::Delete { id } => {
            let outcome = client.delete_item(&id).await;
            finish(&client, &format!("delete {id}"), outcome).await
        }
        Command::Shell => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            shell::run(client, input, tokio::io::stdout()).await?;
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<GalleryConfig, CliError> {
    let mut config = GalleryConfig::resolve(cli.base_url.as_deref())?;
    if cli.request_timeout_secs.is_some() {
        config.timeouts.request_secs = cli.request_timeout_secs;
    }
    if cli.connect_timeout_secs.is_some() {
        config.timeouts.connect_secs = cli.connect_timeout_secs;
    }
    Ok(config)
}

async fn run_list(client: &GalleryClient<HttpItemApi>, json: bool) -> Result<(), CliError> {
    client.load_items().await?;
    if json {
        let rendered = serde_json::to_string_pretty(&client.items().await)?;
        println!("{rendered}");
    } else {
        print!("{}", client.view().await);
    }
    Ok(())
}

/// Print the refreshed view, then turn a skipped or failed request into a
/// non-zero exit.
async fn finish(
    client: &GalleryClient<HttpItemApi>,
    label: &str,
    outcome: MutationOutcome,
) -> Result<(), CliError> {
    let summary = shell::describe(label, &outcome);
    print!("{}", client.view().await);
    eprintln!("{summary}");
    match outcome {
        MutationOutcome::Skipped(_) => Err(CliError::Skipped(summary)),
        MutationOutcome::Resynced { request, .. } => request.map_err(CliError::from),
    }
}
