use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::info;

use crate::catalog::CatalogFetcher;
use crate::config::PublisherConfig;
use crate::push::PushClient;
use crate::utils;

#[derive(Debug, Parser)]
#[command(
    name = "dexpush-publisher",
    version,
    about = "Scrape the catalog and push it to the search index"
)]
pub struct Cli {
    #[command(flatten)]
    pub config: PublisherConfig,
    /// Increase logging verbosity (use -vv for trace level).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the catalog and write it as JSON.
    Catalog {
        /// File to write to. Defaults to stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Push every entity as its own document.
    Publish(TokenArgs),
    /// Push the whole catalog through a staged upload and one batch call.
    PublishStaged(TokenArgs),
}

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Bearer token for the push API.
    #[arg(long, env = "ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,
}

pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    utils::init_tracing(cli.verbose)?;

    let client = utils::build_http_client(&cli.config)?;
    let fetcher = CatalogFetcher::new(client.clone(), &cli.config)
        .context("invalid catalog configuration")?;

    if let Command::Publish(args) | Command::PublishStaged(args) = &cli.command {
        if args.access_token.trim().is_empty() {
            return Err(anyhow!("--access-token must not be empty"));
        }
    }

    let catalog = fetcher
        .fetch_catalog()
        .await
        .context("failed to retrieve catalog")?;

    match cli.command {
        Command::Catalog { output } => {
            write_catalog(output, &catalog)?;
            info!(entities = catalog.len(), "catalog written");
        }
        Command::Publish(args) => {
            let pusher = PushClient::new(client, &cli.config).context("invalid push API url")?;
            let report = pusher.publish_direct(&catalog, &args.access_token).await;
            print!("{}", report.render());
            if !report.is_success() {
                return Err(anyhow!(
                    "{} of {} documents failed",
                    report.failed.len(),
                    report.attempted
                ));
            }
        }
        Command::PublishStaged(args) => {
            let pusher = PushClient::new(client, &cli.config).context("invalid push API url")?;
            pusher
                .publish_staged(&catalog, &args.access_token)
                .await
                .map_err(|err| anyhow!(err.public_message()))?;
            println!("{{}}");
        }
    }

    Ok(())
}

fn write_catalog(output: Option<PathBuf>, catalog: &dexpush_types::Catalog) -> Result<()> {
    let mut writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    serde_json::to_writer_pretty(&mut writer, catalog).context("failed to serialize catalog")?;
    writer.write_all(b"\n")?;
    writer.flush().context("failed to flush catalog output")?;
    Ok(())
}
