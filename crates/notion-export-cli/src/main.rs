//! notion-export - render Notion pages to markdown

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use notion_export_core::{list_pages, ExportConfig, NotionHttpGateway, PageAssembler, PageRef};

#[derive(Parser, Debug)]
#[command(name = "notion-export", version, about = "Export Notion pages to markdown")]
struct Cli {
    /// Config file (defaults to <config dir>/notion-export/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Integration token, overrides config and NOTION_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List pages whose title contains QUERY
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Search, then export every matching page
    Export {
        query: String,
        /// Write one .md file per page into this directory instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print pages as JSON (stdout only)
        #[arg(long, conflicts_with = "out")]
        json: bool,
    },
    /// Export specific page ids
    Page {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, conflicts_with = "out")]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "notion_export=debug,notion_export_core=debug"
    } else {
        "notion_export=info,notion_export_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the markdown, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ExportConfig> {
    let mut config = ExportConfig::load(cli.config.as_deref())?;
    if let Some(token) = &cli.token {
        config.token = token.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let gateway = NotionHttpGateway::new(config).context("creating HTTP client")?;
    let assembler = PageAssembler::new(&gateway);

    match cli.command {
        Command::Search { query, json } => {
            let refs = list_pages(&gateway, &query).await?;
            output::print_refs(&refs, json)?;
        }
        Command::Export { query, out, json } => {
            let refs = list_pages(&gateway, &query).await?;
            if refs.is_empty() {
                info!("No pages match {:?}", query);
                return Ok(());
            }
            let pages = assembler.assemble(&refs).await?;
            output::emit_pages(&pages, out.as_deref(), json).await?;
        }
        Command::Page { ids, out, json } => {
            let untitled: Vec<PageRef> = ids.iter().map(|id| PageRef::new(id, "")).collect();
            let refs: Vec<PageRef> = assembler
                .page_objects(&untitled)
                .await?
                .iter()
                .map(|page| PageRef::new(&page.id, page.title()))
                .collect();
            let pages = assembler.assemble(&refs).await?;
            output::emit_pages(&pages, out.as_deref(), json).await?;
        }
    }

    Ok(())
}
