// ABOUTME: CLI entry point for sql-dumper
// ABOUTME: Merges flags with an optional config file and runs a single dump

use anyhow::{bail, Context};
use clap::Parser;
use sql_dumper::config::{load_dump_config_from_file, DumpConfig};
use sql_dumper::utils::redact_url;
use sql_dumper::{database, Dumper, SequenceAttribution};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sql-dumper")]
#[command(about = "Export a MySQL or PostgreSQL database to a SQL script", long_about = None)]
#[command(version)]
struct Cli {
    /// Connection URL (mysql://, postgres:// or postgresql://)
    #[arg(long)]
    url: Option<String>,
    /// Directory the dump file is written to
    #[arg(long)]
    dir: Option<PathBuf>,
    /// File name pattern, strftime tokens allowed (e.g. "shop-%Y%m%d.sql")
    #[arg(long)]
    name: Option<String>,
    /// Rows fetched per page
    #[arg(long)]
    page_size: Option<usize>,
    /// Dump only these tables, in this order (comma-separated)
    #[arg(long, value_delimiter = ',')]
    tables: Option<Vec<String>>,
    /// Where PostgreSQL sequences are emitted
    #[arg(long, value_enum)]
    sequences: Option<SequenceAttribution>,
    /// TOML file with a [dump] table; flags override its values
    #[arg(long)]
    config: Option<String>,
}

impl Cli {
    fn overrides(&self) -> DumpConfig {
        DumpConfig {
            url: self.url.clone(),
            dir: self.dir.clone(),
            name: self.name.clone(),
            page_size: self.page_size,
            tables: self.tables.clone().unwrap_or_default(),
            sequences: self.sequences,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - default to INFO level if RUST_LOG not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_dump_config_from_file(path)?,
        None => DumpConfig::default(),
    };
    let config = file.merge(cli.overrides());

    let Some(url) = config.url else {
        bail!("No connection URL given. Pass --url or set url in the [dump] config table");
    };
    let dir = config.dir.unwrap_or_else(|| PathBuf::from("."));
    let name = config.name.unwrap_or_else(|| "dump-%Y%m%d-%H%M%S.sql".to_string());

    tracing::info!("Connecting to {}", redact_url(&url));
    let db = database::connect(&url)
        .await
        .with_context(|| format!("Failed to connect to {}", redact_url(&url)))?;

    let mut dumper = Dumper::register(db, &dir, &name).context("Failed to set up dump output")?;
    if let Some(page_size) = config.page_size {
        dumper.set_page_size(page_size)?;
    }
    if let Some(sequences) = config.sequences {
        dumper.set_sequence_attribution(sequences);
    }

    let outcome = dumper.dump(&config.tables).await;
    let path = dumper.path().to_path_buf();
    dumper.close().await.context("Failed to close database connection")?;
    outcome.with_context(|| format!("Dump to {} failed", path.display()))?;

    println!("{}", path.display());
    Ok(())
}
