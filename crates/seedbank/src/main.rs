//! Seedbank - seed sequence retrieval tool

use anyhow::Result;
use clap::Parser;
use seedbank::config::RunConfig;
use seedbank::pipeline::SeedPipeline;
use seedbank_common::logging::{init_logging, LogConfig, LogLevel};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "seedbank")]
#[command(
    author,
    version,
    about = "Retrieve candidate seed sequences for gene-family identification"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// Retrieve seeds from NCBI Protein, UniProtKB and InterPro
    Retrieve {
        /// Full query name (e.g. "GDSL lipase")
        #[arg(long)]
        name_full: Option<String>,

        /// Abbreviated query name (e.g. "GELP")
        #[arg(long)]
        name_abbr: Option<String>,

        /// InterPro/CDD/Pfam family accession (e.g. "IPR001087")
        #[arg(long)]
        interpro: Option<String>,

        /// Contact e-mail, required by the NCBI E-utilities
        #[arg(long)]
        email: String,

        /// Prefix for the output files (e.g. ./tmp/gelp)
        #[arg(long)]
        out_prefix: String,

        /// Maximum records in the broad output set
        #[arg(long, default_value_t = 10_000)]
        max_seeds: usize,

        /// Taxonomy restriction for InterPro retrieval
        #[arg(long)]
        taxid: Option<String>,

        /// Only retrieve reviewed/curated seeds
        #[arg(long)]
        reviewed_only: bool,

        /// NCBI API key (raises the rate limit from 3/s to 10/s)
        #[arg(long, env = "NCBI_API_KEY")]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging: environment configuration first, verbose flag on top
    let mut log_config = LogConfig::from_env().unwrap_or_else(|_| {
        LogConfig::builder()
            .file_prefix("seedbank".to_string())
            .build()
    });
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }

    init_logging(&log_config)?;

    match cli.command {
        Command::Retrieve {
            name_full,
            name_abbr,
            interpro,
            email,
            out_prefix,
            max_seeds,
            taxid,
            reviewed_only,
            api_key,
        } => {
            let mut queries = Vec::new();
            if let Some(q) = name_full {
                queries.push(q);
            }
            if let Some(q) = name_abbr {
                queries.push(q);
            }

            let run = RunConfig {
                email,
                api_key,
                taxid,
                max_seeds,
                reviewed_only,
            };

            info!(
                queries = queries.len(),
                interpro = interpro.as_deref().unwrap_or("-"),
                max_seeds,
                reviewed_only,
                "Starting seed retrieval"
            );

            let pipeline = SeedPipeline::new(run);
            let summary = pipeline
                .run(&queries, interpro.as_deref(), &out_prefix)
                .await?;

            info!(
                gold = summary.gold_count,
                broad = summary.broad_count,
                "Retrieval finished"
            );
        },
    }

    Ok(())
}
