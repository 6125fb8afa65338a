use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use carbon_regions::app::bootstrap::build_use_case;
use carbon_regions::config::Config;
use carbon_regions::logging;

#[derive(Parser)]
#[command(name = "carbon_regions")]
#[command(about = "Adds Electricity Maps zones and WattTime regions to a cloud region table")]
#[command(version)]
struct Cli {
    /// Region table to enrich (CSV with a header row)
    input: PathBuf,

    /// Write the enriched table here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Settings file (TOML) with endpoints and pacing
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pause between rows, in milliseconds (overrides the settings file)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Also write JSON logs to a daily-rotated file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(delay_ms) = cli.delay_ms {
        config.inter_row_delay = Duration::from_millis(delay_ms);
    }

    let use_case = build_use_case(&config).await?;

    let input = File::open(&cli.input)
        .with_context(|| format!("Failed to open input table '{}'", cli.input.display()))?;
    let input = BufReader::new(input);

    let stats = match &cli.output {
        Some(path) => use_case
            .run_to_file(input, path)
            .await
            .with_context(|| format!("Failed to produce output table '{}'", path.display()))?,
        None => {
            let stdout = io::stdout();
            use_case.run(input, BufWriter::new(stdout.lock())).await?
        }
    };

    info!(rows = stats.rows_loaded, lookups = stats.lookups(), "Done");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may come from a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.log_dir.as_deref());

    run(cli).await
}
