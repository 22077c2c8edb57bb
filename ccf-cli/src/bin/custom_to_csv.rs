// custom_to_csv — emit a CCF file's columns back out as CSV (§6).

use ccf_core::CcfReader;
use clap::Parser;
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tracing::instrument;

#[derive(Parser)]
#[command(name = "custom_to_csv")]
#[command(about = "Convert a Compact Columnar File (CCF) into CSV")]
#[command(version)]
struct Cli {
    /// Input CCF path
    #[arg(long = "in")]
    input: PathBuf,

    /// Output CSV path
    #[arg(long = "out")]
    output: PathBuf,

    /// Comma-separated column names to emit, in that order. Without this,
    /// all columns are written in file order.
    #[arg(long)]
    columns: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(&cli).map_err(|e| {
        tracing::error!(error = %e, "custom_to_csv failed");
        e
    })
}

#[instrument(skip(cli), fields(input = %cli.input.display(), output = %cli.output.display()))]
fn run(cli: &Cli) -> Result<()> {
    let reader = CcfReader::open(&cli.input)
        .wrap_err_with(|| format!("opening CCF input {}", cli.input.display()))?;

    let requested: Option<Vec<String>> = cli
        .columns
        .as_ref()
        .map(|s| s.split(',').map(|c| c.trim().to_string()).collect());

    let (names, rows) = reader
        .read_table(requested.as_deref())
        .wrap_err("reading table from CCF file")?;

    let mut writer = csv::WriterBuilder::new()
        .from_path(&cli.output)
        .wrap_err_with(|| format!("opening CSV output {}", cli.output.display()))?;

    writer
        .write_record(&names)
        .wrap_err("writing CSV header row")?;
    for row in &rows {
        writer.write_record(row).wrap_err("writing CSV data row")?;
    }
    writer.flush().wrap_err("flushing CSV output")?;

    tracing::info!(rows = rows.len(), columns = names.len(), "wrote CSV file");
    Ok(())
}
