// csv_to_custom — ingest a CSV file into a CCF file (§6).

use ccf_core::{infer_type, CcfWriter, ColumnSchema, DataType, TableSchema};
use clap::Parser;
use eyre::{eyre, Result, WrapErr};
use std::path::PathBuf;
use tracing::instrument;

#[derive(Parser)]
#[command(name = "csv_to_custom")]
#[command(about = "Convert a CSV file into a Compact Columnar File (CCF)")]
#[command(version)]
struct Cli {
    /// Input CSV path
    #[arg(long = "in")]
    input: PathBuf,

    /// Output CCF path
    #[arg(long = "out")]
    output: PathBuf,

    /// Explicit schema, e.g. "age:int,name:str". Without this, types are
    /// inferred per column from the CSV's values.
    #[arg(long)]
    schema: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(&cli).map_err(|e| {
        tracing::error!(error = %e, "csv_to_custom failed");
        e
    })
}

#[instrument(skip(cli), fields(input = %cli.input.display(), output = %cli.output.display()))]
fn run(cli: &Cli) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(&cli.input)
        .wrap_err_with(|| format!("opening CSV input {}", cli.input.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .wrap_err("reading CSV header row")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.wrap_err("reading CSV data row")?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    let schema = match &cli.schema {
        Some(spec) => parse_schema(spec, &headers)?,
        None => infer_schema(&headers, &rows)?,
    };

    CcfWriter::write(&cli.output, &schema, &rows)
        .wrap_err_with(|| format!("writing CCF output {}", cli.output.display()))?;

    tracing::info!(
        rows = rows.len(),
        columns = schema.len(),
        "wrote CCF file"
    );
    Ok(())
}

/// Infer each column's type independently from its text values (§4.1).
fn infer_schema(headers: &[String], rows: &[Vec<String>]) -> Result<TableSchema> {
    let columns = headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<&str> = rows
                .iter()
                .map(|row| row.get(i).map(String::as_str).unwrap_or(""))
                .collect();
            ColumnSchema {
                name: name.clone(),
                dtype: infer_type(&values),
            }
        })
        .collect();
    Ok(TableSchema::new(columns)?)
}

fn parse_schema(spec: &str, headers: &[String]) -> Result<TableSchema> {
    let mut columns = Vec::new();
    for entry in spec.split(',') {
        let entry = entry.trim();
        let (name, type_str) = entry
            .split_once(':')
            .ok_or_else(|| eyre!("malformed schema entry '{}', expected name:type", entry))?;
        let dtype = parse_type(type_str)?;
        columns.push(ColumnSchema {
            name: name.to_string(),
            dtype,
        });
    }
    if columns.len() != headers.len() {
        return Err(eyre!(
            "schema declares {} columns but the CSV header has {}",
            columns.len(),
            headers.len()
        ));
    }
    Ok(TableSchema::new(columns)?)
}

fn parse_type(type_str: &str) -> Result<DataType> {
    match type_str {
        "int" | "int32" => Ok(DataType::Int32),
        "float" | "float64" => Ok(DataType::Float64),
        "str" => Ok(DataType::String),
        other => Err(eyre!(
            "unknown schema type '{}', expected one of int, int32, float, float64, str",
            other
        )),
    }
}
