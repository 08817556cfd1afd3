use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;

use nestedbars::config::ChartConfig;
use nestedbars::table::{StdMode, Table};

#[derive(Parser, Debug)]
#[command(name = "nestedbars")]
#[command(about = "Render grouped bar charts from multi-level indexed CSV data", long_about = None)]
struct Args {
    /// CSV input path; reads from stdin when omitted
    input: Option<PathBuf>,

    /// Index columns, outermost first (repeat the flag or comma-separate)
    #[arg(short, long = "group-by", value_delimiter = ',', required = true)]
    group_by: Vec<String>,

    /// Value column to aggregate
    #[arg(short, long)]
    value: String,

    /// Output PNG path
    #[arg(short, long, default_value = "barplot.png")]
    output: PathBuf,

    /// JSON file with chart options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Error bar mode: auto, always or never
    #[arg(long, default_value = "auto")]
    std: String,

    /// Plot horizontal bars
    #[arg(long)]
    horizontal: bool,

    /// One panel per outermost category
    #[arg(long)]
    subplots: bool,

    /// Figure title
    #[arg(long)]
    title: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let (headers, records) = match &args.input {
        Some(path) => {
            let file = fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_csv(file)?
        }
        None => read_csv(io::stdin())?,
    };

    let std_mode = match args.std.as_str() {
        "auto" => StdMode::Auto,
        "always" => StdMode::Always,
        "never" => StdMode::Never,
        other => bail!("Unknown std mode '{}': expected auto, always or never", other),
    };

    let table = Table::from_records(&headers, &records, &args.group_by, &args.value, std_mode)
        .context("Failed to build table from CSV")?;

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<ChartConfig>(&text)
                .with_context(|| format!("Invalid chart options in {}", path.display()))?
        }
        None => ChartConfig::default(),
    };
    if args.horizontal {
        config.orientation = "horizontal".to_string();
    }
    if args.subplots {
        config.subplots = true;
    }
    if args.title.is_some() {
        config.title = args.title.clone();
    }
    if config.data_label.is_none() {
        config.data_label = Some(args.value.clone());
    }

    nestedbars::save_chart(&table, &config, &args.output)
        .context("Failed to render chart")?;
    println!("Wrote {}", args.output.display());

    Ok(())
}

/// Read CSV headers and records from any reader.
fn read_csv<R: io::Read>(reader: R) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result.context("Failed to read CSV record")?;
        records.push(record.iter().map(str::to_string).collect());
    }
    if records.is_empty() {
        bail!("CSV input contains no data rows");
    }

    Ok((headers, records))
}
