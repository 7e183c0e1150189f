//! Render the stock chart to an SVG or PNG file
//!
//! Fetches the dataset from a running `stockchart-server` (or reads a CSV
//! directly), applies the requested time range and prints the summary panel.

use anyhow::Context;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use std::path::PathBuf;
use stockchart_visualization::{
    source::DEFAULT_URL, ChartController, ChartLayout, ChartStyle, ColorScheme, DataSource,
    FileSource, HttpSource, Sign, Summary, TimeRange, DEFAULT_WIDTH,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stockchart-render", version, about = "Render a price/volume chart")]
struct Args {
    /// Dataset endpoint
    #[arg(long, env = "STOCKCHART_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Read this CSV instead of calling the server
    #[arg(long, conflicts_with = "url")]
    csv: Option<PathBuf>,

    /// Time range: 1M, 3M, 6M, 1Y or ALL
    #[arg(long, short = 'r', default_value = "ALL")]
    range: TimeRange,

    /// Container width in pixels
    #[arg(long, short = 'w', default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// light or dark
    #[arg(long, default_value = "light")]
    theme: ColorScheme,

    /// Output file; `.png` selects PNG, anything else SVG
    #[arg(long, short = 'o', default_value = "stock-chart.svg")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let layout = ChartLayout::default().resized(args.width);
    layout.validate()?;

    let mut chart = ChartController::new(layout, ChartStyle::with_colors(args.theme));

    match &args.csv {
        Some(path) => fetch(&mut chart, &FileSource::new(path)).await?,
        None => fetch(&mut chart, &HttpSource::new(&args.url)).await?,
    }

    chart.select_range(args.range);
    let visible = chart.state().visible().len();
    println!("📊 {} records in range {}", visible, args.range);

    match chart.summary() {
        Some(summary) => println!("{}", summary_table(&summary)),
        None => println!("⚠️  Fewer than two records in range, no summary"),
    }

    chart
        .export(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("✅ {}", args.output.display());
    Ok(())
}

async fn fetch<S: DataSource>(chart: &mut ChartController, source: &S) -> anyhow::Result<()> {
    chart.load(source).await.context("Failed to load data")
}

fn summary_table(summary: &Summary) -> Table {
    let change_color = match summary.sign {
        Sign::Positive => Color::Green,
        Sign::Negative => Color::Red,
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    for (label, value) in summary.rows() {
        let cell = Cell::new(value);
        let cell = if label == "Change" { cell.fg(change_color) } else { cell };
        table.add_row(vec![Cell::new(label), cell]);
    }
    table
}
