use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use ledger_chart::{ChartSpec, DisplayMode, SeriesKind, build_chart};
use ledger_core::Aggregates;
use ledger_ingest::{CsvColumns, LoadReport, load_transactions};

#[derive(Parser, Debug)]
#[command(name = "ledgerchart", version, about = "Monthly spending-by-category charts from bank CSV exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a CSV and print per-month net totals
    Summary {
        /// Path to the bank CSV export
        #[arg(long)]
        csv: PathBuf,

        #[command(flatten)]
        columns: ColumnArgs,
    },

    /// Build the chart spec once and print it
    Chart {
        /// Path to the bank CSV export
        #[arg(long)]
        csv: PathBuf,

        /// Bar values: percent-of-month shares or signed amounts
        #[arg(long, value_enum, default_value_t = Mode::Percent)]
        mode: Mode,

        /// Leave out the net-balance overlay line
        #[arg(long)]
        hide_total: bool,

        /// Emit the spec as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        columns: ColumnArgs,
    },

    /// Load once, then re-render the chart interactively from stdin commands
    Dashboard {
        /// Path to the bank CSV export
        #[arg(long)]
        csv: PathBuf,

        #[command(flatten)]
        columns: ColumnArgs,
    },
}

/// Header names vary per bank export, so all three are configurable.
#[derive(Args, Debug)]
struct ColumnArgs {
    #[arg(long, default_value = "Transaction Date")]
    date_col: String,

    #[arg(long, default_value = "Category")]
    category_col: String,

    #[arg(long, default_value = "Amount")]
    amount_col: String,
}

impl ColumnArgs {
    fn to_columns(&self) -> CsvColumns {
        CsvColumns {
            date: self.date_col.clone(),
            category: self.category_col.clone(),
            amount: self.amount_col.clone(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    Percent,
    Absolute,
}

impl From<Mode> for DisplayMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Percent => DisplayMode::Percent,
            Mode::Absolute => DisplayMode::Absolute,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Summary { csv, columns } => {
            let report = load(&csv, &columns)?;
            let aggs = Aggregates::from_transactions(&report.transactions);
            print_summary(&report, &aggs);
        }

        Command::Chart {
            csv,
            mode,
            hide_total,
            json,
            columns,
        } => {
            let report = load(&csv, &columns)?;
            let aggs = Aggregates::from_transactions(&report.transactions);
            let spec = build_chart(&aggs, mode.into(), !hide_total);
            if json {
                println!("{}", serde_json::to_string_pretty(&spec)?);
            } else {
                print_chart(&spec);
            }
        }

        Command::Dashboard { csv, columns } => {
            let report = load(&csv, &columns)?;
            // Aggregates are computed once; every interaction below only
            // rebuilds the chart spec from them.
            let aggs = Aggregates::from_transactions(&report.transactions);
            print_summary(&report, &aggs);
            run_dashboard(&aggs)?;
        }
    }

    Ok(())
}

fn load(csv: &PathBuf, columns: &ColumnArgs) -> Result<LoadReport> {
    if !csv.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", csv.display());
    }
    load_transactions(csv, &columns.to_columns())
}

fn print_summary(report: &LoadReport, aggs: &Aggregates) {
    println!(
        "Loaded {} transactions ({} rows dropped for bad amounts)",
        report.transactions.len(),
        report.dropped
    );
    println!(
        "{} categories across {} months\n",
        aggs.colors.len(),
        aggs.totals.len()
    );

    for total in &aggs.totals {
        println!("{}  net {:>12.2}", total.month.format("%Y-%m"), total.amount);
    }
}

fn print_chart(spec: &ChartSpec) {
    println!(
        "primary axis   [{:.2}, {:.2}]",
        spec.primary_axis.min, spec.primary_axis.max
    );
    println!(
        "secondary axis [{:.2}, {:.2}]\n",
        spec.secondary_axis.min, spec.secondary_axis.max
    );

    for series in &spec.series {
        let kind = match series.kind {
            SeriesKind::Bar => "bar",
            SeriesKind::Line => "line",
        };
        let color = series.color.as_deref().unwrap_or("-");
        println!("{} [{}] {}", series.name, kind, color);
        for (x, y) in series.x.iter().zip(&series.y) {
            println!("  {}  {:>12.4}", x, y);
        }
    }
}

/// Read display-mode and total-line commands from stdin, re-emitting the
/// chart spec after each change. One interaction completes before the next
/// line is read.
fn run_dashboard(aggs: &Aggregates) -> Result<()> {
    let mut mode = DisplayMode::Percent;
    let mut show_total = true;

    println!("\ncommands: mode percent|absolute, total on|off, show, quit");
    print!("> ");
    io::stdout().flush()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let mut redraw = true;

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["mode", "percent"] => mode = DisplayMode::Percent,
            ["mode", "absolute"] => mode = DisplayMode::Absolute,
            ["total", "on"] => show_total = true,
            ["total", "off"] => show_total = false,
            ["show"] => {}
            ["quit"] | ["exit"] => break,
            [] => redraw = false,
            other => {
                println!("unknown command: {}", other.join(" "));
                redraw = false;
            }
        }

        if redraw {
            print_chart(&build_chart(aggs, mode, show_total));
        }
        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}
