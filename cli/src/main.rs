//! unsheet CLI - spreadsheet table extraction tool
//!
//! A command-line tool for printing rows, records, and summary statistics
//! from OOXML (.xlsx) workbooks.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use unsheet::{Extent, Row, Workbook};

/// Tabular data extraction from OOXML spreadsheets
#[derive(Parser)]
#[command(
    name = "unsheet",
    author = "iyulab",
    version,
    about = "Extract tables from OOXML spreadsheets",
    long_about = "unsheet - tabular data extraction from OOXML spreadsheets.\n\n\
                  Reads .xlsx workbooks and prints rows, header-keyed records, and\n\
                  summary statistics to the console."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show workbook structure: sheets, extents, headers, first records
    Info {
        /// Input workbook path
        input: PathBuf,

        /// Worksheet to preview: display name, index, or part file name
        #[arg(short, long, default_value = "0")]
        sheet: String,

        /// Number of preview records
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List archive parts and the shared strings table
    Strings {
        /// Input workbook path
        input: PathBuf,

        /// Maximum shared strings to print (0 = all)
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print worksheet rows in document order
    Rows {
        /// Input workbook path
        input: PathBuf,

        /// Worksheet: display name, index, or part file name
        #[arg(short, long, default_value = "0")]
        sheet: String,

        /// Maximum rows to print (0 = all)
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Per-cell view with references and type codes
        #[arg(long)]
        cells: bool,
    },

    /// Print header-keyed records from a worksheet
    Records {
        /// Input workbook path
        input: PathBuf,

        /// Worksheet: display name, index, or part file name
        #[arg(short, long, default_value = "0")]
        sheet: String,

        /// Maximum records to print (0 = all)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Summarize records: distributions, fill rates, samples
    Stats {
        /// Input workbook path
        input: PathBuf,

        /// Worksheet: display name, index, or part file name
        #[arg(short, long, default_value = "0")]
        sheet: String,

        /// Columns to count value distributions for
        #[arg(short, long)]
        group_by: Vec<String>,

        /// Multi-valued columns to split before counting
        #[arg(long)]
        split: Vec<String>,

        /// Delimiter for --split columns
        #[arg(long, default_value = ",")]
        separator: char,

        /// Entries shown per distribution (0 = all)
        #[arg(short, long, default_value = "15")]
        top: usize,

        /// Placeholder value counted as missing (empty string disables)
        #[arg(long, default_value = "N/A")]
        na: String,

        /// Sample records printed at the end
        #[arg(long, default_value = "3")]
        samples: usize,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info {
            input,
            sheet,
            limit,
        } => {
            let pb = create_spinner("Reading workbook...");
            let workbook = Workbook::open(&input)?;
            pb.finish_and_clear();

            println!("{}", "Workbook".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!(
                "{}: {}",
                "Archive parts".bold(),
                workbook.package().part_count()
            );
            println!(
                "{}: {}",
                "Shared strings".bold(),
                workbook.shared_strings().len()
            );
            println!("{}: {}", "Sheets".bold(), workbook.sheet_count());

            for (idx, info) in workbook.sheets().iter().enumerate() {
                match workbook.rows_at(idx) {
                    Ok(rows) => {
                        let extent = Extent::of(&rows)
                            .map(|e| e.to_string())
                            .unwrap_or_else(|| "empty".to_string());
                        println!("  [{}] {}: {} rows, {}", idx, info.name, rows.len(), extent);
                    }
                    Err(err) => {
                        println!("  [{}] {}: {} {}", idx, info.name, "!".yellow().bold(), err);
                    }
                }
            }

            let rows = preview_rows(&workbook, &sheet);
            let headers = unsheet::headers(&rows);
            if !headers.iter().all(|h| h.is_empty()) {
                println!("\n{}", "Headers".cyan().bold());
                println!("{}", "─".repeat(40));
                for (idx, name) in headers.iter().enumerate() {
                    if !name.is_empty() {
                        println!("  [{}] {}", unsheet::column_label(idx as u32), name);
                    }
                }

                let records = unsheet::to_records(&rows, &headers);
                let shown = records.len().min(limit);
                if shown > 0 {
                    println!("\n{}", format!("First {} records", shown).cyan().bold());
                    println!("{}", "─".repeat(40));
                    print_records(records.iter().take(shown));
                }
            }
        }

        Commands::Strings { input, limit } => {
            let pb = create_spinner("Reading workbook...");
            let workbook = Workbook::open(&input)?;
            pb.finish_and_clear();

            println!("{}", "Archive Parts".cyan().bold());
            println!("{}", "─".repeat(40));
            let mut parts = workbook.package().part_names();
            parts.sort();
            for part in &parts {
                println!("  {part}");
            }

            let table = workbook.shared_strings();
            println!(
                "\n{}",
                format!("Shared Strings ({} entries)", table.len())
                    .cyan()
                    .bold()
            );
            println!("{}", "─".repeat(40));
            if table.is_empty() {
                println!("{} workbook has no shared strings", "!".yellow().bold());
            } else {
                let take = effective(limit);
                for (idx, value) in table.iter().enumerate().take(take) {
                    println!("  [{idx}] {value}");
                }
                if table.len() > take {
                    println!("  ... and {} more", table.len() - take);
                }
            }
        }

        Commands::Rows {
            input,
            sheet,
            limit,
            cells,
        } => {
            let pb = create_spinner("Reading worksheet...");
            let workbook = Workbook::open(&input)?;
            let rows = workbook.rows(&sheet)?;
            pb.finish_and_clear();

            let take = effective(limit);
            for row in rows.iter().take(take) {
                if cells {
                    println!("{}", format!("Row {}", row.number).bold());
                    for cell in &row.cells {
                        println!(
                            "  {}: {} ({})",
                            cell.reference,
                            cell.text(),
                            cell.cell_type.code()
                        );
                    }
                } else {
                    let values: Vec<&str> = row.cells.iter().map(|c| c.text()).collect();
                    println!("{}\t{}", row.number, values.join("\t"));
                }
            }
            if rows.len() > take {
                println!("... and {} more rows", rows.len() - take);
            }
        }

        Commands::Records {
            input,
            sheet,
            limit,
        } => {
            let pb = create_spinner("Extracting records...");
            let workbook = Workbook::open(&input)?;
            let rows = workbook.rows(&sheet)?;
            pb.finish_and_clear();

            let headers = unsheet::headers(&rows);
            if headers.iter().all(|h| h.is_empty()) {
                println!("{} worksheet has no header row", "!".yellow().bold());
                return Ok(());
            }

            let records = unsheet::to_records(&rows, &headers);
            let take = effective(limit);
            print_records(records.iter().take(take));
            println!("\n{}: {}", "Total records".bold(), records.len());
        }

        Commands::Stats {
            input,
            sheet,
            group_by,
            split,
            separator,
            top,
            na,
            samples,
        } => {
            let pb = create_spinner("Analyzing worksheet...");
            let workbook = Workbook::open(&input)?;
            let rows = workbook.rows(&sheet)?;
            pb.finish_and_clear();

            let headers = unsheet::headers(&rows);
            let records = unsheet::to_records(&rows, &headers);
            let na = (!na.is_empty()).then_some(na.as_str());

            println!("{}", "Overview".cyan().bold());
            println!("{}", "─".repeat(40));
            if let Some(extent) = Extent::of(&rows) {
                println!("{}: {}", "Extent".bold(), extent);
            }
            println!("{}: {}", "Data records".bold(), records.len());
            println!(
                "{}: {}",
                "Named columns".bold(),
                headers.iter().filter(|h| !h.is_empty()).count()
            );

            for column in &group_by {
                let counts = unsheet::frequency(&records, column, na);
                print_distribution(&format!("By {column}"), &counts, top);
            }
            for column in &split {
                let counts = unsheet::split_frequency(&records, column, separator, na);
                print_distribution(&format!("By {column} (split)"), &counts, top);
            }

            println!("\n{}", "Fill Rates".cyan().bold());
            println!("{}", "─".repeat(40));
            let rates = unsheet::fill_rates(&records, &headers, na);
            let width = rates
                .iter()
                .map(|(h, _)| unsheet::display_width(h))
                .max()
                .unwrap_or(0);
            for (header, rate) in &rates {
                println!(
                    "  {}  {:>5.1}%",
                    unsheet::pad_label(header, width),
                    rate * 100.0
                );
            }

            if samples > 0 && !records.is_empty() {
                println!("\n{}", "Sample Records".cyan().bold());
                println!("{}", "─".repeat(40));
                print_records(records.iter().take(samples));
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Turn a `0 = all` limit into a usable take count.
fn effective(limit: usize) -> usize {
    if limit == 0 {
        usize::MAX
    } else {
        limit
    }
}

/// Rows for the `info` preview. A sheet that fails to select or parse is
/// reported in place and previewed as empty.
fn preview_rows(workbook: &Workbook, selector: &str) -> Vec<Row> {
    match workbook.rows(selector) {
        Ok(rows) => rows,
        Err(err) => {
            println!("\n{}", sheet_failure(selector, &err));
            Vec::new()
        }
    }
}

fn sheet_failure(selector: &str, err: &unsheet::Error) -> String {
    format!("{} {}: {}", "!".yellow().bold(), selector, err)
}

fn print_records<'a>(records: impl Iterator<Item = &'a unsheet::Record>) {
    for record in records {
        println!("{}", format!("Row {}", record.row).bold());
        for (name, value) in &record.fields {
            println!("  {name}: {value}");
        }
    }
}

fn print_distribution(title: &str, counts: &[(String, usize)], top: usize) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "─".repeat(40));
    if counts.is_empty() {
        println!("  {}", "no values".dimmed());
        return;
    }

    let take = effective(top);
    let width = counts
        .iter()
        .take(take)
        .map(|(v, _)| unsheet::display_width(v))
        .max()
        .unwrap_or(0);
    for (value, count) in counts.iter().take(take) {
        println!("  {}  {}", unsheet::pad_label(value, width), count);
    }
    if counts.len() > take {
        println!("  ... and {} more values", counts.len() - take);
    }
}

fn print_version() {
    println!("{} {}", "unsheet".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Tabular data extraction from OOXML spreadsheets");
    println!();
    println!("Supported format: XLSX");
    println!("Repository: https://github.com/iyulab/unsheet");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
