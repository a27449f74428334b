use anyhow::{Context, Result};
use book_ledger::{
    write_export, write_template, Config, DateRange, Library, RecordKind, ReportFilter,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

/// Book distribution-expense ledger
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Categories CSV to import (replaces the sample categories)
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    /// Books CSV to import (replaces the sample books)
    #[arg(long, global = true)]
    books: Option<PathBuf>,

    /// Print dashboard and report output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Totals, counts and recent books
    Dashboard {
        /// Number of recent books to list
        #[arg(long)]
        recent: Option<usize>,
    },
    /// Expense report by category and month
    Report {
        /// all | last30days | last90days | last1year
        #[arg(long, default_value = "all")]
        range: DateRange,
        /// Restrict to one category id
        #[arg(long)]
        category: Option<String>,
        /// Write the category report as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Write (or print) an import template
    Template {
        /// books | categories
        kind: RecordKind,
        /// Directory to write the template into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the current books or categories
    List {
        /// books | categories
        kind: RecordKind,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env();
    init_tracing(&config);
    config.log_rejected();

    let mut library = Library::with_sample_data();

    // Categories first so book files can reference them
    if let Some(path) = &args.categories {
        import(&mut library, path, RecordKind::Categories);
    }
    if let Some(path) = &args.books {
        import(&mut library, path, RecordKind::Books);
    }

    match args.command {
        Command::Dashboard { recent } => {
            run_dashboard(&library, recent.unwrap_or(config.recent_books), args.json)?
        }
        Command::Report { range, category, export } => {
            run_report(&library, range, category, export, args.json)?
        }
        Command::Template { kind, out } => run_template(kind, out)?,
        Command::List { kind } => run_list(&library, kind),
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    if let Err(e) = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Import errors are shown verbatim; the previous records are left as they were
fn import(library: &mut Library, path: &Path, kind: RecordKind) {
    match library.import_file(path, kind) {
        Ok(count) => println!("✓ Successfully imported {} {}", count, kind.code()),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}

fn run_dashboard(library: &Library, recent: usize, json: bool) -> Result<()> {
    let stats = library.dashboard(recent);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("📊 Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", stats.summary());

    println!("\nExpenses by category:");
    for slice in &stats.expenses_by_category {
        println!(
            "  {:<24} ${:>10.2}  ({} books)",
            slice.name, slice.total, slice.book_count
        );
    }

    println!("\nExpenses by month:");
    for bucket in &stats.monthly_expenses {
        println!("  {}  ${:>10.2}", bucket.month, bucket.total_expense);
    }

    println!("\nRecent books:");
    for book in &stats.recent_books {
        println!(
            "  {:<32} {:<20} {:<20} ${:.2}",
            book.title,
            book.author,
            book.category_label(),
            book.distribution_expense
        );
    }

    Ok(())
}

fn run_report(
    library: &Library,
    range: DateRange,
    category: Option<String>,
    export: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut filter = ReportFilter::all().with_date_range(range);
    if let Some(id) = &category {
        filter = filter.with_category(id);
    }

    let report = library.report(filter, Utc::now().date_naive());

    if let Some(path) = &export {
        write_export(&report.categories, path)?;
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📈 {}", report.summary());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Total ${:.2} | Average ${:.2} | Highest ${:.2} | Lowest ${:.2}",
        report.summary.total_expense,
        report.summary.average_expense,
        report.summary.max_expense,
        report.summary.min_expense
    );

    println!("\nBy category:");
    for row in &report.categories {
        println!(
            "  {:<24} ${:>10.2}  {:>3} books  avg ${:>8.2}  {:>5.1}%",
            row.name, row.total_expense, row.book_count, row.average_expense, row.percent_of_grand_total
        );
    }

    println!("\nMonthly trend:");
    for bucket in &report.monthly_trend {
        println!(
            "  {}  ${:>10.2}  ({} books)",
            bucket.month, bucket.total_expense, bucket.book_count
        );
    }

    if let Some(path) = export {
        println!("\n✓ Report written to {}", path.display());
    }

    Ok(())
}

fn run_template(kind: RecordKind, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(dir) => {
            let path = write_template(kind, &dir)
                .with_context(|| format!("Failed to write template into {}", dir.display()))?;
            println!("✓ Template written to {}", path.display());
        }
        None => println!("{}", book_ledger::template(kind)),
    }

    Ok(())
}

fn run_list(library: &Library, kind: RecordKind) {
    match kind {
        RecordKind::Books => {
            for book in library.books() {
                let category = library
                    .category_of(book)
                    .map_or("Unknown", |category| category.name.as_str());
                println!(
                    "{}  {:<32} {:<20} {:<12} {:<20} ${:.2}",
                    book.id, book.title, book.author, book.publishing_date, category, book.distribution_expense
                );
            }
        }
        RecordKind::Categories => {
            for category in library.categories() {
                println!(
                    "{}  {:<24} {}  {}",
                    category.id,
                    category.name,
                    category.color,
                    category.description.as_deref().unwrap_or("")
                );
            }
        }
    }
}
