//! `shelfkeep` command-line shell.
//!
//! # Responsibility
//! - Parse arguments, resolve the data directory and start file logging.
//! - Load records, run one command, and save only after a successful mutation.
//! - Keep all lending rules in `shelfkeep_core`; this crate only renders.

mod commands;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use commands::Outcome;
use log::info;
use shelfkeep_core::{
    default_log_level, init_logging, BookDraft, LendingService, LoanFilter, StoreConfig,
    SystemClock, TextFileStore,
};
use std::path::{Path, PathBuf};

type Service = LendingService<TextFileStore, SystemClock>;

#[derive(Debug, Parser)]
#[command(name = "shelfkeep", version, about = "Library lending ledger")]
struct Cli {
    /// Directory holding books.txt and loans.txt.
    #[arg(
        short = 'd',
        long,
        env = "SHELFKEEP_DATA_DIR",
        default_value = "data",
        global = true
    )]
    data_dir: PathBuf,

    /// trace|debug|info|warn|error. Defaults by build profile.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the catalogue.
    Books {
        /// natural, title-asc, year-desc or available-desc.
        #[arg(long, default_value = "natural")]
        sort: String,
        /// Case-insensitive text to match in any column.
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a book; every copy starts on the shelf.
    Add(BookArgs),
    /// Edit a book, keeping copies on loan.
    Update {
        id: String,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Delete a book with no copies on loan.
    Delete { id: String },
    /// Lend one copy for seven days.
    Borrow {
        book_id: String,
        #[arg(long)]
        borrower: String,
    },
    /// Close a loan and settle its fine.
    Return { trx_id: String },
    /// Loan history with the fine owed as of a date.
    Loans {
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        /// Date to project open fines to (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Catalogue and lending totals.
    Stats,
    /// Id the next added book will get.
    NextId,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Books { .. } => "books",
            Self::Add(_) => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Borrow { .. } => "borrow",
            Self::Return { .. } => "return",
            Self::Loans { .. } => "loans",
            Self::Stats => "stats",
            Self::NextId => "next-id",
        }
    }
}

#[derive(Debug, clap::Args)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long, allow_hyphen_values = true)]
    year: i32,
    #[arg(long, allow_hyphen_values = true)]
    total: i64,
}

impl BookArgs {
    fn draft(&self) -> BookDraft {
        BookDraft::new(&self.title, &self.author, self.year, self.total)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    All,
    Borrowed,
    Returned,
}

impl From<StatusArg> for LoanFilter {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::All => Self::All,
            StatusArg::Borrowed => Self::Borrowed,
            StatusArg::Returned => Self::Returned,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = absolute_dir(&cli.data_dir)?;

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, data_dir.join("logs")) {
        eprintln!("warning: file logging disabled: {err}");
    }

    execute(&data_dir, cli.command)?;
    Ok(())
}

/// Loads `data_dir`, runs `command` and saves only when it changed records.
fn execute(data_dir: &Path, command: Command) -> Result<Outcome> {
    let mut service = LendingService::new(TextFileStore::new(StoreConfig::in_dir(data_dir)));
    service
        .load_all()
        .with_context(|| format!("failed to load records from {}", data_dir.display()))?;

    info!(
        "event=cli_command module=cli status=start command={}",
        command.name()
    );
    let outcome = run(&mut service, command)?;
    if outcome == Outcome::Changed {
        service.save_all().context("failed to save records")?;
    }
    Ok(outcome)
}

fn run(service: &mut Service, command: Command) -> Result<Outcome> {
    match command {
        Command::Books { sort, search } => commands::list_books(service, &sort, search.as_deref()),
        Command::Add(book) => commands::add_book(service, &book.draft()),
        Command::Update { id, book } => commands::update_book(service, &id, &book.draft()),
        Command::Delete { id } => commands::delete_book(service, &id),
        Command::Borrow { book_id, borrower } => {
            commands::borrow_book(service, &book_id, &borrower)
        }
        Command::Return { trx_id } => commands::return_book(service, &trx_id),
        Command::Loans { status, as_of } => {
            let as_of = as_of.unwrap_or_else(|| service.today());
            commands::list_loans(service, status.into(), as_of)
        }
        Command::Stats => commands::show_stats(service),
        Command::NextId => {
            println!("{}", service.next_book_id_preview());
            Ok(Outcome::Unchanged)
        }
    }
}

fn absolute_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(dir))
}
