use std::io::stdout;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, Month};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use crate::application::{ExpenseService, LedgerError};
use crate::domain::{DATE_FORMAT, ExpenseId, ExpenseUpdate, Ledger, format_cents, parse_amount};
use crate::io::Exporter;
use crate::storage::Store;

/// Expenses - Personal Expense Tracker
#[derive(Parser, Debug)]
#[command(name = "expenses")]
#[command(about = "A local-first personal expense tracker")]
#[command(version)]
pub struct Cli {
    /// Expense file path
    #[arg(
        short,
        long,
        env = "EXPENSES_FILE",
        default_value = "data.json",
        global = true
    )]
    pub file: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value_t = LevelFilter::WARN, global = true)]
    pub log_level: LevelFilter,

    /// Do not take the advisory lock file while changing expenses
    #[arg(long, global = true)]
    pub no_lock: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new expense
    Add {
        /// What the money was spent on
        description: String,

        /// Amount spent (e.g., "12.50" or "20")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Spending date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change one or more fields of an expense
    Update {
        /// Expense ID
        id: ExpenseId,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New amount
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,

        /// New spending date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// List all expenses
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the total of all expenses, or of one month
    Summary {
        /// Month number (1-12), matched across all years
        #[arg(short, long)]
        month: Option<u32>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl Cli {
    fn service(&self) -> ExpenseService {
        let store = Store::new(self.file.clone());
        let store = if self.no_lock {
            store.without_locking()
        } else {
            store
        };
        ExpenseService::new(store)
    }

    pub fn run(self) -> Result<()> {
        let service = self.service();
        debug!("Using expense file {}", service.store().path().display());

        match self.command {
            Commands::Add {
                description,
                amount,
                date,
            } => {
                let amount = parse_amount(&amount).map_err(LedgerError::from)?;
                let date = date.unwrap_or_else(today);
                let id = service.add(&description, amount, &date)?;
                println!("Expense added successfully (ID: {})", id);
            }

            Commands::Update {
                id,
                description,
                amount,
                date,
            } => {
                let amount = amount
                    .map(|a| parse_amount(&a))
                    .transpose()
                    .map_err(LedgerError::from)?;
                let update = ExpenseUpdate {
                    description,
                    amount,
                    date,
                };
                if update.is_empty() {
                    anyhow::bail!(
                        "Nothing to update. Pass --description, --amount or --date"
                    );
                }

                match service.update(id, update)? {
                    Some(_) => println!("Expense {} updated successfully", id),
                    None => println!("Expense with ID {} not found", id),
                }
            }

            Commands::Delete { id } => match service.delete(id)? {
                Some(_) => println!("Expense deleted successfully"),
                None => println!("Expense with ID {} not found", id),
            },

            Commands::List { format } => {
                let ledger = service.list()?;
                run_list_command(&ledger, format)?;
            }

            Commands::Summary { month } => match month {
                Some(month) => {
                    let total = service.monthly_summary(month)?;
                    println!(
                        "Total expenses for {}: ${}",
                        month_name(month),
                        format_cents(total)
                    );
                }
                None => {
                    let total = service.total_summary()?;
                    println!("Total expenses: ${}", format_cents(total));
                }
            },
        }

        Ok(())
    }
}

fn run_list_command(ledger: &Ledger, format: OutputFormat) -> Result<()> {
    let exporter = Exporter::new(ledger);
    match format {
        OutputFormat::Json => {
            exporter
                .export_json(stdout())
                .context("Failed to write JSON output")?;
        }
        OutputFormat::Csv => {
            exporter
                .export_csv(stdout())
                .context("Failed to write CSV output")?;
        }
        OutputFormat::Table => {
            if ledger.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }
            println!(
                "{:<6} {:<10}  {:<30} {:>12}",
                "ID", "DATE", "DESCRIPTION", "AMOUNT"
            );
            println!("{}", "-".repeat(62));
            for expense in ledger {
                println!(
                    "{:<6} {:<10}  {:<30} {:>12}",
                    expense.id,
                    expense.date.format(DATE_FORMAT),
                    truncate(&expense.description, 30),
                    format!("${}", format_cents(expense.amount))
                );
            }
        }
    }
    Ok(())
}

fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
