use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::application::{AlertStatus, Dashboard, LedgerService};
use crate::config::Config;
use crate::domain::{Category, Cents, MonthlyTotal, format_money, parse_cents};
use crate::notify::{Notifier, SmtpNotifier};

const CHART_WIDTH: usize = 40;
const DESCRIPTION_COLUMN_WIDTH: usize = 40;

/// Expenso - Personal Expense Log
#[derive(Parser)]
#[command(name = "expenso")]
#[command(about = "Log daily expenses, chart monthly spending and get an email when a month goes over budget")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "expenso.json")]
    pub config: PathBuf,

    /// Directory holding the expense and settings files (overrides the config file)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Do not send the budget alert email, even when over budget
    #[arg(long, global = true)]
    pub no_alert: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record an expense
    Add {
        /// Amount spent (e.g., "12.50" or "12")
        amount: String,

        /// Category: food, transport, shopping, bills, health, entertainment, others
        #[arg(short, long, default_value = "Others")]
        category: String,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Optional note, up to 100 characters
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List expenses, most recent first
    List {
        /// Maximum number of expenses to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Delete every recorded expense
    DeleteAll,

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Show monthly totals and this month's budget status
    Summary {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List the available categories
    Categories,
}

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set the monthly budget limit (0 disables alerts)
    Set {
        /// Budget amount (e.g., "5000" or "5000.00")
        amount: String,
    },

    /// Show the monthly budget limit
    Show,
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    #[serde(flatten)]
    dashboard: &'a Dashboard,
    alert: &'a AlertStatus,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config)?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }

    /// Build the mail notifier, unless alerts are switched off or not configured.
    fn notifier(&self, config: &Config) -> Option<SmtpNotifier> {
        if self.no_alert {
            return None;
        }
        let mail = config.mail.as_ref()?;
        match SmtpNotifier::new(mail, config.currency_symbol.clone()) {
            Ok(notifier) => Some(notifier),
            Err(err) => {
                tracing::warn!(error = %err, "invalid mail settings, budget alerts disabled");
                println!("Budget alerts disabled: invalid mail settings ({}).", err);
                None
            }
        }
    }

    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let config = self.load_config()?;
        let mut service = LedgerService::from_config(&config).with_context(|| {
            format!(
                "Failed to load ledger from {}",
                config.data_dir.display()
            )
        })?;
        let symbol = config.currency_symbol.as_str();
        let today = Local::now().date_naive();

        match &self.command {
            Commands::Add {
                amount,
                category,
                date,
                description,
            } => {
                let amount_cents =
                    parse_cents(amount).context("Invalid amount format. Use '12.50' or '12'")?;
                let category: Category = category.parse().map_err(|e| {
                    anyhow::anyhow!(
                        "{}. Valid categories: {}",
                        e,
                        category_names().join(", ")
                    )
                })?;
                let date = match date {
                    Some(date_str) => parse_date(date_str)?,
                    None => today,
                };

                let expense =
                    service.add_expense(date, category, amount_cents, description.clone())?;
                println!(
                    "Added expense: {} {} on {}",
                    format_money(symbol, expense.amount_cents),
                    expense.category,
                    expense.date
                );

                let notifier = self.notifier(&config);
                let (dashboard, alert) =
                    service.render_dashboard(today, notifier.as_ref().map(|n| n as &dyn Notifier));
                print_budget_status(&dashboard, symbol);
                print_alert_status(&alert);
            }

            Commands::List { limit } => {
                let expenses = service.expenses_newest_first();
                if expenses.is_empty() {
                    println!("No expenses yet. Start adding your expenses with `expenso add`.");
                } else {
                    println!(
                        "{:<12} {:<14} {:>12}  {}",
                        "DATE", "CATEGORY", "AMOUNT", "DESCRIPTION"
                    );
                    println!("{}", "-".repeat(80));
                    for expense in expenses.iter().take(limit.unwrap_or(usize::MAX)) {
                        println!(
                            "{:<12} {:<14} {:>12}  {}",
                            expense.date.to_string(),
                            expense.category,
                            format_money(symbol, expense.amount_cents),
                            truncate(&expense.description, DESCRIPTION_COLUMN_WIDTH)
                        );
                    }
                }
            }

            Commands::DeleteAll => {
                let count = service.expenses().len();
                service.delete_all()?;
                println!("All expense data has been deleted ({} expenses).", count);
            }

            Commands::Budget(BudgetCommands::Set { amount }) => {
                let budget = parse_cents(amount)
                    .context("Invalid budget format. Use '5000.00' or '5000'")?;
                service.set_budget(budget)?;
                if budget == 0 {
                    println!("Budget limit cleared, alerts are off.");
                } else {
                    println!("Budget limit saved: {}", format_money(symbol, budget));
                }
            }

            Commands::Budget(BudgetCommands::Show) => {
                let budget = service.budget();
                if budget == 0 {
                    println!("No monthly budget set.");
                } else {
                    println!("Monthly budget: {}", format_money(symbol, budget));
                }
            }

            Commands::Summary { format } => {
                let notifier = self.notifier(&config);
                let (dashboard, alert) =
                    service.render_dashboard(today, notifier.as_ref().map(|n| n as &dyn Notifier));

                match format.as_str() {
                    "json" => {
                        let output = SummaryOutput {
                            dashboard: &dashboard,
                            alert: &alert,
                        };
                        println!("{}", serde_json::to_string_pretty(&output)?);
                    }
                    "table" => {
                        print_summary(&dashboard, symbol);
                        print_alert_status(&alert);
                    }
                    other => anyhow::bail!("Unknown format '{}'. Use 'table' or 'json'", other),
                }
            }

            Commands::Categories => {
                for name in category_names() {
                    println!("{}", name);
                }
            }
        }

        Ok(())
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_directive = if verbose { "expenso=debug" } else { "expenso=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

fn print_summary(dashboard: &Dashboard, symbol: &str) {
    if dashboard.is_empty() {
        println!("No expenses yet. Start adding your expenses with `expenso add`.");
        return;
    }

    println!("Monthly Spending Summary");
    println!("{}", "-".repeat(24));
    for line in chart_lines(&dashboard.monthly_totals, symbol) {
        println!("{}", line);
    }
    println!();
    print_budget_status(dashboard, symbol);
}

fn print_budget_status(dashboard: &Dashboard, symbol: &str) {
    let spend = format_money(symbol, dashboard.current_month_spend);
    let budget = format_money(symbol, dashboard.budget);
    if dashboard.over_budget {
        println!(
            "You exceeded your monthly budget of {}! You've spent {}.",
            budget, spend
        );
    } else {
        println!("This month ({}): {} / {}", dashboard.current_month, spend, budget);
    }
}

fn print_alert_status(alert: &AlertStatus) {
    match alert {
        AlertStatus::NotTriggered => {}
        AlertStatus::Sent => println!("Budget alert email sent."),
        AlertStatus::Disabled => {
            println!("Budget alert email not sent: no mail settings configured.")
        }
        AlertStatus::Failed(err) => eprintln!("Failed to send budget alert email: {}", err),
    }
}

/// Render monthly totals as a horizontal bar chart, one line per month.
fn chart_lines(totals: &[MonthlyTotal], symbol: &str) -> Vec<String> {
    let max = totals.iter().map(|t| t.total).max().unwrap_or(0);
    totals
        .iter()
        .map(|t| {
            format!(
                "{}  {:>14}  {}",
                t.month,
                format_money(symbol, t.total),
                "█".repeat(bar_width(t.total, max))
            )
        })
        .collect()
}

fn bar_width(value: Cents, max: Cents) -> usize {
    if value <= 0 || max <= 0 {
        return 0;
    }
    let scaled = i128::from(value) * CHART_WIDTH as i128 / i128::from(max);
    (scaled as usize).max(1)
}

fn category_names() -> Vec<&'static str> {
    Category::ALL.iter().map(|c| c.as_str()).collect()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").context("Date must be in YYYY-MM-DD format")
}
