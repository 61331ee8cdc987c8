use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::WorkStatus;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Client, job and invoice tracking for small studios")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Folio Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, short, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "FOLIO_DB", help = "Path to the database file")]
    pub db: Option<PathBuf>,

    #[arg(long, short, help = "Verbose output")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Manage clients")]
    Client {
        #[command(subcommand)]
        action: ClientAction,
    },

    #[command(about = "Record and update jobs")]
    Job {
        #[command(subcommand)]
        action: JobAction,
    },

    #[command(about = "Unbilled totals and upcoming deadlines")]
    Dashboard,

    #[command(about = "Earnings overview")]
    Revenue {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    #[command(about = "Draft, send and settle invoices")]
    Invoice {
        #[command(subcommand)]
        action: InvoiceAction,
    },

    #[command(about = "Company details printed on invoices")]
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    #[command(about = "Bank accounts printed on invoices")]
    Bank {
        #[command(subcommand)]
        action: BankAction,
    },

    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    #[command(about = "Copy the database to a file")]
    Backup {
        #[arg(help = "Destination file (defaults to the backups folder)")]
        path: Option<PathBuf>,
    },

    #[command(about = "Generate shell completions", hide = true)]
    Completions {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ClientAction {
    #[command(about = "Add a client")]
    Add {
        #[arg(help = "Client name")]
        name: String,

        #[arg(long, help = "Phone number")]
        phone: Option<String>,

        #[arg(long, help = "Monthly package price (makes this a package client)")]
        package: Option<String>,
    },

    #[command(about = "List clients")]
    List,

    #[command(about = "Show a client and their work")]
    Show {
        #[arg(help = "Client ID")]
        id: i64,
    },

    #[command(about = "Delete a client without recorded work")]
    Delete {
        #[arg(help = "Client ID")]
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum JobAction {
    #[command(about = "Record a job")]
    Add {
        #[arg(help = "Client ID")]
        client: i64,

        #[arg(help = "What was done")]
        description: String,

        #[arg(help = "Cost (defaults to the client's package price)")]
        cost: Option<String>,

        #[arg(long, help = "Due date (YYYY-MM-DD)")]
        due: Option<String>,

        #[arg(long, help = "Split into advance and final balance; percent up front")]
        split: Option<Option<u32>>,
    },

    #[command(about = "List jobs, newest first")]
    List {
        #[arg(long, help = "Filter by status")]
        status: Option<StatusArg>,

        #[arg(long, help = "Filter by client ID")]
        client: Option<i64>,
    },

    #[command(about = "Change a job's status")]
    Status {
        #[arg(help = "Work item ID")]
        id: i64,

        #[arg(help = "New status")]
        status: StatusArg,
    },

    #[command(about = "Delete an unbilled job")]
    Delete {
        #[arg(help = "Work item ID")]
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum InvoiceAction {
    #[command(about = "Unbilled work per client")]
    Pending,

    #[command(about = "Preview the invoice for a client")]
    Show {
        #[arg(help = "Client ID")]
        client: i64,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    #[command(about = "Mark a client's unbilled work as billed")]
    Bill {
        #[arg(help = "Client ID")]
        client: i64,
    },

    #[command(about = "Confirm payment and assign the invoice number")]
    Pay {
        #[arg(help = "Client ID")]
        client: i64,
    },

    #[command(about = "Recent payments")]
    History {
        #[arg(long, help = "Number of entries to show")]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    #[command(about = "Show company details")]
    Show,

    #[command(about = "Set a company field (name, slogan, address, email, phone, footer)")]
    Set {
        #[arg(help = "Field name")]
        field: String,

        #[arg(help = "New value; empty clears the field")]
        value: String,
    },
}

#[derive(Subcommand)]
pub enum BankAction {
    #[command(about = "Add a bank account")]
    Add {
        #[arg(help = "Bank name")]
        bank: String,

        #[arg(help = "Account number")]
        account_number: String,

        #[arg(long, help = "Branch name")]
        branch: Option<String>,

        #[arg(long, help = "Account holder name")]
        holder: Option<String>,
    },

    #[command(about = "List bank accounts")]
    List,

    #[command(about = "Remove a bank account")]
    Remove {
        #[arg(help = "Bank account ID")]
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    #[command(about = "Show current configuration")]
    Show,

    #[command(about = "Set configuration value")]
    Set {
        #[arg(help = "Configuration key")]
        key: String,

        #[arg(help = "Configuration value")]
        value: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Unbilled,
    Billed,
    Paid,
}

impl From<StatusArg> for WorkStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Unbilled => WorkStatus::Unbilled,
            StatusArg::Billed => WorkStatus::Billed,
            StatusArg::Paid => WorkStatus::Paid,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl Cli {
    pub fn generate_completions(shell: Shell) {
        use clap_complete::{generate, shells};
        use std::io;

        let mut cmd = Self::command();
        match shell {
            Shell::Bash => generate(shells::Bash, &mut cmd, "folio", &mut io::stdout()),
            Shell::Zsh => generate(shells::Zsh, &mut cmd, "folio", &mut io::stdout()),
            Shell::Fish => generate(shells::Fish, &mut cmd, "folio", &mut io::stdout()),
            Shell::PowerShell => generate(shells::PowerShell, &mut cmd, "folio", &mut io::stdout()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_job_add() {
        let cli = Cli::try_parse_from([
            "folio", "job", "add", "3", "Website", "10000", "--due", "2025-12-20", "--split", "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Job {
                action: JobAction::Add { client, cost, due, split, .. },
            } => {
                assert_eq!(client, 3);
                assert_eq!(cost.as_deref(), Some("10000"));
                assert_eq!(due.as_deref(), Some("2025-12-20"));
                assert_eq!(split, Some(Some(30)));
            }
            _ => panic!("expected job add"),
        }
    }

    #[test]
    fn test_split_without_percent() {
        let cli = Cli::try_parse_from(["folio", "job", "add", "3", "Website", "--split"]).unwrap();
        match cli.command {
            Commands::Job {
                action: JobAction::Add { cost, split, .. },
            } => {
                assert_eq!(cost, None);
                assert_eq!(split, Some(None));
            }
            _ => panic!("expected job add"),
        }
    }

    #[test]
    fn test_status_argument() {
        let cli = Cli::try_parse_from(["folio", "job", "status", "7", "paid"]).unwrap();
        match cli.command {
            Commands::Job {
                action: JobAction::Status { id, status },
            } => {
                assert_eq!(id, 7);
                assert_eq!(WorkStatus::from(status), WorkStatus::Paid);
            }
            _ => panic!("expected job status"),
        }
        assert!(Cli::try_parse_from(["folio", "job", "status", "7", "lost"]).is_err());
    }
}
