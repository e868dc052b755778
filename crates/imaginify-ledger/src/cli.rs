//! CLI module for imaginify-ledger.
//!
//! Command-line management of user accounts and credit balances. Usable as a
//! standalone binary or as the `accounts` subcommand of the main `imaginify`
//! CLI.
//!
//! # Usage
//!
//! ```bash
//! # Initialize database schema
//! imaginify-ledger -d sqlite:users.db?mode=rwc init
//!
//! # Fetch an account, provisioning it on first access
//! imaginify-ledger -d sqlite:users.db ensure user_2abc
//!
//! # Spend three credits
//! imaginify-ledger -d sqlite:users.db credits 1 -- -3
//!
//! # Charge one transformation
//! imaginify-ledger -d sqlite:users.db charge 1 removeBackground
//!
//! # List all accounts as JSON
//! imaginify-ledger -d sqlite:users.db --format json list
//! ```

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use imaginify_config::{
    CliOverrides, Config, DatabaseConfig, LedgerSettings, LoggingConfig, apply_overrides,
    load_config, validate_config,
};
use tabled::{Table, Tabled};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::memory::MemoryStore;
use crate::sql::{SqlStore, SqlStoreConfig};
use crate::store::{
    AccountId, AccountLedger, AccountPatch, AccountStore, LedgerConfig, NewAccount,
    OverdraftPolicy, UserAccount,
};
use crate::transformation::TransformationType;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Account ledger management CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "imaginify-ledger",
    version,
    about = "Manage Imaginify user accounts and credits"
)]
pub struct LedgerArgs {
    /// Config file (json, yaml, toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: CliOverrides,

    #[command(subcommand)]
    pub command: LedgerCommands,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Ledger CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum LedgerCommands {
    /// Initialize database schema.
    Init,

    /// Create an account from an explicit profile.
    Create {
        /// Identity-provider subject id.
        subject_id: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        username: String,
        #[arg(long, default_value = "")]
        photo: String,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
    },

    /// Show an account.
    Get {
        /// Subject id to look up.
        #[arg(group = "target")]
        subject_id: Option<String>,
        /// Internal account id to look up.
        #[arg(long, group = "target")]
        id: Option<AccountId>,
    },

    /// Show an account, provisioning a placeholder one if missing.
    Ensure { subject_id: String },

    /// Update profile fields.
    Update {
        subject_id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        photo: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        plan_id: Option<i64>,
    },

    /// Delete an account.
    Delete { subject_id: String },

    /// Add a signed delta to an account's balance.
    Credits {
        id: AccountId,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },

    /// Charge the fee for one transformation.
    Charge {
        id: AccountId,
        /// restore, removeBackground, fill, remove, recolor
        kind: String,
    },

    /// List all accounts.
    List,
}

/// Account row for display.
#[derive(Tabled)]
struct AccountDisplay {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Subject")]
    subject_id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Plan")]
    plan_id: i64,
    #[tabled(rename = "Credits")]
    credit_balance: i64,
}

impl From<&UserAccount> for AccountDisplay {
    fn from(a: &UserAccount) -> Self {
        Self {
            id: a.id.get(),
            subject_id: a.subject_id.clone(),
            email: a.email.clone(),
            username: a.username.clone(),
            name: format!("{} {}", a.first_name, a.last_name).trim().to_string(),
            plan_id: a.plan_id,
            credit_balance: a.credit_balance,
        }
    }
}

/// Run the CLI with the given arguments.
pub async fn run(args: LedgerArgs) -> CliResult {
    let mut config = match args.config {
        Some(ref path) => load_config(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;
    init_tracing(&config.logging);

    let ledger_config = ledger_config(&config.ledger)?;

    if config.database.is_memory() {
        if matches!(args.command, LedgerCommands::Init) {
            println!("In-memory store needs no schema.");
            return Ok(());
        }
        let ledger = AccountLedger::new(MemoryStore::new(), ledger_config);
        return execute(&ledger, args.command, args.format).await;
    }

    let store = SqlStore::connect(sql_store_config(&config.database)).await?;
    if matches!(args.command, LedgerCommands::Init) {
        store.init_schema().await?;
        store.close().await;
        println!("Database schema initialized.");
        return Ok(());
    }

    let ledger = AccountLedger::new(store, ledger_config);
    let result = execute(&ledger, args.command, args.format).await;
    ledger.store().close().await;
    result
}

async fn execute<S: AccountStore>(
    ledger: &AccountLedger<S>,
    command: LedgerCommands,
    format: OutputFormat,
) -> CliResult {
    debug!(?command, "executing ledger command");
    match command {
        LedgerCommands::Init => Ok(()),
        LedgerCommands::Create {
            subject_id,
            email,
            username,
            photo,
            first_name,
            last_name,
        } => {
            let profile = NewAccount::new(subject_id, email, username)
                .photo(photo)
                .name(first_name, last_name);
            let account = ledger.create_account(profile).await?;
            print_accounts(&[account], format)
        }
        LedgerCommands::Get { subject_id, id } => {
            let found = match (subject_id, id) {
                (Some(subject), _) => ledger.get_account_by_subject_id(&subject).await?,
                (None, Some(id)) => ledger.get_account_by_id(id).await?,
                (None, None) => return Err("either a subject id or --id is required".into()),
            };
            match found {
                Some(account) => print_accounts(&[account], format),
                None => {
                    println!("No account found.");
                    Ok(())
                }
            }
        }
        LedgerCommands::Ensure { subject_id } => {
            let account = ledger.get_or_create_account(&subject_id).await?;
            print_accounts(&[account], format)
        }
        LedgerCommands::Update {
            subject_id,
            email,
            username,
            photo,
            first_name,
            last_name,
            plan_id,
        } => {
            let patch = AccountPatch {
                email,
                username,
                photo,
                first_name,
                last_name,
                plan_id,
            };
            if patch.is_empty() {
                println!("No updates specified.");
                return Ok(());
            }
            let account = ledger.update_account(&subject_id, patch).await?;
            print_accounts(&[account], format)
        }
        LedgerCommands::Delete { subject_id } => {
            match ledger.delete_account(&subject_id).await? {
                Some(account) => println!("Deleted account {} ({}).", account.id, account.subject_id),
                None => println!("Account {} was already deleted.", subject_id),
            }
            Ok(())
        }
        LedgerCommands::Credits { id, delta } => {
            let account = ledger.adjust_credits(id, delta).await?;
            print_accounts(&[account], format)
        }
        LedgerCommands::Charge { id, kind } => {
            let kind: TransformationType = kind.parse()?;
            let account = ledger.charge_transformation(id, kind).await?;
            print_accounts(&[account], format)
        }
        LedgerCommands::List => {
            let accounts = ledger.list_accounts().await?;
            if accounts.is_empty() && format == OutputFormat::Table {
                println!("No accounts found.");
                return Ok(());
            }
            print_accounts(&accounts, format)
        }
    }
}

fn print_accounts(accounts: &[UserAccount], format: OutputFormat) -> CliResult {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(accounts)?);
        }
        OutputFormat::Csv => write_csv(accounts, io::stdout())?,
        OutputFormat::Table => {
            let rows: Vec<AccountDisplay> = accounts.iter().map(AccountDisplay::from).collect();
            println!("{}", Table::new(rows));
        }
    }
    Ok(())
}

const CSV_HEADER: [&str; 9] = [
    "id",
    "subject_id",
    "email",
    "username",
    "photo",
    "first_name",
    "last_name",
    "plan_id",
    "credit_balance",
];

/// Write accounts as CSV, quoting free-text fields as needed.
fn write_csv<W: io::Write>(accounts: &[UserAccount], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for a in accounts {
        writer.write_record([
            a.id.to_string(),
            a.subject_id.clone(),
            a.email.clone(),
            a.username.clone(),
            a.photo.clone(),
            a.first_name.clone(),
            a.last_name.clone(),
            a.plan_id.to_string(),
            a.credit_balance.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Translate the config-file ledger section.
pub fn ledger_config(settings: &LedgerSettings) -> Result<LedgerConfig, String> {
    let overdraft: OverdraftPolicy = settings.overdraft.parse()?;
    Ok(LedgerConfig::new()
        .default_credit_balance(settings.default_credit_balance)
        .default_plan_id(settings.default_plan_id)
        .overdraft(overdraft)
        .event_capacity(settings.event_capacity))
}

/// Translate the config-file database section.
pub fn sql_store_config(db: &DatabaseConfig) -> SqlStoreConfig {
    SqlStoreConfig::new(db.url.clone())
        .max_connections(db.max_connections)
        .min_connections(db.min_connections)
        .connect_timeout(Duration::from_secs(db.connect_timeout_secs))
        .max_lifetime(Duration::from_secs(db.max_lifetime_secs))
        .idle_timeout(Duration::from_secs(db.idle_timeout_secs))
}

/// Initialize tracing subscriber with the given logging configuration.
///
/// Supports:
/// - `level`: Base log level (trace, debug, info, warn, error)
/// - `format`: Output format (json, pretty, compact). Default: pretty
/// - `output`: Output target (stdout, stderr). Default: stderr
/// - `filters`: Per-module log level overrides
///
/// A subscriber that is already installed is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    let base_level = config
        .level
        .as_deref()
        .unwrap_or(imaginify_core::defaults::DEFAULT_LOG_LEVEL);
    let mut filter_str = base_level.to_string();

    for (module, level) in &config.filters {
        filter_str.push(',');
        filter_str.push_str(module);
        filter_str.push('=');
        filter_str.push_str(level);
    }

    let filter = EnvFilter::try_new(&filter_str).unwrap_or_else(|_| EnvFilter::new("info"));

    let format = config
        .format
        .as_deref()
        .unwrap_or(imaginify_core::defaults::DEFAULT_LOG_FORMAT);
    let output = config
        .output
        .as_deref()
        .unwrap_or(imaginify_core::defaults::DEFAULT_LOG_OUTPUT);

    let registry = tracing_subscriber::registry().with(filter);
    let _ = match (format, output) {
        ("json", "stdout") => registry
            .with(fmt::layer().json().with_writer(io::stdout))
            .try_init(),
        ("json", _) => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
        ("compact", "stdout") => registry
            .with(fmt::layer().compact().with_writer(io::stdout))
            .try_init(),
        ("compact", _) => registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .try_init(),
        (_, "stdout") => registry.with(fmt::layer().with_writer(io::stdout)).try_init(),
        _ => registry.with(fmt::layer().with_writer(io::stderr)).try_init(),
    };
}
