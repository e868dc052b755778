//! CLI override definitions and application logic.

use clap::Parser;

use crate::Config;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override database URL (postgres://, mysql://, sqlite:, or "memory")
    #[arg(long = "database", short = 'd', env = "DATABASE_URL")]
    pub database_url: Option<String>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override opening credit balance for new accounts
    #[arg(long)]
    pub default_credit_balance: Option<i64>,
    /// Override overdraft policy (allow/reject)
    #[arg(long)]
    pub overdraft: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.database_url {
        config.database.url = v.clone();
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = overrides.default_credit_balance {
        config.ledger.default_credit_balance = v;
    }
    if let Some(v) = &overrides.overdraft {
        config.ledger.overdraft = v.to_ascii_lowercase();
    }
}
