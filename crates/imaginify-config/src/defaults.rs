//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `imaginify_core::defaults`.

use imaginify_core::defaults;

/// Generate default value functions that forward to imaginify_core::defaults constants.
macro_rules! default_fns {
    // For Copy types (integers, floats, etc.)
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_max_connections       => DEFAULT_DB_MAX_CONNECTIONS: u32,
    default_min_connections       => DEFAULT_DB_MIN_CONNECTIONS: u32,
    default_connect_timeout_secs  => DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64,
    default_max_lifetime_secs     => DEFAULT_DB_MAX_LIFETIME_SECS: u64,
    default_idle_timeout_secs     => DEFAULT_DB_IDLE_TIMEOUT_SECS: u64,
    default_credit_balance        => DEFAULT_CREDIT_BALANCE: i64,
    default_plan_id               => DEFAULT_PLAN_ID: i64,
    default_event_capacity        => DEFAULT_EVENT_CAPACITY: usize,
    default_retry_max_attempts    => DEFAULT_RETRY_MAX_ATTEMPTS: u32,
    default_retry_base_delay_ms   => DEFAULT_RETRY_BASE_DELAY_MS: u64,
    default_retry_max_delay_ms    => DEFAULT_RETRY_MAX_DELAY_MS: u64,
    default_retry_multiplier      => DEFAULT_RETRY_MULTIPLIER: f64,
    default_retry_jitter          => DEFAULT_RETRY_JITTER: f64,
}

default_string_fns! {
    default_database_url => DEFAULT_DATABASE_URL,
    default_overdraft    => DEFAULT_OVERDRAFT,
}
