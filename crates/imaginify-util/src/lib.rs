//! Helpers shared by Imaginify front ends.
//!
//! - [`retry`]: exponential backoff for rate-limited upstream calls
//! - [`query`]: URL query string editing
//! - [`placeholder`]: shimmer placeholder image while a transformation runs
//! - [`merge`]: recursive merge of JSON transformation settings

pub mod merge;
pub mod placeholder;
pub mod query;
pub mod retry;

pub use merge::deep_merge;
pub use placeholder::{shimmer_data_url, shimmer_svg};
pub use query::{QueryError, form_url_query, remove_keys_from_query};
pub use retry::{
    RetryError, RetryPolicy, is_rate_limited, retry_with_backoff, retry_with_backoff_cancellable,
};
