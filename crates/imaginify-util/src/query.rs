//! URL query string editing for filter and pagination links.

/// Error parsing or rendering a query string.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid query string: {0}")]
    Parse(#[from] serde_urlencoded::de::Error),
    #[error("query encoding failed: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

fn parse(query: &str) -> Result<Vec<(String, String)>, QueryError> {
    Ok(serde_urlencoded::from_str(query.trim_start_matches('?'))?)
}

fn render(pathname: &str, pairs: &[(String, String)]) -> Result<String, QueryError> {
    Ok(format!("{pathname}?{}", serde_urlencoded::to_string(pairs)?))
}

/// Set `key` to `value` in `query` and return `"{pathname}?{query}"`.
///
/// An existing `key` keeps its position; a new one is appended.
///
/// ```
/// use imaginify_util::form_url_query;
///
/// let url = form_url_query("/", "query=cat&page=2", "page", "3").unwrap();
/// assert_eq!(url, "/?query=cat&page=3");
/// ```
pub fn form_url_query(
    pathname: &str,
    query: &str,
    key: &str,
    value: &str,
) -> Result<String, QueryError> {
    let mut pairs = parse(query)?;
    let mut replaced = false;
    pairs.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        if replaced {
            return false;
        }
        value.clone_into(v);
        replaced = true;
        true
    });
    if !replaced {
        pairs.push((key.to_string(), value.to_string()));
    }
    render(pathname, &pairs)
}

/// Drop `keys` from `query`. Other pairs, including ones with empty values,
/// are kept in order.
pub fn remove_keys_from_query(
    pathname: &str,
    query: &str,
    keys: &[&str],
) -> Result<String, QueryError> {
    let mut pairs = parse(query)?;
    pairs.retain(|(k, _)| !keys.contains(&k.as_str()));
    render(pathname, &pairs)
}
