use std::collections::BTreeMap;

use crate::config;

/// `utm_*` pairs of a `location.search` string, decoded the way
/// `URLSearchParams` decodes them. A repeated key keeps its last value.
pub fn utm_params(search: &str) -> BTreeMap<String, String> {
    let query = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key.starts_with(config::UTM_PREFIX))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}
