//! Query-string encoding for structured request maps.
//!
//! A map under `key` becomes one `key[subkey]=value` pair per entry, joined
//! with `&`. Keys and values go out verbatim.

use crate::api::{Filters, Search, StringMap, DEFAULT_TAKE};

const PRELOAD: &str = "preload";
const SORT: &str = "sort";
const WHERE: &str = "where";

/// Encode `map` under `key`. An empty map encodes to an empty string.
pub fn map_to_query(key: &str, map: &StringMap) -> String {
    map.iter()
        .map(|(k, v)| format!("{}[{}]={}", key, k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Encode each named filter under its own name.
pub fn filters_to_query(filters: &Filters) -> String {
    filters
        .iter()
        .map(|(name, args)| map_to_query(name, args))
        .filter(|pairs| !pairs.is_empty())
        .collect::<Vec<_>>()
        .join("&")
}

pub(crate) fn preload_query(preload: &StringMap) -> String {
    map_to_query(PRELOAD, preload)
}

/// The full search query string: `skip`, `take` (defaulted when 0), then
/// `where`, `sort`, `preload` and the named filters.
pub fn search_query(req: &Search) -> String {
    let take = if req.take == 0 { DEFAULT_TAKE } else { req.take };

    let mut parts = vec![format!("skip={}", req.skip), format!("take={}", take)];
    parts.extend(
        [
            map_to_query(WHERE, &req.where_),
            map_to_query(SORT, &req.sort),
            map_to_query(PRELOAD, &req.preload),
            filters_to_query(&req.filters),
        ]
        .into_iter()
        .filter(|part| !part.is_empty()),
    );

    parts.join("&")
}

/// Append a query string to a url, if there is one.
pub(crate) fn with_query(url: String, query: &str) -> String {
    if query.is_empty() {
        url
    } else {
        format!("{}?{}", url, query)
    }
}
