//! Ticker universe and symbol search.
//!
//! The universe is loaded once at process start and handed to whoever serves
//! search requests. Symbol details (name, sector, quotes) come from a
//! market-data provider outside this crate; search only decides which
//! symbols are worth asking it about.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::error::PayoffError;
use crate::PayoffResult;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Queries this short return bare symbols without provider lookups.
pub const SHORT_QUERY_LEN: usize = 3;

/// Cap on symbols forwarded for a detailed provider lookup.
pub const MAX_DETAIL_LOOKUPS: usize = 5;

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerUniverse {
    symbols: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerQuery {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub exact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSearchOutput {
    pub query: String,
    pub matches: Vec<String>,
    /// Whether the caller should enrich matches from the market-data provider.
    pub needs_detail: bool,
    pub detail_symbols: Vec<String>,
}

impl TickerUniverse {
    /// Build from raw lines: trimmed, upper-cased, blanks dropped. File order
    /// is preserved and determines search result order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_uppercase())
            .filter(|l| !l.is_empty())
            .collect();
        TickerUniverse { symbols }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> PayoffResult<Self> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Ok(TickerUniverse::new(lines))
    }

    /// Load a newline-delimited ticker file.
    ///
    /// Returns `Ok(None)` when the file does not exist so callers can fall
    /// back to an empty universe.
    pub fn load(path: impl AsRef<Path>) -> PayoffResult<Option<Self>> {
        match File::open(path.as_ref()) {
            Ok(file) => TickerUniverse::from_reader(BufReader::new(file)).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PayoffError::DataSource(format!(
                "Failed to open '{}': {}",
                path.as_ref().display(),
                e
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    pub fn search(&self, query: &TickerQuery) -> PayoffResult<TickerSearchOutput> {
        let q = query.q.trim().to_uppercase();
        if q.is_empty() {
            return Err(PayoffError::invalid("q", "Query parameter required"));
        }

        let matches: Vec<String> = if query.exact {
            if self.contains(&q) {
                vec![q.clone()]
            } else {
                Vec::new()
            }
        } else {
            self.symbols
                .iter()
                .filter(|s| s.starts_with(&q))
                .take(query.limit)
                .cloned()
                .collect()
        };

        let needs_detail = !matches.is_empty() && (query.exact || q.len() > SHORT_QUERY_LEN);
        let detail_symbols = if needs_detail {
            matches.iter().take(MAX_DETAIL_LOOKUPS).cloned().collect()
        } else {
            Vec::new()
        };

        Ok(TickerSearchOutput {
            query: q,
            matches,
            needs_detail,
            detail_symbols,
        })
    }
}
