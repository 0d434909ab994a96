//! Application tags and the capture filter expressions they stand for.

use crate::error::FilterError;

/// Built-in application filters, in the order they are listed in help.
///
/// `DNS` and `ICMP` map to TCP port expressions. They are kept as they were
/// shipped so existing invocations select the same traffic.
pub const DEFAULT_FILTERS: [(&str, &str); 6] = [
    ("ftp", "tcp port 21"),
    ("http", "tcp port 80"),
    ("telnet", "tcp port 23"),
    ("HTTP", "tcp port 80"),
    ("DNS", "tcp port 53"),
    ("ICMP", "tcp port 8"),
];

/// Immutable map from application tag to capture filter expression.
///
/// Tags are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterTable {
    entries: Vec<(String, String)>,
}

impl Default for FilterTable {
    fn default() -> Self {
        Self::new(DEFAULT_FILTERS)
    }
}

impl FilterTable {
    /// Build a table from `(tag, expression)` pairs. A repeated tag keeps
    /// its first expression.
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table: Vec<(String, String)> = Vec::new();
        for (tag, expr) in entries {
            let tag = tag.into();
            if table.iter().all(|(existing, _)| *existing != tag) {
                table.push((tag, expr.into()));
            }
        }
        Self { entries: table }
    }

    /// Known tags, in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(tag, _)| tag.as_str())
    }

    /// Expression for a tag.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(known, _)| known == tag)
            .map(|(_, expr)| expr.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compose the full capture filter for a host.
    ///
    /// With a tag the result is `"<expr> and host <host>"`, without one it
    /// is `"host <host>"`.
    pub fn build_expression(&self, tag: Option<&str>, host: &str) -> Result<String, FilterError> {
        let Some(tag) = tag else {
            return Ok(format!("host {host}"));
        };

        let expr = self
            .get(tag)
            .ok_or_else(|| FilterError::UnknownApplication {
                tag: tag.to_string(),
                known: self.tags().collect::<Vec<_>>().join(", "),
            })?;
        Ok(format!("{expr} and host {host}"))
    }
}
