// ⚙️ Configuration - environment overrides with sane defaults

use std::env;
use tracing::warn;

pub const RECENT_BOOKS_VAR: &str = "BOOK_LEDGER_RECENT_BOOKS";
pub const LOG_VAR: &str = "BOOK_LEDGER_LOG";

const DEFAULT_RECENT_BOOKS: usize = 5;
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How many books the dashboard lists
    pub recent_books: usize,
    /// Log filter used when RUST_LOG is not set
    pub log_filter: String,
    /// Variables whose values could not be used, as (name, raw value)
    pub rejected: Vec<(&'static str, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            recent_books: DEFAULT_RECENT_BOOKS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            rejected: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparseable values fall back to defaults
    /// and are kept in `rejected` so they can be reported once logging is up
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup(RECENT_BOOKS_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(value) => config.recent_books = value,
                Err(_) => config.rejected.push((RECENT_BOOKS_VAR, raw)),
            }
        }

        if let Some(raw) = lookup(LOG_VAR) {
            if !raw.trim().is_empty() {
                config.log_filter = raw.trim().to_string();
            }
        }

        config
    }

    /// Emit a warning for every rejected variable
    pub fn log_rejected(&self) {
        for (var, value) in &self.rejected {
            warn!(var = *var, value = %value, "invalid value, using default");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.recent_books, 5);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (RECENT_BOOKS_VAR, "10"),
            (LOG_VAR, "book_ledger=debug"),
        ]));

        assert_eq!(config.recent_books, 10);
        assert_eq!(config.log_filter, "book_ledger=debug");
        assert!(config.rejected.is_empty());
    }

    #[test]
    fn test_invalid_value_falls_back() {
        let config = Config::from_lookup(lookup_from(&[(RECENT_BOOKS_VAR, "lots"), (LOG_VAR, "  ")]));

        assert_eq!(config.recent_books, 5);
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.rejected, vec![(RECENT_BOOKS_VAR, "lots".to_string())]);
    }
}
