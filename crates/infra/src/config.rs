//! Configuration loading and representation.

use anyhow::{Context, ensure};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use roster_directory::{DEFAULT_PAGE_SIZE, RosterQuery, SortColumn, SortDirection};
use roster_observability::LogConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Runtime settings for a roster front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub page_size: u32,
    pub default_sort: SortConfig,
    pub log: LogConfig,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_sort: SortConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl RosterConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid roster config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Read `ROSTER_PAGE_SIZE`, `ROSTER_SORT_COLUMN`, `ROSTER_SORT_DIRECTION`,
    /// `ROSTER_LOG_JSON` and `RUST_LOG`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("ROSTER_PAGE_SIZE") {
            config.page_size = raw
                .trim()
                .parse()
                .with_context(|| format!("ROSTER_PAGE_SIZE must be a positive integer, got '{raw}'"))?;
        }
        if let Some(raw) = lookup("ROSTER_SORT_COLUMN") {
            config.default_sort.column = parse_name(&raw).context("invalid ROSTER_SORT_COLUMN")?;
        }
        if let Some(raw) = lookup("ROSTER_SORT_DIRECTION") {
            config.default_sort.direction = parse_name(&raw).context("invalid ROSTER_SORT_DIRECTION")?;
        }
        if let Some(raw) = lookup("ROSTER_LOG_JSON") {
            config.log.json = parse_flag(&raw).with_context(|| format!("ROSTER_LOG_JSON must be a boolean, got '{raw}'"))?;
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log.filter = filter;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.page_size >= 1, "page_size must be at least 1");
        Ok(())
    }

    /// Parameters the roster engine starts from.
    pub fn initial_query(&self) -> RosterQuery {
        RosterQuery::new(self.page_size).sorted_by(self.default_sort.column, self.default_sort.direction)
    }
}

/// Parse a snake_case enum name through its serde representation.
fn parse_name<T: DeserializeOwned>(raw: &str) -> anyhow::Result<T> {
    let name = raw.trim().to_lowercase();
    serde_json::from_value(serde_json::Value::String(name.clone())).with_context(|| format!("unknown value '{name}'"))
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("not a boolean: '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_roster_screen() {
        let config = RosterConfig::default();
        let query = config.initial_query();

        assert_eq!(query.page_size, 10);
        assert_eq!(query.page, 1);
        assert_eq!(query.sort_column, SortColumn::Name);
        assert_eq!(query.sort_direction, SortDirection::Asc);
    }

    #[test]
    fn json_overrides_selected_fields() {
        let config = RosterConfig::from_json(
            r#"{ "page_size": 25, "default_sort": { "column": "hire_date", "direction": "desc" } }"#,
        )
        .unwrap();

        assert_eq!(config.page_size, 25);
        assert_eq!(config.default_sort.column, SortColumn::HireDate);
        assert_eq!(config.default_sort.direction, SortDirection::Desc);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(RosterConfig::from_json(r#"{ "page_size": 0 }"#).is_err());
        assert!(RosterConfig::from_lookup(lookup(&[("ROSTER_PAGE_SIZE", "0")])).is_err());
    }

    #[test]
    fn environment_variables_are_applied() {
        let config = RosterConfig::from_lookup(lookup(&[
            ("ROSTER_PAGE_SIZE", "50"),
            ("ROSTER_SORT_COLUMN", "Salary"),
            ("ROSTER_SORT_DIRECTION", "desc"),
            ("ROSTER_LOG_JSON", "false"),
            ("RUST_LOG", "roster=debug"),
        ]))
        .unwrap();

        assert_eq!(config.page_size, 50);
        assert_eq!(config.default_sort.column, SortColumn::Salary);
        assert_eq!(config.default_sort.direction, SortDirection::Desc);
        assert!(!config.log.json);
        assert_eq!(config.log.filter, "roster=debug");
    }

    #[test]
    fn bad_environment_values_carry_context() {
        let err = RosterConfig::from_lookup(lookup(&[("ROSTER_SORT_COLUMN", "shoe_size")])).unwrap_err();
        assert!(err.to_string().contains("ROSTER_SORT_COLUMN"));

        let err = RosterConfig::from_lookup(lookup(&[("ROSTER_LOG_JSON", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("ROSTER_LOG_JSON"));
    }
}
