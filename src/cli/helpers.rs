//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use chrono::{DateTime, Local, Utc};
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Store};

/// Load the user configuration named by `--config`, or the default file
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    let path = global.config.clone().or_else(Config::default_path);
    Config::load_from(path.as_deref()).into_diagnostic()
}

/// Open the store selected by `--db`, the config, or the default location
pub fn open_store(global: &GlobalOpts, config: &Config) -> Result<Store> {
    let store = match global.db.as_ref().or(config.database.as_ref()) {
        Some(path) => Store::open(path),
        None => Store::open_default(),
    };
    store.into_diagnostic()
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Format a stored timestamp in local time
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Ask before a destructive action
///
/// `--yes` skips the prompt. Without a terminal there is nobody to ask, so
/// the action is refused.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !console::user_attended() {
        return Err(miette::miette!("{} (pass --yes when not on a terminal)", prompt));
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Print a list of records in the requested format
///
/// `headers` and the cells returned by `row` line up; the first cell is the
/// record's ID.
pub fn print_list<T, F>(items: &[T], format: OutputFormat, headers: &[&str], row: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> Vec<String>,
{
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(items).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("{}", headers.join(","));
            for item in items {
                let cells: Vec<_> = row(item).iter().map(|c| escape_csv(c)).collect();
                println!("{}", cells.join(","));
            }
        }
        OutputFormat::Tsv => {
            println!("{}", headers.join("\t"));
            for item in items {
                let cells: Vec<_> = row(item).iter().map(|c| c.replace('\t', " ")).collect();
                println!("{}", cells.join("\t"));
            }
        }
        OutputFormat::Id => {
            for item in items {
                if let Some(id) = row(item).into_iter().next() {
                    println!("{}", id);
                }
            }
        }
        OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(headers.iter().map(|h| h.to_uppercase()));
            for item in items {
                builder.push_record(row(item));
            }
            println!("{}", builder.build().with(Style::blank()));
        }
    }

    Ok(())
}

/// Print a single record as JSON or YAML, returning false for other formats
pub fn print_record<T: Serialize>(item: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(item).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("ünïcödé text", 7), "ünïc...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_format_timestamp_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let formatted = format_timestamp(&ts);
        assert_eq!(formatted.len(), "2024-03-01 12:30".len());
        assert!(formatted.starts_with("2024-0"));
    }

    #[test]
    fn test_confirm_with_yes_skips_prompt() {
        assert!(confirm("Remove everything?", true).unwrap());
    }
}
