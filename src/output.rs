//! Table and JSON rendering for command output.
//!
//! Results go to stdout; status lines and warnings go to stderr so that
//! `--format json` output can be piped.

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print rows in the selected format
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table if rows.is_empty() => println!("No results."),
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Json => println!("{}", to_json(&rows, "[]")),
    }
}

/// Print a single row in the selected format
pub fn print_item<T: Serialize + Tabled>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", Table::new(std::slice::from_ref(item))),
        OutputFormat::Json => println!("{}", to_json(item, "{}")),
    }
}

/// Print a raw API response body.
///
/// JSON bodies are pretty-printed; anything else is printed verbatim.
pub fn print_response(status: u16, body: &str, format: OutputFormat) {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    match format {
        OutputFormat::Table => {
            print_kv("Status", &status.to_string());
            match parsed {
                Some(value) => println!("{}", to_json(&value, body)),
                None if body.is_empty() => {}
                None => println!("{body}"),
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "status": status,
                "body": parsed.unwrap_or_else(|| serde_json::Value::String(body.to_string())),
            });
            println!("{}", to_json(&value, "{}"));
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    eprintln!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    eprintln!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{key}:"), value);
}

fn to_json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
}

/// Render a flag for table cells.
pub fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}
