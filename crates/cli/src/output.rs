//! Output formatting for CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Plain text format
    Plain,
}

/// Trait for items that can be displayed in a table
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Print a single item
pub fn print_item<T: Serialize + TableDisplay>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = table();
            table.set_header(T::headers());
            table.add_row(item.row());
            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(item).unwrap_or_default());
        }
        OutputFormat::Plain => {
            let row = item.row();
            for (header, value) in T::headers().iter().zip(row.iter()) {
                println!("{}: {}", header, value);
            }
        }
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + TableDisplay>(items: &[T], format: OutputFormat) {
    if items.is_empty() && format == OutputFormat::Table {
        println!("No items found.");
        return;
    }

    match format {
        OutputFormat::Table => {
            let mut table = table();
            table.set_header(T::headers());
            for item in items {
                table.add_row(item.row());
            }
            println!("{table}");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(items).unwrap_or_default());
        }
        OutputFormat::Plain => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                let row = item.row();
                for (header, value) in T::headers().iter().zip(row.iter()) {
                    println!("{}: {}", header, value);
                }
            }
        }
    }
}

/// Print a titled block of preformatted text
pub fn print_block(title: &str, body: &str) {
    println!("{}", title.bold());
    for line in body.lines() {
        println!("  {}", line);
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✔".green(), message);
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Print info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message);
}

/// Colored HTTP status line, e.g. `200 OK (41 ms)`
pub fn status_line(status: u16, elapsed: Duration) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    let text = format!("{} {}", status, reason).trim_end().to_string();
    let colored = match status {
        200..=299 => text.green().bold(),
        300..=399 => text.yellow().bold(),
        _ => text.red().bold(),
    };
    format!("{} ({} ms)", colored, elapsed.as_millis())
}

/// Spinner shown while a request is in flight. Hidden for machine formats.
pub fn spinner(message: &str, format: OutputFormat) -> ProgressBar {
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_includes_reason_and_time() {
        colored::control::set_override(false);
        assert_eq!(status_line(200, Duration::from_millis(41)), "200 OK (41 ms)");
        assert_eq!(status_line(404, Duration::from_millis(3)), "404 Not Found (3 ms)");
        assert_eq!(status_line(599, Duration::from_millis(0)), "599 (0 ms)");
    }
}
