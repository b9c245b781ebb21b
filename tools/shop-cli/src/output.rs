//! Output formatting for the CLI.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use shop_commerce::catalog::Availability;
use shop_commerce::checkout::OrderStatus;

/// Output handler for CLI messages.
///
/// In JSON mode only [`Output::json`] and errors are printed.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| pad(col, *width))
            .collect();
        println!("  {}", formatted.join("  ").trim_end());
    }

    /// Spinner shown while waiting on a service.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Left-align to a display width, ignoring color codes.
fn pad(text: &str, width: usize) -> String {
    let visible = console::measure_text_width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(visible)))
}

/// Colored label for an order status.
pub fn status_badge(status: OrderStatus) -> String {
    let label = status.as_str();
    match status {
        OrderStatus::Delivered => style(label).green().to_string(),
        OrderStatus::Created | OrderStatus::Shipped => style(label).yellow().to_string(),
        OrderStatus::Canceled => style(label).red().to_string(),
        OrderStatus::Returned => style(label).dim().to_string(),
    }
}

/// Colored stock label for a product row.
pub fn availability_badge(availability: Availability) -> String {
    let label = availability.label();
    if availability.can_add() {
        style(label).green().to_string()
    } else {
        style(label).red().to_string()
    }
}
