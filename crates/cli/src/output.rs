//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
    /// Terraform variable block
    Terraform,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format a savings estimate
pub fn format_savings(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format millicores for display
pub fn format_millicores(millicores: i64) -> String {
    if millicores >= 1000 && millicores % 1000 == 0 {
        format!("{}", millicores / 1000)
    } else {
        format!("{}m", millicores)
    }
}

/// Color an approval type: explicit approvals green, pending yellow
pub fn color_approval(approval_type: &str) -> String {
    match approval_type {
        "na" | "" => "pending".yellow().to_string(),
        "all" | "any" => approval_type.green().to_string(),
        other => other.green().to_string(),
    }
}
