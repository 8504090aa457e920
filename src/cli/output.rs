//! Messages printed by taxsel commands
//!
//! Taxonomy trees, label lists and profile JSON go to stdout uncolored so
//! they can be piped; warnings about stale labels and errors go to stderr.
//! `colored` honors NO_COLOR and CLICOLOR.

use colored::Colorize;

/// Failed command, before the process exits with the mapped code.
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Non-fatal problem, e.g. a saved label no longer in the taxonomy.
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Result of a mutation: `label` is the picker or field that changed.
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Section title such as a deal tab or "Config files".
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// One indented line under a [`header`].
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Data lines (labels, trees, JSON), never colored.
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Dollar amount as shown on the deal board: `$750K`, `$1.2M`.
pub fn amount(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let v = value.abs();
    if v >= 1_000_000.0 {
        format!("{sign}${:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{sign}${:.0}K", v / 1_000.0)
    } else {
        format!("{sign}${v:.0}")
    }
}
