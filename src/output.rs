//! Operator-facing output: colors, banners, results and faults.
//!
//! Everything the shell prints for humans goes through here, so the
//! color policy lives in exactly one place. Diagnostics for developers
//! use `tracing` and are a different channel entirely.

use cmd_lang::SyntaxError;
use colored::Colorize;

use crate::dispatch::Outcome;
use crate::error::Fault;
use crate::record::{Listing, Record};
use crate::registry::Registry;

/// Decide once whether to emit ANSI colors.
pub fn init(color: bool) {
    if !color || !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }
}

pub fn bold(text: &str) {
    println!("{}", text.bold());
}

pub fn info(text: &str) {
    println!("{}", text.underline());
}

pub fn warn(text: &str) {
    println!("{}", text.red().bold());
}

pub fn error(text: &str) {
    println!("{}", format!("/!\\ {text} /!\\").yellow().on_red().bold());
}

// ===== RESULTS =====

pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Record(record) => println!("{record}"),
        Outcome::Listing(listing) => print_listing(listing),
        Outcome::Message(text) => info(text),
        Outcome::Done => {}
    }
}

pub fn print_listing(listing: &Listing) {
    for record in listing.values() {
        println!("{record}");
    }
}

/// Remote faults get the alarm treatment, local ones a plain warning.
pub fn print_fault(fault: &Fault) {
    match fault {
        Fault::Remote(remote) => error(&remote.to_string()),
        other => warn(&other.to_string()),
    }
}

pub fn print_syntax_error(line: &str, err: &SyntaxError) {
    warn(&err.to_string());
    println!("{}", err.caret(line));
}

// ===== BANNERS =====

pub fn welcome(account: &Record) {
    println!("{}", welcome_text(account));
}

pub fn goodbye() {
    println!("{}", goodbye_text());
}

fn welcome_text(account: &Record) -> String {
    let mut lines = vec![format!(
        "{}",
        format!(
            "hostshell {}. This program comes with ABSOLUTELY NO WARRANTY.",
            env!("CARGO_PKG_VERSION")
        )
        .bold()
    )];

    let fullname = account.get_str("fullname").unwrap_or("?");
    let handle = account.get_str("handle").unwrap_or("?");
    lines.push(format!(
        "{}",
        format!("{:=^79}", format!(" {fullname} - ({handle}) ")).bold()
    ));

    let credits = account.get_i64("credits").unwrap_or(0);
    let expires = account.get_str("date_credits_expiration").unwrap_or("?");
    lines.push(format!(
        "{} credit left until {}",
        group_thousands(credits).yellow(),
        humanize_date(expires).green()
    ));
    if let Some(cost) = account.get_f64("average_credit_cost") {
        lines.push(format!(
            "Avg cost: {cost:.6} => {:.2}€ last.",
            credits as f64 * cost
        ));
    }
    lines.join("\n")
}

fn goodbye_text() -> String {
    format!("\n*{:-^77}*", "- see you soon -")
}

/// The `help` builtin: every command the grammar accepts, with its
/// parameter names and one-line description.
pub fn print_catalog(registry: &Registry) {
    for entry in registry.entries() {
        bold(&format!("{}:", entry.kind()));
        for action in entry.class_actions() {
            let command = format!("{}.{}{}", entry.kind(), action.name, render_params(action.params));
            println!("  {command:<34} {}", action.help);
        }
        for action in entry.instance_actions() {
            let command = format!(
                "{}(<id>).{}{}",
                entry.kind(),
                action.name,
                render_params(action.params)
            );
            println!("  {command:<34} {}", action.help);
        }
    }
}

fn render_params(params: &[&str]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("({})", params.join(","))
    }
}

// ===== SMALL FORMATTERS =====

/// `1234567` -> `1,234,567`.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Wire timestamps arrive as ISO-8601 text; show the readable part.
fn humanize_date(raw: &str) -> String {
    if let Ok(stamp) = chrono::DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(stamp) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return stamp.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use cmd_lang::TypeName;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_welcome_banner_layout() {
        colored::control::set_override(false);
        let account = Record::from_value(
            TypeName::Account,
            json!({
                "id": 1,
                "fullname": "Xavier Yz",
                "handle": "XY123",
                "credits": 1_520_042,
                "date_credits_expiration": "2026-03-01T00:00:00",
                "average_credit_cost": 0.0008,
            }),
        )
        .unwrap();
        let text = welcome_text(&account);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            format!(
                "hostshell {}. This program comes with ABSOLUTELY NO WARRANTY.",
                env!("CARGO_PKG_VERSION")
            )
        );
        assert_eq!(
            lines[1],
            format!("{eq} Xavier Yz - (XY123) {eq}", eq = "=".repeat(29))
        );
        assert_eq!(lines[2], "1,520,042 credit left until 2026-03-01 00:00");
        assert_eq!(lines[3], "Avg cost: 0.000800 => 1216.03€ last.");
    }

    #[test]
    fn test_welcome_copes_with_a_sparse_account() {
        colored::control::set_override(false);
        let account = Record::from_value(TypeName::Account, json!({"id": 1})).unwrap();
        let text = welcome_text(&account);
        assert!(text.contains(" ? - (?) "));
        assert!(text.contains("0 credit left until ?"));
        // No cost line without an average_credit_cost field.
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_goodbye_banner_shape() {
        let text = goodbye_text();
        assert!(text.starts_with('\n'));
        let line = &text[1..];
        assert_eq!(line.len(), 79);
        assert!(line.starts_with("*---"));
        assert!(line.contains("- see you soon -"));
        assert!(line.ends_with("-*"));
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-42_000), "-42,000");
    }

    #[test]
    fn test_humanize_date() {
        assert_eq!(
            humanize_date("2026-01-31T10:03:45+00:00"),
            "2026-01-31 10:03"
        );
        assert_eq!(humanize_date("2026-01-31T10:03:45"), "2026-01-31 10:03");
        assert_eq!(humanize_date("soon"), "soon");
    }

    #[test]
    fn test_render_params() {
        assert_eq!(render_params(&[]), "");
        assert_eq!(render_params(&["disk_id"]), "(disk_id)");
        assert_eq!(render_params(&["a", "b"]), "(a,b)");
    }
}
