//! Report
//!
//! Renders ranked results as terminal tables or YAML.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::ranking::{Entry, MatchResult};

/// Printed when a search finds nothing.
pub const NO_MATCHES: &str = "No combinations found matching criteria.";

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error writing to the output.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Error serializing results.
    #[error("failed to serialize results: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Writes one block per result: used and unused tables followed by the restated sum.
///
/// With a `currency` the sum is formatted as money in that currency; otherwise as a plain
/// grouped decimal.
///
/// # Errors
///
/// Returns a [`ReportError`] if writing fails.
pub fn write_table(
    mut out: impl io::Write,
    results: &[MatchResult],
    currency: Option<&'static Currency>,
) -> Result<(), ReportError> {
    if results.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
        return Ok(());
    }

    for (number, result) in results.iter().enumerate() {
        writeln!(
            out,
            "\nCombination #{} (length={}):",
            number + 1,
            result.length
        )?;

        writeln!(out, "Used:\n{}", entry_table(&result.used))?;
        writeln!(out, "Unused:\n{}", entry_table(&result.unused))?;
        writeln!(out, "Sum: {}", format_sum(result, currency))?;
    }

    Ok(())
}

/// Writes the results as a YAML document.
///
/// # Errors
///
/// Returns a [`ReportError`] if serialization or writing fails.
pub fn write_yaml(mut out: impl io::Write, results: &[MatchResult]) -> Result<(), ReportError> {
    let document = serde_norway::to_string(results)?;

    out.write_all(document.as_bytes())?;

    Ok(())
}

fn entry_table(entries: &[Entry]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["idx", "value"]);

    for entry in entries {
        builder.push_record([entry.index.to_string(), entry.text.clone()]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::first(), Alignment::right());

    table.to_string()
}

fn format_sum(result: &MatchResult, currency: Option<&'static Currency>) -> String {
    match currency {
        Some(currency) => format!("{}", Money::from_minor(result.sum_minor_units, currency)),
        None => format_grouped(result.sum),
    }
}

/// Formats an amount with two decimal places and comma-grouped thousands.
pub fn format_grouped(amount: Decimal) -> String {
    let digits = format!("{:.2}", amount.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let whole: Vec<char> = whole.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + whole.len() / 3 + 1);

    if amount.is_sign_negative() && !amount.is_zero() {
        grouped.push('-');
    }

    for (i, ch) in whole.iter().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(*ch);
    }

    grouped.push('.');
    grouped.push_str(fraction);

    grouped
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn result() -> MatchResult {
        MatchResult {
            used: vec![
                Entry {
                    index: 8,
                    text: "5.00".to_string(),
                },
                Entry {
                    index: 9,
                    text: "$5.00".to_string(),
                },
            ],
            unused: vec![Entry {
                index: 10,
                text: "3.00".to_string(),
            }],
            length: 2,
            sum: Decimal::new(1000, 2),
            sum_minor_units: 1000,
        }
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped(Decimal::new(7_240_953, 2)), "72,409.53");
        assert_eq!(format_grouped(Decimal::new(-132_970, 2)), "-1,329.70");
        assert_eq!(format_grouped(Decimal::new(100_000_000, 2)), "1,000,000.00");
        assert_eq!(format_grouped(Decimal::new(999, 2)), "9.99");
        assert_eq!(format_grouped(Decimal::new(0, 2)), "0.00");
        assert_eq!(format_grouped(Decimal::new(5, 0)), "5.00");
    }

    #[test]
    fn table_lists_used_unused_and_sum() -> TestResult {
        let mut out = Vec::new();

        write_table(&mut out, &[result()], None)?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Combination #1 (length=2):"));
        assert!(text.contains("Used:"));
        assert!(text.contains("Unused:"));
        assert!(text.contains("$5.00"));
        assert!(text.contains("10"));
        assert!(text.contains("Sum: 10.00"));

        let used_at = text.find("Used:").ok_or("missing used")?;
        let unused_at = text.find("Unused:").ok_or("missing unused")?;
        assert!(used_at < unused_at);

        Ok(())
    }

    #[test]
    fn table_formats_sum_as_money() -> TestResult {
        let mut out = Vec::new();

        write_table(&mut out, &[result()], Some(GBP))?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("Sum: £10.00"));

        Ok(())
    }

    #[test]
    fn empty_results_say_so() -> TestResult {
        let mut out = Vec::new();

        write_table(&mut out, &[], None)?;

        assert_eq!(String::from_utf8(out)?, format!("{NO_MATCHES}\n"));

        Ok(())
    }

    #[test]
    fn yaml_lists_every_field() -> TestResult {
        let mut out = Vec::new();

        write_yaml(&mut out, &[result()])?;

        let text = String::from_utf8(out)?;

        assert!(text.contains("used:"));
        assert!(text.contains("unused:"));
        assert!(text.contains("length: 2"));
        assert!(text.contains("index: 10"));
        assert!(!text.contains("sum_minor_units"));

        Ok(())
    }
}
