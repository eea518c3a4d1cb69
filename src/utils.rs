use chrono::NaiveDate;

use crate::error::{CheckError, Result};

/// Date format used for deadlines shown to the operator
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y";

/// Format a date the way it is shown on the form (`31.12.2025`)
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Format a kW / kWh threshold with a German decimal comma
pub fn format_decimal(value: f64) -> String {
    value.to_string().replace('.', ",")
}

/// Mean consumption is shown truncated to whole kWh
pub fn format_kwh(value: f64) -> String {
    format!("{} kWh/Jahr", value.trunc() as u64)
}

/// Parse a date entered as `2024-01-31` or `31.01.2024`
pub fn parse_date(field: &str, input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, DISPLAY_DATE_FORMAT))
        .map_err(|_| CheckError::invalid_input(field, format!("'{}' is not a date (YYYY-MM-DD)", input)))
}

/// Parse a non-negative power rating; accepts both `4.2` and `4,2`
pub fn parse_power(field: &str, input: &str) -> Result<f64> {
    let normalized = input.trim().replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| CheckError::invalid_input(field, format!("'{}' is not a number", input.trim())))?;

    if !value.is_finite() || value < 0.0 {
        return Err(CheckError::invalid_input(field, "must be a non-negative number"));
    }
    Ok(value)
}

/// Parse a yearly reading in whole kWh. A blank field is "not entered".
pub fn parse_reading(field: &str, input: &str) -> Result<Option<u64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<u64>()
        .map(Some)
        .map_err(|_| CheckError::invalid_input(field, format!("'{}' is not a whole kWh value", input)))
}

/// Prompt user for yes/no confirmation
pub fn confirm_action(prompt: &str) -> Result<bool> {
    use std::io::{self, Write};

    print!("{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes" | "j" | "ja"))
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Print a table row with columns
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    let mut row = String::new();
    for (col, width) in columns.iter().zip(widths) {
        row.push_str(&format!("{:<width$}  ", col, width = width));
    }
    println!("{}", row.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(format_date(&date), "31.12.2025");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(4.2), "4,2");
        assert_eq!(format_decimal(30.0), "30");
        assert_eq!(format_decimal(6000.0), "6000");
    }

    #[test]
    fn test_format_kwh_truncates() {
        assert_eq!(format_kwh(5999.99), "5999 kWh/Jahr");
        assert_eq!(format_kwh(6000.0), "6000 kWh/Jahr");
    }

    #[test]
    fn test_parse_date_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_date("date", "2024-01-01").unwrap(), expected);
        assert_eq!(parse_date("date", " 01.01.2024 ").unwrap(), expected);
        assert!(parse_date("date", "tomorrow").is_err());
    }

    #[test]
    fn test_parse_power() {
        assert_eq!(parse_power("power", "4,2").unwrap(), 4.2);
        assert_eq!(parse_power("power", "30").unwrap(), 30.0);
        assert!(parse_power("power", "-1").is_err());
        assert!(parse_power("power", "abc").is_err());
        assert!(parse_power("power", "inf").is_err());
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading("r1", "").unwrap(), None);
        assert_eq!(parse_reading("r1", "0").unwrap(), Some(0));
        assert_eq!(parse_reading("r1", "6500").unwrap(), Some(6500));
        assert!(parse_reading("r1", "-5").is_err());
        assert!(parse_reading("r1", "12.5").is_err());
    }
}
