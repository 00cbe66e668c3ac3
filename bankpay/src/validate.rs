//! Field-level validation predicates shared by all domain models.
//!
//! Every check is a pure function taking the wire-spelled field name and the
//! candidate value, returning `Ok(())` or the most specific
//! [`ValidationError`] variant. Model constructors compose several of these;
//! nothing here mutates its input or has side effects.
//!
//! Comparator policy is deliberately per call site: [`positive`] rejects
//! zero (money amounts must be strictly positive) while [`non_negative`]
//! accepts it (TTLs and counts may be zero).

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ValidationError;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("valid uuid pattern")
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date pattern"));

static NATIONAL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{8})-?(\d{4})$").expect("valid national id pattern"));

/// Checks that a string is neither empty nor whitespace-only.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyValue`] on violation.
pub fn non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty(field));
    }
    Ok(())
}

/// Checks that a string is a canonical hyphenated UUID.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalValue`] on violation.
pub fn uuid(field: &str, value: &str) -> Result<(), ValidationError> {
    if !UUID_RE.is_match(value) {
        return Err(ValidationError::illegal_value(
            field,
            format!("'{value}' is not a valid UUID"),
        ));
    }
    Ok(())
}

/// Checks that a string looks like an email address.
///
/// The pattern is deliberately pragmatic: one `@`, no whitespace, a dotted
/// domain. Full RFC 5322 parsing is the gateway's job.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalValue`] on violation.
pub fn email(field: &str, value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::illegal_value(
            field,
            format!("'{value}' is not a valid email address"),
        ));
    }
    Ok(())
}

/// Checks that a string is a real `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalValue`] on violation.
pub fn date(field: &str, value: &str) -> Result<(), ValidationError> {
    let illegal = || ValidationError::illegal_value(field, format!("'{value}' is not a valid date"));
    let captures = DATE_RE.captures(value).ok_or_else(illegal)?;
    let year: u16 = captures[1].parse().map_err(|_| illegal())?;
    let month: u8 = captures[2].parse().map_err(|_| illegal())?;
    let day: u8 = captures[3].parse().map_err(|_| illegal())?;
    if !calendar_date_valid(year, month, day) {
        return Err(illegal());
    }
    Ok(())
}

/// Checks that an amount is strictly positive (zero is rejected).
///
/// # Errors
///
/// Returns [`ValidationError::IllegalValue`] on violation.
pub fn positive(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::illegal_value(
            field,
            format!("'{value}' must be strictly positive"),
        ));
    }
    Ok(())
}

/// Checks that a signed count or duration is zero or greater.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalValue`] on violation.
pub fn non_negative(field: &str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::illegal_value(
            field,
            format!("'{value}' must not be negative"),
        ));
    }
    Ok(())
}

/// Checks that a value lies within inclusive bounds.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalValue`] on violation.
pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::illegal_value(
            field,
            format!("'{value}' is outside the range {min}..={max}"),
        ));
    }
    Ok(())
}

/// Checks that every character of a string belongs to an allowed alphabet.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalCharset`] on violation.
pub fn charset(field: &str, value: &str, allowed: &str) -> Result<(), ValidationError> {
    if !value.chars().all(|c| allowed.contains(c)) {
        return Err(ValidationError::illegal_charset(field));
    }
    Ok(())
}

/// Checks a national identity number: `YYYYMMDD-NNNN` or the 12-digit
/// compact form, with a real birth date and a valid Luhn check digit over
/// the last ten digits.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalCustomer`] on violation.
pub fn national_id(field: &str, value: &str) -> Result<(), ValidationError> {
    let illegal = || {
        ValidationError::illegal_customer(format!("'{field}' is not a valid national identity number"))
    };
    let captures = NATIONAL_ID_RE.captures(value).ok_or_else(illegal)?;
    let date_part = &captures[1];
    let serial = &captures[2];

    let year: u16 = date_part[0..4].parse().map_err(|_| illegal())?;
    let month: u8 = date_part[4..6].parse().map_err(|_| illegal())?;
    let day: u8 = date_part[6..8].parse().map_err(|_| illegal())?;
    if !calendar_date_valid(year, month, day) {
        return Err(illegal());
    }

    // Check digit covers the short form: YYMMDD + serial.
    let digits: Vec<u32> = date_part[2..8]
        .chars()
        .chain(serial.chars())
        .filter_map(|c| c.to_digit(10))
        .collect();
    if !luhn_valid(&digits) {
        return Err(illegal());
    }
    Ok(())
}

fn calendar_date_valid(year: u16, month: u8, day: u8) -> bool {
    if year < 1800 || month == 0 || month > 12 || day == 0 {
        return false;
    }
    day <= days_in_month(year, month)
}

const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Luhn checksum over a digit sequence; every second digit from the left is
/// doubled and digit-summed.
fn luhn_valid(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}
