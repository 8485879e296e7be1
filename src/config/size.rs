//! Human size strings: `1500`, `100B`, `15K`, `2M`, `1G`, `1T` (powers of 1024)

use crate::types::SiftError;

/// Parse a size string into bytes.
///
/// A bare number is bytes. Units are single letters, case-insensitive.
pub fn parse_size(value: &str) -> Result<u64, SiftError> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);

    if digits.is_empty() {
        return Err(invalid(value, "expected a number"));
    }

    let multiplier: u64 = match unit.to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" => 1 << 10,
        "M" => 1 << 20,
        "G" => 1 << 30,
        "T" => 1 << 40,
        _ => return Err(invalid(value, "unit must be one of B, K, M, G, T")),
    };

    let number: u64 = digits
        .parse()
        .map_err(|_| invalid(value, "number is too large"))?;

    number
        .checked_mul(multiplier)
        .ok_or_else(|| invalid(value, "size overflows 64 bits"))
}

fn invalid(value: &str, why: &str) -> SiftError {
    SiftError::Config(format!("Invalid size '{}': {}", value, why))
}
