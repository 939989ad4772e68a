//! Parsing of CLI argument values

use crate::sampler::errors::{SamplingError, SamplingResult};

/// Parse a `<a>x<b>` pair such as `256x256` or `4x3`
///
/// # Arguments
/// * `value` - The argument text
/// * `what` - Name used in error messages
///
/// # Returns
/// Both numbers, each non-zero
pub fn parse_dimensions(value: &str, what: &str) -> SamplingResult<(u32, u32)> {
    let lower = value.trim().to_lowercase();
    let parts: Vec<&str> = lower.split('x').collect();
    if parts.len() != 2 {
        return Err(SamplingError::InvalidRequest(
            format!("{} must look like <a>x<b>, got '{}'", what, value)));
    }

    let parse = |s: &str| -> SamplingResult<u32> {
        s.trim().parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| SamplingError::InvalidRequest(
                format!("Invalid {} component '{}'", what, s)))
    };

    Ok((parse(parts[0])?, parse(parts[1])?))
}

/// Parse a positive floating point factor
pub fn parse_factor(value: &str, what: &str) -> SamplingResult<f64> {
    value.trim().parse::<f64>()
        .ok()
        .filter(|v| *v > 0.0 && v.is_finite())
        .ok_or_else(|| SamplingError::InvalidRequest(format!("{} must be a positive number, got '{}'", what, value)))
}
