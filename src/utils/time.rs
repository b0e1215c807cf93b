//! Time parsing and formatting utilities
//!
//! The codec works on whole seconds: `format` floors, `parse` only accepts
//! integral fields. Hours are capped at 23 on input.

use crate::domain::errors::DomainError;

/// Largest value accepted in the hours field
pub const MAX_HOURS: u32 = 23;

/// Converts between seconds and `HH:MM:SS` display strings
pub struct TimeCodec;

impl TimeCodec {
    /// Parse `SS`, `MM:SS` or `HH:MM:SS` into seconds
    pub fn parse(time_str: &str) -> Result<f64, DomainError> {
        let trimmed = time_str.trim();
        let parts: Vec<&str> = trimmed.split(':').collect();

        let (hours, minutes, seconds) = match parts.as_slice() {
            [s] => ("0", "0", *s),
            [m, s] => ("0", *m, *s),
            [h, m, s] => (*h, *m, *s),
            _ => return Err(DomainError::Format(time_str.to_string())),
        };

        let hours = Self::parse_field(hours, MAX_HOURS, time_str)?;
        let minutes = Self::parse_field(minutes, 59, time_str)?;
        let seconds = Self::parse_field(seconds, 59, time_str)?;

        Ok(f64::from(hours * 3600 + minutes * 60 + seconds))
    }

    /// One or two ASCII digits, at most `max`
    fn parse_field(field: &str, max: u32, original: &str) -> Result<u32, DomainError> {
        if field.is_empty() || field.len() > 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::Format(original.to_string()));
        }
        let value: u32 = field
            .parse()
            .map_err(|_| DomainError::Format(original.to_string()))?;
        if value > max {
            return Err(DomainError::Format(original.to_string()));
        }
        Ok(value)
    }

    /// Format seconds as zero-padded `HH:MM:SS`, flooring fractions
    pub fn format(seconds: f64) -> String {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.floor() as u64
        } else {
            0
        };
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let secs = total % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    }

    /// Parse both texts and require start strictly before end
    pub fn validate_range(start: &str, end: &str) -> Result<(f64, f64), DomainError> {
        let start_seconds = Self::parse(start)?;
        let end_seconds = Self::parse(end)?;
        if start_seconds >= end_seconds {
            return Err(DomainError::Range(
                "End time must be after start time".to_string(),
            ));
        }
        Ok((start_seconds, end_seconds))
    }
}
