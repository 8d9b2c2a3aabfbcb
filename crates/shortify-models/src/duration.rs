//! ISO-8601 duration parsing.
//!
//! The YouTube Data API reports video lengths as ISO-8601 durations in
//! `contentDetails.duration`, e.g. `PT1H2M30S` or `PT45S`. Only the time
//! components are supported; date components (years, months, days other
//! than via `P#DT...`) do not occur for videos.

/// Parse an ISO-8601 duration string to total seconds.
///
/// # Examples
/// ```
/// use shortify_models::duration::parse_iso8601_duration;
/// assert_eq!(parse_iso8601_duration("PT2M").unwrap(), 120.0);
/// assert_eq!(parse_iso8601_duration("PT1H2M30S").unwrap(), 3750.0);
/// assert_eq!(parse_iso8601_duration("P1DT1S").unwrap(), 86401.0);
/// ```
pub fn parse_iso8601_duration(s: &str) -> Result<f64, DurationError> {
    let rest = s
        .strip_prefix('P')
        .ok_or_else(|| DurationError::MissingPrefix(s.to_string()))?;

    let mut total = 0.0;
    let mut in_time = false;
    let mut number = String::new();
    let mut saw_component = false;

    for c in rest.chars() {
        match c {
            'T' => {
                if in_time {
                    return Err(DurationError::Malformed(s.to_string()));
                }
                in_time = true;
            }
            '0'..='9' | '.' => number.push(c),
            unit => {
                let value: f64 = number
                    .parse()
                    .map_err(|_| DurationError::Malformed(s.to_string()))?;
                number.clear();
                saw_component = true;

                let multiplier = match (unit, in_time) {
                    ('D', false) => 86400.0,
                    ('H', true) => 3600.0,
                    ('M', true) => 60.0,
                    ('S', true) => 1.0,
                    _ => return Err(DurationError::UnknownUnit(unit)),
                };
                total += value * multiplier;
            }
        }
    }

    // Trailing digits without a unit, or no components at all
    if !number.is_empty() || !saw_component {
        return Err(DurationError::Malformed(s.to_string()));
    }

    Ok(total)
}

/// ISO-8601 duration parsing error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DurationError {
    #[error("Duration '{0}' does not start with 'P'")]
    MissingPrefix(String),

    #[error("Malformed duration '{0}'")]
    Malformed(String),

    #[error("Unknown duration unit '{0}'")]
    UnknownUnit(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds_only() {
        assert_eq!(parse_iso8601_duration("PT45S").unwrap(), 45.0);
    }

    #[test]
    fn test_parse_minutes_seconds() {
        assert_eq!(parse_iso8601_duration("PT2M5S").unwrap(), 125.0);
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_iso8601_duration("PT1H").unwrap(), 3600.0);
        assert_eq!(parse_iso8601_duration("PT10H30M15S").unwrap(), 37815.0);
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_iso8601_duration("P1DT2H").unwrap(), 93600.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_iso8601_duration("1H2M"),
            Err(DurationError::MissingPrefix(_))
        ));
        assert!(matches!(
            parse_iso8601_duration("PT"),
            Err(DurationError::Malformed(_))
        ));
        assert!(matches!(
            parse_iso8601_duration("PT5"),
            Err(DurationError::Malformed(_))
        ));
        // 'M' outside the time section would be months, which videos never have
        assert!(matches!(
            parse_iso8601_duration("P2M"),
            Err(DurationError::UnknownUnit('M'))
        ));
    }
}
