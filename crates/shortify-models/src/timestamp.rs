//! Timestamp parsing and the clip window.
//!
//! Supports the formats the configuration surface accepts:
//! HH:MM:SS, HH:MM:SS.mmm, MM:SS, and bare SS.

/// Maximum reasonable video duration (24 hours in seconds).
pub const MAX_VIDEO_DURATION_SECS: f64 = 86400.0;

/// Parse a timestamp string to total seconds.
///
/// Supports formats:
/// - `HH:MM:SS` or `HH:MM:SS.mmm`
/// - `MM:SS` or `MM:SS.mmm`
/// - `SS` or `SS.mmm`
///
/// # Examples
/// ```
/// use shortify_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("00:02:00").unwrap(), 120.0);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    let components: Vec<f64> = match parts.len() {
        1..=3 => parts
            .iter()
            .map(|p| {
                p.parse::<f64>()
                    .map_err(|_| TimestampError::InvalidValue(p.to_string()))
            })
            .collect::<Result<_, _>>()?,
        _ => return Err(TimestampError::InvalidFormat(ts.to_string())),
    };

    if components.iter().any(|&c| c < 0.0) {
        return Err(TimestampError::Negative);
    }

    let secs = components
        .iter()
        .fold(0.0, |acc, &component| acc * 60.0 + component);

    if secs > MAX_VIDEO_DURATION_SECS {
        return Err(TimestampError::ExceedsMaxDuration(MAX_VIDEO_DURATION_SECS));
    }

    Ok(secs)
}

/// Format seconds into an HH:MM:SS or HH:MM:SS.mmm string.
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

/// The (start, end) time range selected from the source video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipWindow {
    /// Start time in seconds
    pub start_secs: f64,
    /// End time in seconds
    pub end_secs: f64,
}

impl ClipWindow {
    /// Validate and build a window from two timestamps.
    pub fn new(start_secs: f64, end_secs: f64) -> Result<Self, TimestampError> {
        if start_secs < 0.0 || end_secs < 0.0 {
            return Err(TimestampError::Negative);
        }
        if start_secs >= end_secs {
            return Err(TimestampError::StartNotBeforeEnd);
        }
        Ok(Self {
            start_secs,
            end_secs,
        })
    }

    /// Parse a `START-END` range string, e.g. `00:02:00-00:02:45`.
    pub fn parse(range: &str) -> Result<Self, TimestampError> {
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| TimestampError::InvalidFormat(range.to_string()))?;
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    /// Requested window length in seconds.
    pub fn length_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

impl std::fmt::Display for ClipWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            format_seconds(self.start_secs),
            format_seconds(self.end_secs)
        )
    }
}

/// Timestamp parsing/validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Timestamp cannot be negative")]
    Negative,

    #[error("Invalid timestamp value: {0}")]
    InvalidValue(String),

    #[error("Invalid timestamp format '{0}'. Use HH:MM:SS, MM:SS, or SS")]
    InvalidFormat(String),

    #[error("Start time must be before end time")]
    StartNotBeforeEnd,

    #[error("Timestamp exceeds maximum allowed duration ({0} seconds)")]
    ExceedsMaxDuration(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_hh_mm_ss() {
        assert_eq!(parse_timestamp("00:00:00").unwrap(), 0.0);
        assert_eq!(parse_timestamp("00:01:00").unwrap(), 60.0);
        assert_eq!(parse_timestamp("01:00:00").unwrap(), 3600.0);
        assert_eq!(parse_timestamp("01:30:45").unwrap(), 5445.0);
    }

    #[test]
    fn test_parse_timestamp_mm_ss_and_ss() {
        assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
        assert_eq!(parse_timestamp("90").unwrap(), 90.0);
        assert_eq!(parse_timestamp("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_timestamp_with_milliseconds() {
        let result = parse_timestamp("00:00:30.500").unwrap();
        assert!((result - 30.5).abs() < 0.001);
    }

    #[test]
    fn test_parse_timestamp_errors() {
        assert!(matches!(parse_timestamp(""), Err(TimestampError::Empty)));
        assert!(matches!(parse_timestamp("  "), Err(TimestampError::Empty)));
        assert!(matches!(
            parse_timestamp("abc"),
            Err(TimestampError::InvalidValue(_))
        ));
        assert!(matches!(
            parse_timestamp("1:2:3:4"),
            Err(TimestampError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_timestamp("-5"),
            Err(TimestampError::Negative)
        ));
    }

    #[test]
    fn test_window_parse() {
        let window = ClipWindow::parse("00:02:00-00:02:45").unwrap();
        assert_eq!(window.start_secs, 120.0);
        assert_eq!(window.end_secs, 165.0);
        assert_eq!(window.length_secs(), 45.0);
    }

    #[test]
    fn test_window_start_after_end() {
        assert!(matches!(
            ClipWindow::parse("00:02:00-00:01:00"),
            Err(TimestampError::StartNotBeforeEnd)
        ));
    }

    #[test]
    fn test_window_missing_separator() {
        assert!(matches!(
            ClipWindow::parse("00:02:00"),
            Err(TimestampError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "00:00:00");
        assert_eq!(format_seconds(90.0), "00:01:30");
        assert_eq!(format_seconds(3661.0), "01:01:01");
    }

    #[test]
    fn test_window_display_roundtrip() {
        let window = ClipWindow::parse("00:00:00-00:00:55").unwrap();
        assert_eq!(window.to_string(), "00:00:00-00:00:55");
        assert_eq!(ClipWindow::parse(&window.to_string()).unwrap(), window);
    }
}
