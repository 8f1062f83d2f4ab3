// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::time::Duration;

use duration_string::DurationString;

use crate::config::ConfigError;

/// Values of time_until_destroyed that mean the playback is never disposed.
const NEVER_DISPOSE: [&str; 3] = ["infinite", "inf", "never"];

/// Parses a duration from either a bare number of seconds (e.g. 2.5) or a duration
/// string (e.g. 350ms, 2m).
pub fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidDuration {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    };

    let trimmed = value.trim();
    if let Ok(seconds) = trimmed.parse::<f64>() {
        return Duration::try_from_secs_f64(seconds).map_err(|e| invalid(e.to_string()));
    }

    Ok(DurationString::from_string(trimmed.to_string())
        .map_err(|e| invalid(e.to_string()))?
        .into())
}

/// Parses a playback lifetime. Returns None when the value asks for no disposal at all.
pub fn parse_lifetime(field: &str, value: &str) -> Result<Option<Duration>, ConfigError> {
    let trimmed = value.trim();
    if NEVER_DISPOSE
        .iter()
        .any(|never| trimmed.eq_ignore_ascii_case(never))
    {
        return Ok(None);
    }
    parse_duration(field, trimmed).map(Some)
}

/// Outputs the given duration in a seconds.millis format.
pub fn duration_seconds(duration: Duration) -> String {
    format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_duration_seconds_strings() {
        assert_eq!("0.000s", duration_seconds(Duration::ZERO));
        assert_eq!("2.500s", duration_seconds(Duration::from_millis(2500)));
        assert_eq!("0.016s", duration_seconds(Duration::from_millis(16)));
        assert_eq!("130.000s", duration_seconds(Duration::from_secs(130)));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(
            parse_duration("t", "350ms").unwrap(),
            Duration::from_millis(350)
        );
        assert_eq!(parse_duration("t", "2m").unwrap(), Duration::from_secs(120));
        assert_eq!(
            parse_duration("t", "1.5").unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(parse_duration("t", " 4 ").unwrap(), Duration::from_secs(4));
        assert!(parse_duration("t", "-1").is_err());
        assert!(parse_duration("t", "whenever").is_err());
    }

    #[test]
    fn test_invalid_duration_string_keeps_reason() {
        match parse_duration("door.start_time", "1.5 fortnights") {
            Err(ConfigError::InvalidDuration {
                field,
                value,
                reason,
            }) => {
                assert_eq!(field, "door.start_time");
                assert_eq!(value, "1.5 fortnights");
                assert!(!reason.is_empty());
            }
            other => panic!("expected invalid duration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_lifetime() {
        assert_eq!(parse_lifetime("t", "infinite").unwrap(), None);
        assert_eq!(parse_lifetime("t", "Never").unwrap(), None);
        assert_eq!(
            parse_lifetime("t", "10s").unwrap(),
            Some(Duration::from_secs(10))
        );
    }
}
