//! Shared helpers for command handlers.

use chrono::{DateTime, Utc};

use dcim_core::EntityId;

use crate::error::CliError;

/// Parse an RFC 3339 flag value into UTC.
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: field.into(),
            reason: format!("expected an RFC 3339 timestamp, got '{value}': {e}"),
        })
}

/// Parse an optional RFC 3339 flag value.
pub fn parse_optional_timestamp(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, CliError> {
    value.map(|v| parse_timestamp(field, v)).transpose()
}

/// Parse an id flag verbatim. Filters match it against dump keys by text,
/// so `4` selects both `4` and `"4"`.
pub fn parse_id(value: &str) -> EntityId {
    match value.parse() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let at = parse_timestamp("from", "2024-05-01T10:00:00+02:00").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn bad_timestamp_names_the_flag() {
        let err = parse_timestamp("to", "yesterday").unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "to"));
        assert_eq!(parse_optional_timestamp("to", None).unwrap(), None);
    }

    #[test]
    fn id_flags_are_kept_verbatim() {
        assert_eq!(parse_id("rack-a"), EntityId::Key("rack-a".into()));
        let hex = "ABCDEF0123456789ABCDEF0123456789";
        assert_eq!(parse_id(hex), EntityId::Key(hex.into()));
        assert!(parse_id("4").same_text(&EntityId::Numeric(4)));
        assert!(parse_id("4").same_text(&EntityId::Key("4".into())));
    }
}
