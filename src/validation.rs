use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::{error::AppError, models::nodes::NodeKind};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parses the fixed ISO-8601 subset `YYYY-MM-DDTHH:MM:SS[.ffffff]Z`.
/// The trailing 'Z' is mandatory and interpreted as UTC offset zero;
/// numeric offsets are rejected.
pub fn parse_iso_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDateTime::parse_from_str(raw, ISO_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::MalformedTimestamp(raw.to_string()))
}

/// Renders an instant back into the wire format of `date` fields.
pub fn format_iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn validate_kind(id: &str, raw: &str) -> Result<NodeKind, AppError> {
    match raw {
        "FILE" => Ok(NodeKind::File),
        "FOLDER" => Ok(NodeKind::Folder),
        _ => Err(AppError::InvalidType { id: id.to_string() }),
    }
}

/// A folder must carry no size; a file must carry a strictly positive one.
pub fn validate_size(id: &str, kind: NodeKind, size: Option<i64>) -> Result<(), AppError> {
    let valid = match kind {
        NodeKind::Folder => size.is_none(),
        NodeKind::File => size.is_some_and(|value| value > 0),
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidSize { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn parses_timestamp_with_microseconds() {
        let parsed = parse_iso_timestamp("2023-01-01T12:30:45.123456Z").unwrap();
        let expected = Utc
            .with_ymd_and_hms(2023, 1, 1, 12, 30, 45)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn parses_timestamp_with_milliseconds_and_without_fraction() {
        assert!(parse_iso_timestamp("2023-01-01T00:00:00.000Z").is_ok());
        assert!(parse_iso_timestamp("2023-01-01T00:00:00Z").is_ok());
    }

    #[test]
    fn rejects_timestamp_without_z_designator() {
        assert!(parse_iso_timestamp("2023-01-01T00:00:00.000").is_err());
        assert!(parse_iso_timestamp("2023-01-01T00:00:00.000+00:00").is_err());
    }

    #[test]
    fn rejects_garbage_timestamps() {
        for raw in ["", "yesterday", "2023-01-01", "2023-13-01T00:00:00Z"] {
            assert!(parse_iso_timestamp(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn formats_timestamp_with_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_iso_timestamp(ts), "2023-01-01T00:00:00.000000Z");
    }

    #[test]
    fn accepts_known_kinds_only() {
        assert_eq!(validate_kind("n1", "FILE").unwrap(), NodeKind::File);
        assert_eq!(validate_kind("n1", "FOLDER").unwrap(), NodeKind::Folder);

        let err = validate_kind("n1", "DIRECTORY").unwrap_err();
        assert!(err.to_string().contains("'n1'"));
    }

    #[test]
    fn folder_size_must_be_null() {
        assert!(validate_size("f1", NodeKind::Folder, None).is_ok());

        let err = validate_size("f1", NodeKind::Folder, Some(10)).unwrap_err();
        assert!(err.to_string().contains("'f1'"));
    }

    #[test]
    fn file_size_must_be_strictly_positive() {
        assert!(validate_size("file1", NodeKind::File, Some(1)).is_ok());
        assert!(validate_size("file1", NodeKind::File, Some(100)).is_ok());

        for bad in [None, Some(0), Some(-5)] {
            assert!(validate_size("file1", NodeKind::File, bad).is_err());
        }
    }
}
