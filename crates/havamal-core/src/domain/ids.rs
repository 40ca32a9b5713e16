//! Parsing of identifiers that cross the service boundary as strings.
//!
//! An empty (or all-whitespace) string means "not supplied" for optional
//! reference fields; any other string must be a valid UUID.

use uuid::Uuid;

use crate::error::DomainError;

/// Parse a required identifier.
pub fn parse_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::InvalidIdentifier(raw.to_string()))
}

/// Parse an optional identifier where the empty string is the absent sentinel.
pub fn parse_optional_id(raw: &str) -> Result<Option<Uuid>, DomainError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_id(raw).map(Some)
    }
}

/// Collapse `Some("")` into `None` so callers can treat both the same way.
pub(crate) fn supplied(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_absent_not_an_error() {
        assert!(parse_optional_id("").unwrap().is_none());
        assert!(parse_optional_id("   ").unwrap().is_none());
    }

    #[test]
    fn malformed_non_empty_string_is_rejected() {
        let err = parse_optional_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifier(raw) if raw == "not-a-uuid"));
    }

    #[test]
    fn required_id_rejects_empty() {
        assert!(matches!(parse_id(""), Err(DomainError::InvalidIdentifier(_))));
    }

    #[test]
    fn valid_id_round_trips() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_optional_id(&id.to_string()).unwrap(), Some(id));
    }

    #[test]
    fn supplied_filters_blank_values() {
        assert_eq!(supplied(Some("")), None);
        assert_eq!(supplied(Some(" a@b.c ")), Some("a@b.c"));
        assert_eq!(supplied(None), None);
    }
}
