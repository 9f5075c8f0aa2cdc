//! Identity types shared across crates

/// Primary key type, matching the `SERIAL` column of the assignments table
pub type Id = i32;

/// Parse a path segment into an [`Id`]
pub fn parse_id(raw: &str) -> Option<Id> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("-3"), Some(-3));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("4.2"), None);
        assert_eq!(parse_id("99999999999"), None);
    }
}
