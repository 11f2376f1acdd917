//! Field rules shared by request DTOs, usable with `#[validate(custom(function = ...))]`.

use validator::ValidationError;

/// Rejects values that are empty once surrounding whitespace is removed
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Trim and drop empty optional text
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A coordinate of exactly zero means the map picker was never used
pub fn is_unselected_location(lat: f64, lng: f64) -> bool {
    lat == 0.0 || lng == 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("pothole").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  Ward 4 ".to_string())), Some("Ward 4".to_string()));
        assert_eq!(normalize_optional(Some("   ".to_string())), None);
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_unselected_location() {
        assert!(is_unselected_location(0.0, 0.0));
        assert!(is_unselected_location(27.7, 0.0));
        assert!(!is_unselected_location(27.7, 85.3));
    }
}
