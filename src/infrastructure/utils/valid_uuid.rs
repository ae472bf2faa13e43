use uuid::Uuid;

use crate::errors::AppError;

/// Parses a path identifier, reporting bad input as a 400 rather than a 404.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::InvalidInput(format!("'{id}' is not a valid id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyphenated_ids() {
        let id = Uuid::new_v4();
        assert_eq!(valid_uuid(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn rejects_garbage_as_invalid_input() {
        assert!(matches!(valid_uuid("draft"), Err(AppError::InvalidInput(_))));
    }
}
