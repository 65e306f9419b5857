//! Query parameter extraction.
//!
//! Parameters are deserialized as lists so a key given twice is seen as such
//! instead of silently keeping one value.

use std::fmt::Display;
use std::str::FromStr;

use axum_extra::extract::QueryRejection;
use backer_shared::{AppError, PlayerId};

/// Returns the only value of a scalar parameter.
///
/// # Errors
///
/// Returns `Validation` if the parameter is missing, repeated or empty.
pub fn single<'a>(values: &'a [String], name: &str) -> Result<&'a str, AppError> {
    match values {
        [value] if value.is_empty() => Err(AppError::Validation(format!(
            "parameter '{name}' must not be empty"
        ))),
        [value] => Ok(value),
        [] => Err(AppError::Validation(format!("missing parameter '{name}'"))),
        _ => Err(AppError::Validation(format!(
            "parameter '{name}' given {} times",
            values.len()
        ))),
    }
}

/// Parses the only value of a scalar parameter.
///
/// # Errors
///
/// Returns `Validation` if the value is not a single parsable token.
pub fn single_parsed<T>(values: &[String], name: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    single(values, name)?
        .parse()
        .map_err(|e| AppError::Validation(format!("invalid parameter '{name}': {e}")))
}

/// Reads a scalar player id parameter.
///
/// # Errors
///
/// Returns `Validation` if the parameter is missing, repeated or empty.
pub fn player_id(values: &[String], name: &str) -> Result<PlayerId, AppError> {
    single(values, name).map(PlayerId::new)
}

/// Reads a repeatable player id parameter; absent means an empty list.
///
/// # Errors
///
/// Returns `Validation` if any occurrence is empty.
pub fn player_ids(values: &[String], name: &str) -> Result<Vec<PlayerId>, AppError> {
    values
        .iter()
        .map(|value| {
            if value.is_empty() {
                Err(AppError::Validation(format!(
                    "parameter '{name}' must not be empty"
                )))
            } else {
                Ok(PlayerId::new(value.as_str()))
            }
        })
        .collect()
}

/// Converts a malformed query string into a validation error.
pub fn rejection(err: &QueryRejection) -> AppError {
    AppError::Validation(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_single_accepts_exactly_one_value() {
        assert_eq!(single(&values(&["P1"]), "playerId").unwrap(), "P1");
        assert!(matches!(
            single(&values(&[]), "playerId"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            single(&values(&["P1", "P2"]), "playerId"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            single(&values(&[""]), "playerId"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_single_parsed() {
        assert_eq!(single_parsed::<i64>(&values(&["250"]), "points").unwrap(), 250);
        assert_eq!(single_parsed::<i64>(&values(&["-3"]), "points").unwrap(), -3);
        assert!(single_parsed::<i64>(&values(&["1.5"]), "points").is_err());
        assert!(single_parsed::<i64>(&values(&["abc"]), "points").is_err());
    }

    #[test]
    fn test_player_ids_keeps_order() {
        let ids = player_ids(&values(&["P2", "P3", "P4"]), "backerId").unwrap();
        assert_eq!(
            ids,
            vec![PlayerId::new("P2"), PlayerId::new("P3"), PlayerId::new("P4")]
        );
        assert!(player_ids(&[], "backerId").unwrap().is_empty());
        assert!(player_ids(&values(&["P2", ""]), "backerId").is_err());
    }
}
