pub mod application;
pub mod company;
pub mod job;

use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

/// A field of a partial update: `None` when absent from the body,
/// `Some(None)` for an explicit `null`, `Some(Some(v))` for a value.
pub type Patch<T> = Option<Option<T>>;

/// `deserialize_with` target for `Patch<T>` fields. Pair with `#[serde(default)]`
/// so that absent fields stay `None`.
pub fn present<'de, T, D>(deserializer: D) -> Result<Patch<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrites `slot` when the field was supplied, clearing it on `null`.
pub fn apply<T>(slot: &mut Option<T>, patch: Patch<T>) {
    if let Some(value) = patch {
        *slot = value;
    }
}

/// Unwraps a patch for a non-nullable column; an explicit `null` is rejected.
pub fn required<T>(field: &str, patch: Patch<T>) -> Result<Option<T>, AppError> {
    match patch {
        Some(None) => Err(AppError::Validation(format!("{field} cannot be null"))),
        Some(Some(value)) => Ok(Some(value)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "present")]
        note: Patch<String>,
    }

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let absent: Body = serde_json::from_str("{}").unwrap();
        let null: Body = serde_json::from_str(r#"{"note": null}"#).unwrap();
        let value: Body = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();

        assert_eq!(absent.note, None);
        assert_eq!(null.note, Some(None));
        assert_eq!(value.note, Some(Some("hi".to_string())));
    }

    #[test]
    fn test_apply_clears_on_null_and_keeps_on_absent() {
        let mut slot = Some(3);
        apply(&mut slot, None);
        assert_eq!(slot, Some(3));
        apply(&mut slot, Some(None));
        assert_eq!(slot, None);
    }

    #[test]
    fn test_required_rejects_explicit_null() {
        assert!(matches!(
            required::<String>("title", Some(None)),
            Err(AppError::Validation(_))
        ));
        assert_eq!(required::<i64>("company_id", None).unwrap(), None);
    }
}
