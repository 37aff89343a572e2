//! Deferred-error extraction results.
//!
//! Extraction helpers on [`Context`](crate::Context) return a [`Value`]
//! instead of a `Result`, so a lookup and its conversion read as one chain:
//!
//! ```
//! use blaster_core::Value;
//!
//! fn page(raw: Value) -> Result<u64, blaster_core::ContextError> {
//!     let page = raw.to_u64()?;
//!     Ok(page)
//! }
//!
//! assert_eq!(page(Value::new("3")).unwrap(), 3);
//! assert!(page(Value::new("three")).is_err());
//! ```

use std::str::FromStr;

use crate::error::ContextError;

/// Extracted text, or the error that prevented extracting it.
///
/// Every conversion returns the held error untouched when extraction
/// failed, and a [`ContextError::Conversion`] when the text does not parse.
#[derive(Debug)]
pub struct Value(Result<String, ContextError>);

impl Value {
    /// Wraps successfully extracted text.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(Ok(value.into()))
    }

    /// Wraps an extraction failure.
    #[must_use]
    pub fn from_error(error: ContextError) -> Self {
        Self(Err(error))
    }

    /// Returns true if extraction succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.0.is_ok()
    }

    /// Borrows the extracted text, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref().ok()
    }

    /// Parses the text as a signed 64-bit integer.
    pub fn to_i64(self) -> Result<i64, ContextError> {
        self.parse("i64")
    }

    /// Parses the text as a 32-bit signed integer.
    pub fn to_int(self) -> Result<i32, ContextError> {
        self.parse("i32")
    }

    /// Parses the text as an unsigned 64-bit integer.
    pub fn to_u64(self) -> Result<u64, ContextError> {
        self.parse("u64")
    }

    /// Parses the text as a 64-bit float.
    pub fn to_f64(self) -> Result<f64, ContextError> {
        self.parse("f64")
    }

    /// Returns the text itself.
    pub fn into_string(self) -> Result<String, ContextError> {
        self.0
    }

    fn parse<T: FromStr>(self, target: &'static str) -> Result<T, ContextError> {
        let text = self.0?;
        text.parse()
            .map_err(|_| ContextError::conversion(text, target))
    }
}

impl From<Result<String, ContextError>> for Value {
    fn from(result: Result<String, ContextError>) -> Self {
        Self(result)
    }
}

impl From<Value> for Result<String, ContextError> {
    fn from(value: Value) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integer_conversions() {
        assert_eq!(Value::new("42").to_i64().unwrap(), 42);
        assert_eq!(Value::new("-7").to_int().unwrap(), -7);
        assert_eq!(Value::new("2147483647").to_int().unwrap(), i32::MAX);
        assert!(Value::new("2147483648").to_int().is_err());
        assert_eq!(Value::new("18446744073709551615").to_u64().unwrap(), u64::MAX);
    }

    #[test]
    fn test_float_conversion() {
        let parsed = Value::new("2.5").to_f64().unwrap();
        assert!((parsed - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_conversion_failure() {
        let err = Value::new("12a").to_i64().unwrap_err();
        match err {
            ContextError::Conversion { value, target } => {
                assert_eq!(value, "12a");
                assert_eq!(target, "i64");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(Value::new("-1").to_u64().is_err());
        assert!(Value::new("3000000000").to_int().is_err());
    }

    #[test]
    fn test_held_error_passes_through() {
        let value = Value::from_error(ContextError::MissingParam("id".into()));
        assert!(!value.is_ok());
        assert_eq!(value.as_str(), None);
        assert!(matches!(value.to_i64(), Err(ContextError::MissingParam(name)) if name == "id"));
    }

    #[test]
    fn test_into_string() {
        assert_eq!(Value::new("").into_string().unwrap(), "");
        assert_eq!(Value::new("abc").as_str(), Some("abc"));
    }

    proptest! {
        #[test]
        fn prop_i64_text_converts_back(n in any::<i64>()) {
            prop_assert_eq!(Value::new(n.to_string()).to_i64().unwrap(), n);
        }

        #[test]
        fn prop_non_numeric_text_fails(text in "[a-z]{1,8}") {
            prop_assert!(Value::new(text).to_u64().is_err());
        }
    }
}
