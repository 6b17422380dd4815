//! AnkiConnect response envelope.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::util::compact_text;

/// The `{result, error}` object every AnkiConnect response is wrapped in.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEnvelope {
    pub result: Value,
    pub error: Option<String>,
}

impl ApiEnvelope {
    /// Validate a decoded response body.
    ///
    /// The body must be an object with exactly the keys `result` and `error`.
    pub fn from_value(response: Value) -> Result<Self> {
        let Value::Object(mut fields) = response else {
            return Err(Error::MalformedResponse(format!(
                "expected a JSON object, got `{}`",
                compact_text(&response.to_string())
            )));
        };

        if fields.len() != 2 {
            return Err(Error::MalformedResponse(format!(
                "response has an unexpected number of fields ({})",
                fields.len()
            )));
        }
        let error = fields.remove("error").ok_or_else(|| {
            Error::MalformedResponse("response is missing required error field".to_string())
        })?;
        let result = fields.remove("result").ok_or_else(|| {
            Error::MalformedResponse("response is missing required result field".to_string())
        })?;

        let error = match error {
            Value::Null => None,
            Value::String(message) => Some(message),
            other => Some(other.to_string()),
        };

        Ok(Self { result, error })
    }

    /// Return the result, or the reported error as [`Error::Api`].
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(message) => Err(Error::Api(message)),
            None => Ok(self.result),
        }
    }
}

/// Parse a raw response body and unwrap it.
pub fn parse_response_body(body: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(body).map_err(|error| {
        Error::MalformedResponse(format!(
            "response is not valid JSON ({error}): {}",
            compact_text(body)
        ))
    })?;
    ApiEnvelope::from_value(value)?.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_result_with_null_error() {
        let value = parse_response_body(r#"{"result": ["Default"], "error": null}"#).unwrap();
        assert_eq!(value, json!(["Default"]));
    }

    #[test]
    fn accepts_null_result() {
        let value = parse_response_body(r#"{"result": null, "error": null}"#).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn reports_api_error_message() {
        let error = parse_response_body(r#"{"result": null, "error": "unsupported action"}"#)
            .unwrap_err();
        assert!(matches!(error, Error::Api(ref message) if message == "unsupported action"));
    }

    #[test]
    fn rejects_wrong_field_count() {
        let too_few = ApiEnvelope::from_value(json!({"result": 1})).unwrap_err();
        assert!(too_few.to_string().contains("unexpected number of fields (1)"));

        let too_many =
            ApiEnvelope::from_value(json!({"result": 1, "error": null, "extra": 0})).unwrap_err();
        assert!(too_many.to_string().contains("unexpected number of fields (3)"));
    }

    #[test]
    fn rejects_missing_named_fields() {
        let no_error = ApiEnvelope::from_value(json!({"result": 1, "other": null})).unwrap_err();
        assert!(no_error.to_string().contains("missing required error field"));

        let no_result = ApiEnvelope::from_value(json!({"error": null, "other": 1})).unwrap_err();
        assert!(no_result.to_string().contains("missing required result field"));
    }

    #[test]
    fn rejects_non_object_and_invalid_json() {
        assert!(matches!(
            ApiEnvelope::from_value(json!([1, 2])),
            Err(Error::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response_body("<html>nope</html>"),
            Err(Error::MalformedResponse(_))
        ));
    }

    #[test]
    fn non_string_error_is_still_an_error() {
        let error = parse_response_body(r#"{"result": null, "error": {"code": 3}}"#).unwrap_err();
        assert!(matches!(error, Error::Api(_)));
    }
}
