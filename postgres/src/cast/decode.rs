use serde::de::Error as _;

use crate::values::PostgresValue;

/// Decodes one raw value read for a model field.
///
/// Values of plain fields pass through. JSON-encoded fields parse text into
/// [`PostgresValue::Json`]; values the driver already parsed and NULL pass
/// through; anything else is an error.
pub fn decode(raw: &PostgresValue, json: bool) -> Result<PostgresValue, serde_json::Error> {
    if !json {
        return Ok(raw.clone());
    }

    match raw {
        PostgresValue::Text(text) => serde_json::from_str(text).map(PostgresValue::Json),
        PostgresValue::Json(_) | PostgresValue::Null => Ok(raw.clone()),
        other => Err(serde_json::Error::custom(format_args!(
            "expected JSON text, found {}",
            other.type_name()
        ))),
    }
}
