//! Standard I/O bridge: one JSON document read from the input stream before
//! the handler runs, one pretty-printed document written after it returns.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};
use std::fs::File;
use std::io::Write;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::types::{InvokeError, RequestPayload};

/// Reads the whole input stream and decodes it as a single invocation
/// request. A document without the `{event, context}` envelope is the
/// legacy bare-event form.
pub async fn read_request<R>(input: &mut R) -> Result<RequestPayload, InvokeError>
where
    R: AsyncRead + Unpin,
{
    let mut raw = Vec::new();
    input
        .read_to_end(&mut raw)
        .await
        .map_err(|e| InvokeError::Decode(serde_json::Error::io(e)))?;

    let doc: Value = serde_json::from_slice(&raw).map_err(InvokeError::Decode)?;

    let is_envelope = doc
        .as_object()
        .map(|map| map.contains_key("event"))
        .unwrap_or(false);

    if is_envelope {
        serde_json::from_value(doc).map_err(InvokeError::Decode)
    } else {
        Ok(RequestPayload {
            event: doc,
            context: None,
        })
    }
}

/// Serializes the handler result with 4-space indentation and writes it in
/// a single call. Either the complete document reaches the output or none
/// of it does.
pub fn write_result<W>(output: &mut W, result: &Value) -> Result<(), InvokeError>
where
    W: Write,
{
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    result.serialize(&mut ser).map_err(InvokeError::Encode)?;

    output
        .write_all(&buf)
        .map_err(|e| InvokeError::Encode(serde_json::Error::io(e)))?;
    Ok(())
}

/// Converts a high-precision decimal to the nearest representable JSON
/// number: integral values become integers, everything else the closest
/// float.
pub fn decimal_to_number(value: Decimal) -> Number {
    if value.fract().is_zero() {
        if let Some(int) = value.to_i64() {
            return Number::from(int);
        }
    }

    match value.to_f64().and_then(Number::from_f64) {
        Some(float) => float,
        // a Decimal is always finite, so the float path cannot fail
        None => Number::from(0),
    }
}

/// Attempts to open the controlling terminal for handlers that prompt a
/// human after stdin has been consumed for the event. Returns None when the
/// process has no controlling terminal (CI, sandboxes, non-unix platforms).
pub fn open_controlling_terminal() -> Option<File> {
    #[cfg(unix)]
    {
        File::open("/dev/tty").ok()
    }
    #[cfg(not(unix))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn reads_the_current_envelope_form() {
        let mut input = br#"{"event": {"path": "/"}, "context": {"name": "greeter"}}"#.as_slice();

        let request = read_request(&mut input).await.unwrap();

        assert_eq!(request.event, json!({"path": "/"}));
        assert_eq!(request.context.unwrap().name.as_deref(), Some("greeter"));
    }

    #[tokio::test]
    async fn reads_the_legacy_bare_event_form() {
        let mut input = br#"[1, 2, 3]"#.as_slice();
        let request = read_request(&mut input).await.unwrap();
        assert_eq!(request.event, json!([1, 2, 3]));
        assert!(request.context.is_none());

        // an object without an `event` key is also a bare event
        let mut input = br#"{"path": "/"}"#.as_slice();
        let request = read_request(&mut input).await.unwrap();
        assert_eq!(request.event, json!({"path": "/"}));
        assert!(request.context.is_none());
    }

    #[tokio::test]
    async fn malformed_input_is_a_decode_error() {
        let mut input = br#"{"event": "#.as_slice();

        assert!(matches!(
            read_request(&mut input).await,
            Err(InvokeError::Decode(_))
        ));
    }

    #[test]
    fn output_is_indented_with_four_spaces() {
        let mut out = Vec::new();
        write_result(&mut out, &json!({"statusCode": 200})).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n    \"statusCode\": 200\n}"
        );
    }

    #[test]
    fn integral_decimals_become_integers() {
        assert_eq!(decimal_to_number(Decimal::new(3, 0)), Number::from(3));
        assert_eq!(decimal_to_number(Decimal::new(-42, 0)), Number::from(-42));
        // 20.00 is integral even though it carries scale
        assert_eq!(decimal_to_number(Decimal::new(2000, 2)), Number::from(20));
    }

    #[test]
    fn fractional_decimals_become_floats() {
        let n = decimal_to_number(Decimal::new(1999, 2));
        assert!(n.is_f64());
        assert!((n.as_f64().unwrap() - 19.99).abs() < 1e-9);
    }
}
