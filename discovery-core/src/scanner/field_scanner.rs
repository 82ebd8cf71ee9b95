use crate::error::{Error, Result};

const VALUE_OPEN: &str = "\":\"";
const QUOTE: char = '"';

/// A string value borrowed from the scanned buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FieldValue<'a> {
    pub value: &'a str,
    /// Byte offset just past the closing quote.
    pub next: usize,
}

/// Finds the next `"field":"value"` pair at or after byte offset `from`.
///
/// Returns `Ok(None)` when the field does not occur again. An opening quote
/// without a closing one is reported as [`Error::MalformedPayload`].
pub fn find_field_value<'a>(buffer: &'a str, from: usize, field: &str) -> Result<Option<FieldValue<'a>>> {
    if field.is_empty() {
        return Ok(None);
    }
    let bytes = buffer.as_bytes();
    let mut cursor = from;
    while let Some(offset) = buffer.get(cursor..).and_then(|rest| rest.find(field)) {
        let name_start = cursor + offset;
        let name_end = name_start + field.len();
        let quoted = name_start > 0 && bytes[name_start - 1] == b'"';
        if quoted && buffer[name_end..].starts_with(VALUE_OPEN) {
            let value_start = name_end + VALUE_OPEN.len();
            return match buffer[value_start..].find(QUOTE) {
                Some(len) => {
                    let value_end = value_start + len;
                    Ok(Some(FieldValue {
                        value: &buffer[value_start..value_end],
                        next: value_end + 1,
                    }))
                }
                None => Err(Error::MalformedPayload {
                    field: field.to_string(),
                    position: value_start,
                }),
            };
        }
        cursor = name_end;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::scanner::field_scanner::{find_field_value, FieldValue};

    #[test]
    fn find_value_and_advance() -> anyhow::Result<()> {
        let buffer = r#"{"ip":"10.0.0.1","nodeName":"node-a"},{"ip":"10.0.0.2"}"#;
        let first = find_field_value(buffer, 0, "ip")?.expect("first ip");
        assert_eq!(first.value, "10.0.0.1");
        let second = find_field_value(buffer, first.next, "ip")?.expect("second ip");
        assert_eq!(second.value, "10.0.0.2");
        assert_eq!(find_field_value(buffer, second.next, "ip")?, None);
        Ok(())
    }

    #[test]
    fn absent_field() -> anyhow::Result<()> {
        assert_eq!(find_field_value(r#"{"ip":"10.0.0.1"}"#, 0, "nodeName")?, None);
        assert_eq!(find_field_value("", 0, "ip")?, None);
        assert_eq!(find_field_value(r#"{"ip":"10.0.0.1"}"#, 100, "ip")?, None);
        Ok(())
    }

    #[test]
    fn only_exact_keys_match() -> anyhow::Result<()> {
        let buffer = r#"{"hostname":"h-1","podname":"x","name":"pod-1"}"#;
        let value = find_field_value(buffer, 0, "name")?;
        assert_eq!(value.map(|v| v.value), Some("pod-1"));
        Ok(())
    }

    #[test]
    fn non_string_values_are_skipped() -> anyhow::Result<()> {
        let buffer = r#"{"name":{"nested":1},"port":8370,"name":"app"}"#;
        assert_eq!(find_field_value(buffer, 0, "name")?.map(|v| v.value), Some("app"));
        assert_eq!(find_field_value(buffer, 0, "port")?, None);
        Ok(())
    }

    #[test]
    fn empty_value() -> anyhow::Result<()> {
        let buffer = r#"{"nodeName":"","name":"pod-1"}"#;
        let value = find_field_value(buffer, 0, "nodeName")?;
        assert_eq!(value, Some(FieldValue { value: "", next: 14 }));
        Ok(())
    }

    #[test]
    fn unterminated_value() {
        let buffer = r#"{"ip":"10.0.0.1","name":"pod-1"#;
        match find_field_value(buffer, 0, "name") {
            Err(Error::MalformedPayload { field, position }) => {
                assert_eq!(field, "name");
                assert_eq!(position, 25);
            }
            other => panic!("expected malformed payload, got {:?}", other),
        }
    }
}
