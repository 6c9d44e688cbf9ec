use std::fmt;
use serde_json::{Map, Value};
use crate::error::CodecError;
use crate::tensor::constant::{INPUTS_KEY, INSTANCES_KEY};

/// Which axis is outermost in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// `"instances"`: the outermost list is indexed by instance
    Row,
    /// `"inputs"`: the outermost container is grouped by input
    Column,
}

/// Whether inputs are addressed by name in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Values are keyed by input name
    Named,
    /// A single bare nested array for a single-input model
    Unnamed,
}

/// How a request body laid out its inputs.
///
/// Derived from the body's structure alone; callers never declare it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestFormat {
    pub order: Order,
    pub format: Format,
}

impl RequestFormat {
    pub const fn new(order: Order, format: Format) -> Self {
        Self { order, format }
    }

    /// Classify a request document.
    ///
    /// | top level | result |
    /// |---|---|
    /// | both `instances` and `inputs` | [`CodecError::AmbiguousFormat`] |
    /// | `instances: [{..}, ..]` | row / named |
    /// | `instances: [..]` | row / unnamed |
    /// | `inputs: {..}` | column / named |
    /// | `inputs: [..]` | column / unnamed |
    /// | empty container, or neither key | [`CodecError::NoInputsFound`] |
    /// | any other value under either key | [`CodecError::InputsNotAContainer`] |
    pub fn detect(document: &Map<String, Value>) -> Result<Self, CodecError> {
        match (document.get(INSTANCES_KEY), document.get(INPUTS_KEY)) {
            (Some(_), Some(_)) => Err(CodecError::AmbiguousFormat),
            (Some(instances), None) => match instances {
                Value::Array(items) if items.is_empty() => Err(CodecError::NoInputsFound),
                Value::Array(items) => {
                    let format = if items.first().is_some_and(Value::is_object) {
                        Format::Named
                    } else {
                        Format::Unnamed
                    };
                    Ok(Self::new(Order::Row, format))
                }
                _ => Err(CodecError::InputsNotAContainer),
            },
            (None, Some(inputs)) => match inputs {
                Value::Object(named) if named.is_empty() => Err(CodecError::NoInputsFound),
                Value::Object(_) => Ok(Self::new(Order::Column, Format::Named)),
                Value::Array(items) if items.is_empty() => Err(CodecError::NoInputsFound),
                Value::Array(_) => Ok(Self::new(Order::Column, Format::Unnamed)),
                _ => Err(CodecError::InputsNotAContainer),
            },
            (None, None) => Err(CodecError::NoInputsFound),
        }
    }
}

impl fmt::Display for RequestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.order, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detect(body: Value) -> Result<RequestFormat, CodecError> {
        match body {
            Value::Object(document) => RequestFormat::detect(&document),
            other => panic!("test body must be an object: {other}"),
        }
    }

    #[test]
    fn test_detects_all_four_layouts() {
        assert_eq!(
            detect(json!({"inputs": {"a": [[1]]}})),
            Ok(RequestFormat::new(Order::Column, Format::Named))
        );
        assert_eq!(
            detect(json!({"inputs": [[1, 2]]})),
            Ok(RequestFormat::new(Order::Column, Format::Unnamed))
        );
        assert_eq!(
            detect(json!({"instances": [{"a": [1]}, {"a": [2]}]})),
            Ok(RequestFormat::new(Order::Row, Format::Named))
        );
        assert_eq!(
            detect(json!({"instances": [[1], [2]]})),
            Ok(RequestFormat::new(Order::Row, Format::Unnamed))
        );
    }

    #[test]
    fn test_empty_and_missing_inputs() {
        assert_eq!(detect(json!({"inputs": {}})), Err(CodecError::NoInputsFound));
        assert_eq!(detect(json!({"inputs": []})), Err(CodecError::NoInputsFound));
        assert_eq!(detect(json!({"instances": []})), Err(CodecError::NoInputsFound));
        assert_eq!(detect(json!({"signature_name": ""})), Err(CodecError::NoInputsFound));
    }

    #[test]
    fn test_non_container_inputs() {
        assert_eq!(detect(json!({"inputs": "string"})), Err(CodecError::InputsNotAContainer));
        assert_eq!(detect(json!({"inputs": 5})), Err(CodecError::InputsNotAContainer));
        assert_eq!(detect(json!({"inputs": null})), Err(CodecError::InputsNotAContainer));
        assert_eq!(detect(json!({"instances": {"a": [1]}})), Err(CodecError::InputsNotAContainer));
    }

    #[test]
    fn test_both_keys_is_ambiguous() {
        assert_eq!(
            detect(json!({"inputs": {"a": [1]}, "instances": [[1]]})),
            Err(CodecError::AmbiguousFormat)
        );
    }
}
