use serde_json::{Map, Value};
use tracing::{debug, trace};
use crate::error::CodecError;
use crate::tensor::constant::{BATCH_DIM, INPUTS_KEY, INSTANCES_KEY, SIGNATURE_NAME_KEY};
use crate::tensor::{InputSignature, TensorBuffer, TensorMap, TensorSpec};
use super::format::{Format, Order, RequestFormat};
use super::walker::ShapeWalker;

/// The tensors decoded from one request body.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRequest {
    /// Layout the body used
    pub format: RequestFormat,

    /// Value of the optional top level `signature_name` string
    pub signature_name: Option<String>,

    /// One buffer per input present in the body
    pub inputs: TensorMap,
}

/// Decodes JSON request bodies into tensors matching a model's input signature.
///
/// The parser holds only the signature, so a single instance can be shared
/// by every request handler without coordination.
///
/// # Shape rules
///
/// Each input must be a rectangular nested array of numbers whose rank equals
/// the declared rank and whose non-batch dimensions equal the declared ones.
/// The batch dimension is taken from the body, so inputs of one request may
/// carry different batch sizes.
#[derive(Debug, Clone)]
pub struct RequestParser {
    signature: InputSignature,
}

impl RequestParser {
    /// A parser that decodes bodies against `signature`
    pub fn new(signature: InputSignature) -> Self {
        Self { signature }
    }

    /// The signature bodies are checked against
    pub fn signature(&self) -> &InputSignature {
        &self.signature
    }

    /// Parse a body from text
    pub fn parse(&self, body: &str) -> Result<DecodedRequest, CodecError> {
        let document: Value = serde_json::from_str(body)
            .map_err(|e| CodecError::InvalidJson(e.to_string()))?;
        self.parse_value(&document)
    }

    /// Parse an already deserialized body
    pub fn parse_value(&self, body: &Value) -> Result<DecodedRequest, CodecError> {
        let Value::Object(document) = body else {
            return Err(CodecError::BodyNotAnObject);
        };
        let signature_name = document
            .get(SIGNATURE_NAME_KEY)
            .and_then(Value::as_str)
            .map(str::to_owned);

        let format = RequestFormat::detect(document)?;
        trace!(%format, "detected request format");

        let inputs = match (format.order, format.format) {
            (Order::Column, Format::Named) => match document.get(INPUTS_KEY) {
                Some(Value::Object(named)) => self.parse_column_named(named)?,
                _ => return Err(CodecError::InputsNotAContainer),
            },
            (Order::Column, Format::Unnamed) => match document.get(INPUTS_KEY) {
                Some(node) => self.parse_unnamed(node, INPUTS_KEY)?,
                None => return Err(CodecError::NoInputsFound),
            },
            (Order::Row, Format::Named) => match document.get(INSTANCES_KEY) {
                Some(Value::Array(instances)) => self.parse_row_named(instances)?,
                _ => return Err(CodecError::InputsNotAContainer),
            },
            (Order::Row, Format::Unnamed) => match document.get(INSTANCES_KEY) {
                Some(node) => self.parse_unnamed(node, INSTANCES_KEY)?,
                None => return Err(CodecError::NoInputsFound),
            },
        };

        Ok(DecodedRequest {
            format,
            signature_name,
            inputs,
        })
    }

    fn declared(&self, name: &str) -> Result<&TensorSpec, CodecError> {
        self.signature.get(name).ok_or_else(|| {
            debug!(input = name, "input is not part of the model signature");
            CodecError::could_not_parse(name)
        })
    }

    // {"inputs": {"a": [...], "b": [...]}}
    fn parse_column_named(&self, named: &Map<String, Value>) -> Result<TensorMap, CodecError> {
        let mut inputs = TensorMap::new();
        for (name, node) in named {
            let spec = self.declared(name)?;
            if !node.is_array() {
                return Err(CodecError::could_not_parse(name));
            }
            let mut walker = ShapeWalker::new(spec.element_type, capacity_hint(spec, 1));
            walker.walk(node, 0).map_err(|_| CodecError::could_not_parse(name))?;
            inputs.insert(name.clone(), finish(spec, walker)?);
        }
        Ok(inputs)
    }

    // {"inputs": [...]} or {"instances": [...]} against a single input signature
    fn parse_unnamed(&self, node: &Value, container: &str) -> Result<TensorMap, CodecError> {
        let spec = self.signature.single().ok_or_else(|| {
            debug!(declared = self.signature.len(), "unnamed body needs a single input signature");
            CodecError::could_not_parse(container)
        })?;
        let mut walker = ShapeWalker::new(spec.element_type, capacity_hint(spec, 1));
        walker.walk(node, 0).map_err(|_| CodecError::could_not_parse(spec.name.as_str()))?;
        let mut inputs = TensorMap::new();
        inputs.insert(spec.name.clone(), finish(spec, walker)?);
        Ok(inputs)
    }

    // {"instances": [{"a": [...], "b": [...]}, {"a": [...], "b": [...]}]}
    fn parse_row_named(&self, instances: &[Value]) -> Result<TensorMap, CodecError> {
        let Some(Value::Object(first)) = instances.first() else {
            return Err(CodecError::NoInputsFound);
        };
        if first.is_empty() {
            return Err(CodecError::NoInputsFound);
        }
        // every instance must be an object carrying exactly the first one's inputs
        for instance in instances {
            let same_inputs = match instance {
                Value::Object(fields) => {
                    fields.len() == first.len() && first.keys().all(|name| fields.contains_key(name))
                }
                _ => false,
            };
            if !same_inputs {
                let name = first.keys().next().map_or(INSTANCES_KEY, String::as_str);
                debug!(input = name, "instances do not share the same inputs");
                return Err(CodecError::could_not_parse(name));
            }
        }

        let mut inputs = TensorMap::new();
        for name in first.keys() {
            let spec = self.declared(name)?;
            let mut walker = ShapeWalker::with_outer_dimension(
                spec.element_type,
                capacity_hint(spec, instances.len()),
                instances.len(),
            );
            for node in instances.iter().filter_map(|instance| instance.get(name)) {
                walker.walk(node, BATCH_DIM + 1).map_err(|_| CodecError::could_not_parse(name))?;
            }
            inputs.insert(name.clone(), finish(spec, walker)?);
        }
        Ok(inputs)
    }
}

/// Upper bound on elements reserved before a body has been walked
const MAX_CAPACITY_HINT: usize = 1 << 16;

/// Allocation hint for `batch` entries of the declared per-entry shape.
///
/// Capped so a large declaration never reserves memory the body does not
/// fill; an overflowing product gives no hint at all.
fn capacity_hint(spec: &TensorSpec, batch: usize) -> usize {
    spec.shape
        .iter()
        .skip(BATCH_DIM + 1)
        .try_fold(batch, |len, &dim| len.checked_mul(dim))
        .map_or(0, |len| len.min(MAX_CAPACITY_HINT))
}

/// Check the walked shape against the declaration and build the buffer
fn finish(spec: &TensorSpec, walker: ShapeWalker) -> Result<TensorBuffer, CodecError> {
    let (shape, data) = walker.finish();
    let matches_declared = shape.len() == spec.shape.len()
        && shape
            .iter()
            .zip(&spec.shape)
            .skip(BATCH_DIM + 1)
            .all(|(inferred, declared)| inferred == declared);
    if !matches_declared {
        debug!(input = %spec.name, inferred = ?shape, declared = ?spec.shape, "input shape does not match signature");
        return Err(CodecError::could_not_parse(spec.name.as_str()));
    }
    TensorBuffer::new(shape, data).map_err(|_| CodecError::could_not_parse(spec.name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;
    use proptest::prelude::*;
    use serde_json::json;
    use crate::tensor::{ElementType, NumericValue};

    fn typed_parser(inputs: &[(&str, &[usize])], element_type: ElementType) -> RequestParser {
        RequestParser::new(
            inputs
                .iter()
                .map(|(name, shape)| TensorSpec::new(*name, shape.to_vec(), element_type))
                .collect(),
        )
    }

    fn float_parser(inputs: &[(&str, &[usize])]) -> RequestParser {
        typed_parser(inputs, ElementType::F32)
    }

    const COLUMN_NAMED_BODY: &str = r#"{
        "inputs": {
            "inputA": [
                [
                    [[1.0, 2.0],
                     [3.0, 4.0],
                     [5.0, 6.0]],
                    [[7.0, 8.0],
                     [9.0, 10.0],
                     [11.0, 12.0]]
                ],
                [
                    [[101.0, 102.0],
                     [103.0, 104.0],
                     [105.0, 106.0]],
                    [[107.0, 108.0],
                     [109.0, 110.0],
                     [111.0, 112.0]]
                ]
            ],
            "inputB": [
                [
                    [1.0, 2.0, 3.0],
                    [4.0, 5.0, 6.0]
                ],
                [
                    [11.0, 12.0, 13.0],
                    [14.0, 15.0, 16.0]
                ]
            ]
        },
        "signature_name": "serving_default"
    }"#;

    #[test]
    fn test_parse_two_named_column_inputs() {
        let parser = float_parser(&[("inputA", &[2, 2, 3, 2]), ("inputB", &[2, 2, 3])]);
        let decoded = parser.parse(COLUMN_NAMED_BODY).unwrap();

        assert_eq!(decoded.format, RequestFormat::new(Order::Column, Format::Named));
        assert_eq!(decoded.signature_name.as_deref(), Some("serving_default"));
        assert_eq!(decoded.inputs.len(), 2);

        let input_a = &decoded.inputs["inputA"];
        let input_b = &decoded.inputs["inputB"];
        assert_eq!(input_a.element_type(), ElementType::F32);
        assert_eq!(input_a.shape(), &[2, 2, 3, 2]);
        assert_eq!(input_b.shape(), &[2, 2, 3]);
        assert_eq!(input_a.to_le_bytes().len(), 2 * 2 * 3 * 2 * 4);
        assert_eq!(input_a.as_slice::<f32>().unwrap(), &[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0,
            7.0, 8.0, 9.0, 10.0, 11.0, 12.0,
            101.0, 102.0, 103.0, 104.0, 105.0, 106.0,
            107.0, 108.0, 109.0, 110.0, 111.0, 112.0,
        ]);
        assert_eq!(input_b.as_slice::<f32>().unwrap(), &[
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0,
            11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        ]);
    }

    #[test]
    fn test_valid_small_shapes() {
        let cases: &[(&[usize], Value, &[f32])] = &[
            (&[1, 1], json!([[155]]), &[155.0]),
            (&[1, 2], json!([[155, 56]]), &[155.0, 56.0]),
            (&[2, 1], json!([[155], [513]]), &[155.0, 513.0]),
            (&[2, 2], json!([[155, 9], [513, -5]]), &[155.0, 9.0, 513.0, -5.0]),
            (&[2, 3, 1], json!([[[5], [9], [1]], [[-1], [-9], [25]]]), &[5.0, 9.0, 1.0, -1.0, -9.0, 25.0]),
            (&[2, 1, 2, 1], json!([[[[5], [2]]], [[[6], [18]]]]), &[5.0, 2.0, 6.0, 18.0]),
        ];
        for (shape, tensor, expected) in cases {
            let parser = float_parser(&[("i", *shape)]);
            let decoded = parser
                .parse_value(&json!({"signature_name": "", "inputs": {"i": tensor}}))
                .unwrap();
            let buffer = &decoded.inputs["i"];
            assert_eq!(buffer.shape(), *shape);
            assert_eq!(buffer.as_slice::<f32>().unwrap(), *expected);
        }
    }

    #[test]
    fn test_allows_different_batch_dimension() {
        let parser = float_parser(&[("i", &[2, 1, 2, 2]), ("j", &[1, 1, 2, 2])]);
        let decoded = parser.parse_value(&json!({"inputs": {
            "i": [[[[5, 2], [10, 7]]], [[[5, 2], [10, 7]]]],
            "j": [[[[5, 2], [10, 7]]]]
        }})).unwrap();
        assert_eq!(decoded.inputs["i"].shape(), &[2, 1, 2, 2]);
        assert_eq!(decoded.inputs["j"].shape(), &[1, 1, 2, 2]);

        // batch size is the body's choice, inner dimensions are not
        let decoded = parser.parse_value(&json!({"inputs": {
            "j": [[[[5, 2], [10, 7]]], [[[1, 1], [1, 1]]], [[[0, 0], [0, 0]]]]
        }})).unwrap();
        assert_eq!(decoded.inputs["j"].shape(), &[3, 1, 2, 2]);
    }

    #[test]
    fn test_integer_precision() {
        let parser = typed_parser(&[("i", &[1, 1, 4])], ElementType::U16);
        for body in [
            r#"{"inputs":{"i":[[[0,5,128,65535]]]}}"#,
            r#"{"inputs":{"i":[[[0.0,5.0,128.0,65535.0]]]}}"#,
        ] {
            let decoded = parser.parse(body).unwrap();
            assert_eq!(decoded.inputs["i"].as_slice::<u16>().unwrap(), &[0, 5, 128, 65535]);
        }

        let parser = typed_parser(&[("i", &[1, 1, 4])], ElementType::I8);
        for body in [
            r#"{"inputs":{"i":[[[0,-5,127,-128]]]}}"#,
            r#"{"inputs":{"i":[[[0.0,-5.0,127.0,-128.0]]]}}"#,
        ] {
            let decoded = parser.parse(body).unwrap();
            assert_eq!(decoded.inputs["i"].as_slice::<i8>().unwrap(), &[0, -5, 127, -128]);
        }

        let parser = typed_parser(&[("i", &[1, 1, 4])], ElementType::U64);
        let decoded = parser.parse(r#"{"inputs":{"i":[[[0,5,128,18446744073709551615]]]}}"#).unwrap();
        assert_eq!(decoded.inputs["i"].as_slice::<u64>().unwrap(), &[0, 5, 128, u64::MAX]);

        let parser = typed_parser(&[("i", &[1, 1, 4])], ElementType::I64);
        let decoded = parser.parse(r#"{"inputs":{"i":[[[0,-5,5522,-9223372036854775807]]]}}"#).unwrap();
        assert_eq!(decoded.inputs["i"].as_slice::<i64>().unwrap(), &[0, -5, 5522, -9223372036854775807]);
    }

    #[test]
    fn test_half_precision() {
        let parser = typed_parser(&[("i", &[1, 1, 4])], ElementType::F16);
        let decoded = parser.parse(r#"{"inputs":{"i":[[[-5, 0, -4, 0.5]]]}}"#).unwrap();
        let buffer = &decoded.inputs["i"];
        assert_eq!(buffer.element_type(), ElementType::F16);
        assert_eq!(buffer.get(0), Some(NumericValue::F16(f16::from_f32(-5.0))));
        assert_eq!(buffer.get(3), Some(NumericValue::F16(f16::from_f32(0.5))));
    }

    #[test]
    fn test_inputs_not_a_container() {
        let parser = RequestParser::new(InputSignature::default());
        assert_eq!(parser.parse(r#"{"signature_name":"","inputs":"string"}"#), Err(CodecError::InputsNotAContainer));
        assert_eq!(parser.parse(r#"{"signature_name":"","inputs":5}"#), Err(CodecError::InputsNotAContainer));
    }

    #[test]
    fn test_no_inputs_found() {
        let parser = RequestParser::new(InputSignature::default());
        assert_eq!(parser.parse(r#"{"signature_name":"","inputs":{}}"#), Err(CodecError::NoInputsFound));
        assert_eq!(parser.parse(r#"{"signature_name":""}"#), Err(CodecError::NoInputsFound));
    }

    #[test]
    fn test_body_errors() {
        let parser = float_parser(&[("i", &[1])]);
        assert!(matches!(parser.parse("{\"inputs\":"), Err(CodecError::InvalidJson(_))));
        assert_eq!(parser.parse("[1, 2]"), Err(CodecError::BodyNotAnObject));
    }

    #[test]
    fn test_cannot_parse_input() {
        let parser = float_parser(&[("i", &[2, 1])]);
        let malformed = Err(CodecError::could_not_parse("i"));
        assert_eq!(parser.parse(r#"{"inputs":{"i":2}}"#), malformed);
        assert_eq!(parser.parse(r#"{"inputs":{"i":null}}"#), malformed);
        assert_eq!(parser.parse(r#"{"inputs":{"i":[1,null]}}"#), malformed);
        assert_eq!(parser.parse(r#"{"inputs":{"i":[[1,2],[3,"str"]]}}"#), malformed);
    }

    #[test]
    fn test_unknown_input_name() {
        let parser = float_parser(&[("i", &[1, 1])]);
        assert_eq!(
            parser.parse(r#"{"inputs":{"i":[[1]],"k":[[1]]}}"#),
            Err(CodecError::could_not_parse("k"))
        );
    }

    #[test]
    fn test_ragged_and_mismatched_shapes_fail_whole_request() {
        let parser = float_parser(&[("i", &[1, 2, 3, 2]), ("j", &[1, 1])]);
        let bodies = [
            // [1, 4, 5] has three elements
            json!({"inputs": {"j": [[1]], "i": [[[[1, 2], [1, 3], [1, 4, 5]], [[5, 8], [9, 3], [1, 4]]]]}}),
            // [5, 6] is an array where a number belongs
            json!({"inputs": {"j": [[1]], "i": [[[[1, 2], [1, 3], [1, 4, [5, 6]]], [[5, 8], [9, 3], [1, 4]]]]}}),
            // [1] is too short
            json!({"inputs": {"j": [[1]], "i": [[[[1], [1, 2], [1, 3], [1, 4]], [[5, 8], [9, 3], [1, 4]]]]}}),
            // 2x2 next to 3x2
            json!({"inputs": {"j": [[1]], "i": [[[[1, 2], [1, 3]], [[5, 8], [9, 3], [1, 4]]]]}}),
            // [1, 5] on the wrong level
            json!({"inputs": {"j": [[1]], "i": [[[1, 5], [[1, 1], [1, 2], [1, 3]], [[5, 8], [9, 3], [1, 4]]]]}}),
            // rectangular, but 3x3 declared as 3x2
            json!({"inputs": {"j": [[1]], "i": [[[[1, 2, 3], [1, 3, 3], [1, 4, 3]], [[5, 8, 3], [9, 3, 3], [1, 4, 3]]]]}}),
            // rank too high
            json!({"inputs": {"j": [[1]], "i": [[[[[1, 2], [1, 3], [1, 4]], [[5, 8], [9, 3], [1, 4]]]]]}}),
        ];
        for body in bodies {
            assert_eq!(parser.parse_value(&body), Err(CodecError::could_not_parse("i")), "{body}");
        }
    }

    #[test]
    fn test_instances_differ_in_shape() {
        let parser = float_parser(&[("i", &[2, 2, 3, 2])]);
        let bodies = [
            // 2x3x2 vs 2x2x2
            json!({"inputs": {"i": [
                [[[1, 1], [1, 2], [1, 3]], [[5, 8], [9, 3], [1, 4]]],
                [[[1, 1], [1, 2]], [[5, 8], [9, 3]]]
            ]}}),
            // 2x3x2 vs 2x3x3
            json!({"inputs": {"i": [
                [[[1, 1], [1, 2], [1, 3]], [[5, 8], [9, 3], [1, 4]]],
                [[[1, 1, 3], [1, 2, 2], [1, 3, 9]], [[5, 8, 8], [9, 3, 3], [1, 4, 10]]]
            ]}}),
            // 2x3x2 vs 1x2x3x2
            json!({"inputs": {"i": [
                [[[1, 1], [1, 2], [1, 3]], [[5, 8], [9, 3], [1, 4]]],
                [[[[1, 1], [1, 2], [1, 3]], [[5, 8], [9, 3], [1, 4]]]]
            ]}}),
        ];
        for body in bodies {
            assert_eq!(parser.parse_value(&body), Err(CodecError::could_not_parse("i")));
        }
    }

    #[test]
    fn test_column_unnamed_single_input() {
        let parser = typed_parser(&[("only", &[2, 2])], ElementType::I32);
        let decoded = parser.parse(r#"{"inputs": [[1, 2], [3, 4]]}"#).unwrap();
        assert_eq!(decoded.format, RequestFormat::new(Order::Column, Format::Unnamed));
        assert_eq!(decoded.inputs["only"].as_slice::<i32>().unwrap(), &[1, 2, 3, 4]);

        let parser = float_parser(&[("a", &[1, 2]), ("b", &[1, 2])]);
        assert_eq!(
            parser.parse(r#"{"inputs": [[1, 2]]}"#),
            Err(CodecError::could_not_parse(INPUTS_KEY))
        );
    }

    #[test]
    fn test_row_named_stacks_instances() {
        let parser = typed_parser(&[("a", &[2, 3]), ("b", &[2, 1, 2])], ElementType::I32);
        let decoded = parser.parse_value(&json!({"instances": [
            {"a": [1, 2, 3], "b": [[10, 11]]},
            {"a": [4, 5, 6], "b": [[12, 13]]}
        ]})).unwrap();
        assert_eq!(decoded.format, RequestFormat::new(Order::Row, Format::Named));
        assert_eq!(decoded.inputs["a"].shape(), &[2, 3]);
        assert_eq!(decoded.inputs["a"].as_slice::<i32>().unwrap(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(decoded.inputs["b"].shape(), &[2, 1, 2]);
        assert_eq!(decoded.inputs["b"].as_slice::<i32>().unwrap(), &[10, 11, 12, 13]);
    }

    #[test]
    fn test_row_named_scalar_per_instance() {
        let parser = typed_parser(&[("a", &[3])], ElementType::U8);
        let decoded = parser.parse_value(&json!({"instances": [{"a": 1}, {"a": 2}, {"a": 3}]})).unwrap();
        assert_eq!(decoded.inputs["a"].shape(), &[3]);
        assert_eq!(decoded.inputs["a"].as_slice::<u8>().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_row_named_rejects_inconsistent_instances() {
        let parser = typed_parser(&[("a", &[2, 2]), ("b", &[2, 1])], ElementType::I32);
        let bodies = [
            // second instance lacks "b"
            json!({"instances": [{"a": [1, 2], "b": [1]}, {"a": [3, 4]}]}),
            // second instance carries an extra key
            json!({"instances": [{"a": [1, 2]}, {"a": [3, 4], "b": [1]}]}),
            // second instance is not an object
            json!({"instances": [{"a": [1, 2]}, [3, 4]]}),
            // inner shapes differ
            json!({"instances": [{"a": [1, 2]}, {"a": [3]}]}),
        ];
        for body in bodies {
            assert!(matches!(
                parser.parse_value(&body),
                Err(CodecError::CouldNotParseInput { .. })
            ), "{body}");
        }
    }

    #[test]
    fn test_row_named_empty_first_instance() {
        let parser = typed_parser(&[("a", &[2, 2])], ElementType::I32);
        assert_eq!(parser.parse_value(&json!({"instances": [{}]})), Err(CodecError::NoInputsFound));
        assert_eq!(
            parser.parse_value(&json!({"instances": [{}, {"a": [1, 2]}, 7, "x"]})),
            Err(CodecError::NoInputsFound)
        );
    }

    #[test]
    fn test_row_named_rejects_later_instances_with_other_inputs() {
        let parser = typed_parser(&[("a", &[2, 2]), ("b", &[2, 1])], ElementType::I32);
        let bodies = [
            json!({"instances": [{"a": [1, 2]}, {"b": [1]}]}),
            json!({"instances": [{"a": [1, 2]}, {"a": [3, 4]}, 7]}),
            json!({"instances": [{"a": [1, 2]}, {}]}),
        ];
        for body in bodies {
            assert_eq!(parser.parse_value(&body), Err(CodecError::could_not_parse("a")), "{body}");
        }
    }

    #[test]
    fn test_huge_declared_shape_is_rejected_not_allocated() {
        let parser = float_parser(&[("a", &[1 << 40, 1 << 30, 1 << 30])]);
        assert_eq!(
            parser.parse(r#"{"inputs": {"a": [[1.0]]}}"#),
            Err(CodecError::could_not_parse("a"))
        );
        assert_eq!(
            parser.parse(r#"{"instances": [{"a": [[1.0]]}, {"a": [[2.0]]}]}"#),
            Err(CodecError::could_not_parse("a"))
        );
    }

    #[test]
    fn test_capacity_hint() {
        let spec = TensorSpec::new("a", vec![1 << 40, 4, 3], ElementType::F32);
        // the batch dimension is ignored
        assert_eq!(capacity_hint(&spec, 1), 12);
        assert_eq!(capacity_hint(&spec, 2), 24);

        let large = TensorSpec::new("a", vec![1, 1 << 40], ElementType::F32);
        assert_eq!(capacity_hint(&large, 1), MAX_CAPACITY_HINT);

        let overflowing = TensorSpec::new("a", vec![1, usize::MAX, 2], ElementType::F32);
        assert_eq!(capacity_hint(&overflowing, 1), 0);
    }

    #[test]
    fn test_row_unnamed() {
        let parser = typed_parser(&[("x", &[2, 2])], ElementType::F32);
        let decoded = parser.parse(r#"{"instances": [[1.5, 2.5], [3.5, 4.5]]}"#).unwrap();
        assert_eq!(decoded.format, RequestFormat::new(Order::Row, Format::Unnamed));
        assert_eq!(decoded.inputs["x"].as_slice::<f32>().unwrap(), &[1.5, 2.5, 3.5, 4.5]);
        assert_eq!(decoded.signature_name, None);
    }

    fn nest(shape: &[usize], values: &[i32]) -> Value {
        match shape.split_first() {
            None => json!(values[0]),
            Some((_, inner)) => {
                let stride: usize = inner.iter().product();
                Value::Array(values.chunks(stride.max(1)).map(|chunk| nest(inner, chunk)).collect())
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_rectangular_bodies_round_trip_shape_and_order(
            shape in prop::collection::vec(1usize..4, 1..5),
            seed in any::<i32>(),
        ) {
            let len: usize = shape.iter().product();
            let values: Vec<i32> = (0..len as i32).map(|i| i.wrapping_mul(31).wrapping_add(seed)).collect();
            let parser = typed_parser(&[("t", shape.as_slice())], ElementType::I32);

            let decoded = parser.parse_value(&json!({"inputs": {"t": nest(&shape, &values)}})).unwrap();
            let buffer = &decoded.inputs["t"];
            prop_assert_eq!(buffer.shape(), shape.as_slice());
            prop_assert_eq!(buffer.as_slice::<i32>().unwrap(), values.as_slice());
        }
    }
}
