use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use super::element::ElementType;

/// Declared name, shape and element type of one model input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TensorSpec {
    pub name: String,
    pub shape: Vec<usize>,
    #[serde(rename = "datatype")]
    pub element_type: ElementType,
}

impl TensorSpec {
    pub fn new(name: impl Into<String>, shape: Vec<usize>, element_type: ElementType) -> Self {
        Self {
            name: name.into(),
            shape,
            element_type,
        }
    }
}

#[derive(Deserialize)]
struct SignatureDefinition {
    inputs: Vec<TensorSpec>,
}

impl From<SignatureDefinition> for InputSignature {
    fn from(definition: SignatureDefinition) -> Self {
        InputSignature::new(definition.inputs)
    }
}

/// The set of inputs a model declares, keyed and ordered by name.
///
/// Deserializes from `{"inputs": [{"name": "a", "shape": [1, 10], "datatype": "FP32"}]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "SignatureDefinition")]
pub struct InputSignature {
    inputs: BTreeMap<String, TensorSpec>,
}

impl InputSignature {
    /// Later specs replace earlier ones with the same name
    pub fn new(specs: impl IntoIterator<Item = TensorSpec>) -> Self {
        let inputs = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), spec))
            .collect();
        Self { inputs }
    }

    /// Load a signature from its JSON form
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The declaration of input `name`, if the model has one
    ///
    /// ```
    /// use hearth::tensor::{ElementType, InputSignature};
    ///
    /// let signature = InputSignature::from_json(
    ///     r#"{"inputs": [{"name": "h", "shape": [1, 8], "datatype": "FP16"}]}"#
    /// ).unwrap();
    /// assert_eq!(signature.len(), 1);
    /// assert_eq!(signature.get("h").map(|spec| spec.element_type), Some(ElementType::F16));
    /// assert!(signature.get("c").is_none());
    /// assert_eq!(signature.iter().count(), 1);
    /// ```
    pub fn get(&self, name: &str) -> Option<&TensorSpec> {
        self.inputs.get(name)
    }

    /// Number of declared inputs
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the model declares no inputs at all
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// The only declared input, when there is exactly one
    pub fn single(&self) -> Option<&TensorSpec> {
        match self.inputs.len() {
            1 => self.inputs.values().next(),
            _ => None,
        }
    }

    /// Iterate the declarations in name order
    pub fn iter(&self) -> impl Iterator<Item = &TensorSpec> {
        self.inputs.values()
    }
}

impl FromIterator<TensorSpec> for InputSignature {
    fn from_iter<I: IntoIterator<Item = TensorSpec>>(iter: I) -> Self {
        InputSignature::new(iter)
    }
}
