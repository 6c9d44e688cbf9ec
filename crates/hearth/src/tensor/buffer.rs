use std::fmt;
use half::f16;
use serde_json::Number;
use crate::error::TensorError;
use super::element::{Element, ElementType, NumericValue};

/// Runs `$body` against the typed vector inside a [`TensorData`], whatever its variant.
macro_rules! with_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            TensorData::I8($values) => $body,
            TensorData::I16($values) => $body,
            TensorData::I32($values) => $body,
            TensorData::I64($values) => $body,
            TensorData::U8($values) => $body,
            TensorData::U16($values) => $body,
            TensorData::U32($values) => $body,
            TensorData::U64($values) => $body,
            TensorData::F32($values) => $body,
            TensorData::F16($values) => $body,
        }
    };
}

/// Flat, homogeneous, row-major tensor storage.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F16(Vec<f16>),
}

impl TensorData {
    /// Empty storage of the given type with room for `capacity` elements
    pub fn with_capacity(element_type: ElementType, capacity: usize) -> Self {
        match element_type {
            ElementType::I8 => TensorData::I8(Vec::with_capacity(capacity)),
            ElementType::I16 => TensorData::I16(Vec::with_capacity(capacity)),
            ElementType::I32 => TensorData::I32(Vec::with_capacity(capacity)),
            ElementType::I64 => TensorData::I64(Vec::with_capacity(capacity)),
            ElementType::U8 => TensorData::U8(Vec::with_capacity(capacity)),
            ElementType::U16 => TensorData::U16(Vec::with_capacity(capacity)),
            ElementType::U32 => TensorData::U32(Vec::with_capacity(capacity)),
            ElementType::U64 => TensorData::U64(Vec::with_capacity(capacity)),
            ElementType::F32 => TensorData::F32(Vec::with_capacity(capacity)),
            ElementType::F16 => TensorData::F16(Vec::with_capacity(capacity)),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            TensorData::I8(_) => ElementType::I8,
            TensorData::I16(_) => ElementType::I16,
            TensorData::I32(_) => ElementType::I32,
            TensorData::I64(_) => ElementType::I64,
            TensorData::U8(_) => ElementType::U8,
            TensorData::U16(_) => ElementType::U16,
            TensorData::U32(_) => ElementType::U32,
            TensorData::U64(_) => ElementType::U64,
            TensorData::F32(_) => ElementType::F32,
            TensorData::F16(_) => ElementType::F16,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at flat index `index`
    pub fn get(&self, index: usize) -> Option<NumericValue> {
        with_values!(self, values => values.get(index).map(|v| v.into_value()))
    }

    /// Append a JSON literal, converted to this storage's type
    pub(crate) fn push_number(&mut self, number: &Number) {
        with_values!(self, values => values.push(Element::from_json_number(number)))
    }

    /// Little-endian bytes of every element in order
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len() * self.element_type().size_in_bytes());
        with_values!(self, values => {
            for value in values {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        });
        bytes
    }
}

/// A shaped, typed tensor as handed to the execution backend.
///
/// The flat data always holds exactly `product(shape)` elements in row-major
/// order (last dimension varies fastest). A buffer cannot be mutated once
/// built; producing a different tensor means building a new buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorBuffer {
    shape: Vec<usize>,
    data: TensorData,
}

impl TensorBuffer {
    /// Build a buffer, checking the data length against the shape.
    ///
    /// # Errors
    ///
    /// [`TensorError::LengthMismatch`] when `data.len() != product(shape)`
    pub fn new(shape: Vec<usize>, data: TensorData) -> Result<Self, TensorError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TensorError::LengthMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build a buffer from a typed vector
    pub fn from_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> Result<Self, TensorError> {
        Self::new(shape, T::wrap(values))
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// Number of elements, i.e. `product(shape)`
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The element at flat (row-major) index `index`
    pub fn get(&self, index: usize) -> Option<NumericValue> {
        self.data.get(index)
    }

    /// Iterate all elements in row-major order
    pub fn values(&self) -> impl Iterator<Item = NumericValue> + '_ {
        (0..self.len()).filter_map(move |index| self.data.get(index))
    }

    /// Borrow the data as a slice of `T`, if `T` is the element type
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Contiguous little-endian content, `len() * element_type().size_in_bytes()` bytes
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.to_le_bytes()
    }

    pub fn into_parts(self) -> (Vec<usize>, TensorData) {
        (self.shape, self.data)
    }
}

impl fmt::Display for TensorBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TensorBuffer({}, {:?})", self.element_type(), self.shape)
    }
}
