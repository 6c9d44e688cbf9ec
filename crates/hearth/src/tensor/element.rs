use std::fmt;
use std::fmt::Debug;
use half::f16;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use super::buffer::TensorData;

/// The element types a declared model input may carry.
///
/// Names follow the serving convention used in model signatures
/// (`"FP32"`, `"I8"`, ...), both when deserialized and when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    #[serde(rename = "FP32", alias = "F32")]
    F32,
    #[serde(rename = "FP16", alias = "F16")]
    F16,
}

impl ElementType {
    /// Width of one element in bytes
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 | ElementType::F16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::I64 | ElementType::U64 => 8,
        }
    }

    /// Whether this is one of the floating point types
    pub fn is_float(&self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F16)
    }

    fn name(&self) -> &'static str {
        match self {
            ElementType::I8 => "I8",
            ElementType::I16 => "I16",
            ElementType::I32 => "I32",
            ElementType::I64 => "I64",
            ElementType::U8 => "U8",
            ElementType::U16 => "U16",
            ElementType::U32 => "U32",
            ElementType::U64 => "U64",
            ElementType::F32 => "FP32",
            ElementType::F16 => "FP16",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single typed tensor cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F16(f16),
}

impl NumericValue {
    /// The tag of this value
    pub fn element_type(&self) -> ElementType {
        match self {
            NumericValue::I8(_) => ElementType::I8,
            NumericValue::I16(_) => ElementType::I16,
            NumericValue::I32(_) => ElementType::I32,
            NumericValue::I64(_) => ElementType::I64,
            NumericValue::U8(_) => ElementType::U8,
            NumericValue::U16(_) => ElementType::U16,
            NumericValue::U32(_) => ElementType::U32,
            NumericValue::U64(_) => ElementType::U64,
            NumericValue::F32(_) => ElementType::F32,
            NumericValue::F16(_) => ElementType::F16,
        }
    }

    /// Widen to `f64`. Exact for every type except 64-bit integers above 2^53.
    pub fn to_f64(&self) -> f64 {
        match *self {
            NumericValue::I8(v) => f64::from(v),
            NumericValue::I16(v) => f64::from(v),
            NumericValue::I32(v) => f64::from(v),
            NumericValue::I64(v) => v as f64,
            NumericValue::U8(v) => f64::from(v),
            NumericValue::U16(v) => f64::from(v),
            NumericValue::U32(v) => f64::from(v),
            NumericValue::U64(v) => v as f64,
            NumericValue::F32(v) => f64::from(v),
            NumericValue::F16(v) => v.to_f64(),
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::I8(v) => write!(f, "{v}"),
            NumericValue::I16(v) => write!(f, "{v}"),
            NumericValue::I32(v) => write!(f, "{v}"),
            NumericValue::I64(v) => write!(f, "{v}"),
            NumericValue::U8(v) => write!(f, "{v}"),
            NumericValue::U16(v) => write!(f, "{v}"),
            NumericValue::U32(v) => write!(f, "{v}"),
            NumericValue::U64(v) => write!(f, "{v}"),
            NumericValue::F32(v) => write!(f, "{v}"),
            NumericValue::F16(v) => write!(f, "{v}"),
        }
    }
}

/// A Rust scalar type that can back a tensor.
///
/// Implemented for exactly the ten element types of [`ElementType`]. The
/// conversion from a JSON literal is fixed:
///
/// - integer literal into an integer type: `as` cast, wrapping to the target width
/// - floating literal into an integer type: `as` cast, truncating toward zero and
///   saturating at the type's bounds (NaN becomes 0)
/// - any literal into a floating type: nearest representable value
///
/// Every literal that lies inside the target's range converts exactly.
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// The tag matching this type
    const ELEMENT_TYPE: ElementType;

    /// Convert a JSON number literal into this type
    fn from_json_number(number: &Number) -> Self;

    /// Tag this value
    fn into_value(self) -> NumericValue;

    /// Borrow the flat storage if it holds this type
    fn slice(data: &TensorData) -> Option<&[Self]>;

    /// Wrap a flat vector of this type
    fn wrap(values: Vec<Self>) -> TensorData;
}

macro_rules! primitive_element {
    ($ty:ty, $variant:ident) => {
        impl Element for $ty {
            const ELEMENT_TYPE: ElementType = ElementType::$variant;

            #[inline]
            fn from_json_number(number: &Number) -> Self {
                if let Some(v) = number.as_i64() {
                    v as $ty
                } else if let Some(v) = number.as_u64() {
                    v as $ty
                } else {
                    number.as_f64().map_or(0 as $ty, |v| v as $ty)
                }
            }

            #[inline]
            fn into_value(self) -> NumericValue {
                NumericValue::$variant(self)
            }

            fn slice(data: &TensorData) -> Option<&[Self]> {
                match data {
                    TensorData::$variant(values) => Some(values),
                    _ => None,
                }
            }

            fn wrap(values: Vec<Self>) -> TensorData {
                TensorData::$variant(values)
            }
        }
    };
}

primitive_element!(i8, I8);
primitive_element!(i16, I16);
primitive_element!(i32, I32);
primitive_element!(i64, I64);
primitive_element!(u8, U8);
primitive_element!(u16, U16);
primitive_element!(u32, U32);
primitive_element!(u64, U64);
primitive_element!(f32, F32);

impl Element for f16 {
    const ELEMENT_TYPE: ElementType = ElementType::F16;

    #[inline]
    fn from_json_number(number: &Number) -> Self {
        if let Some(v) = number.as_i64() {
            f16::from_f64(v as f64)
        } else if let Some(v) = number.as_u64() {
            f16::from_f64(v as f64)
        } else {
            number.as_f64().map_or(f16::ZERO, f16::from_f64)
        }
    }

    #[inline]
    fn into_value(self) -> NumericValue {
        NumericValue::F16(self)
    }

    fn slice(data: &TensorData) -> Option<&[Self]> {
        match data {
            TensorData::F16(values) => Some(values),
            _ => None,
        }
    }

    fn wrap(values: Vec<Self>) -> TensorData {
        TensorData::F16(values)
    }
}
