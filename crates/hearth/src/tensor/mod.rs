//! # Tensor Data Model
//!
//! The typed tensors that flow out of the request codec and into the
//! execution backend, plus the input signature a model declares.
//!
//! - [`ElementType`] / [`NumericValue`] - the ten supported element types and a tagged cell
//! - [`TensorData`] - flat storage that is homogeneous by construction
//! - [`TensorBuffer`] - shape plus data, `len == product(shape)`, immutable
//! - [`InputSignature`] / [`TensorSpec`] - declared names, shapes and element types

mod buffer;
mod element;
mod signature;

pub mod constant;

use std::collections::BTreeMap;

pub use buffer::{TensorBuffer, TensorData};
pub use element::{Element, ElementType, NumericValue};
pub use signature::{InputSignature, TensorSpec};

/// Named tensors, ordered by name
pub type TensorMap = BTreeMap<String, TensorBuffer>;

/// The hidden state a stateful model carries between the requests of one sequence
pub type MemoryState = TensorMap;
