//! # Execution Backend
//!
//! The boundary between request ingestion and the model that actually runs.
//! Ingestion hands a model the decoded inputs plus the sequence's current
//! memory state and stores whatever state it returns.
//!
//! ## Feature Flags
//!
//! - `candle`: adds [`TensorBuffer::to_candle`](crate::tensor::TensorBuffer) for
//!   models built on the Candle tensor library

mod core_trait;

#[cfg_attr(docsrs, doc(cfg(feature = "candle")))]
#[cfg(feature = "candle")]
/// Conversion of decoded buffers into Candle tensors.
///
/// This module is only available when the `candle` feature flag is enabled.
pub mod candle;

#[cfg(test)]
/// Mock models for testing
///
/// Only compiled in test builds.
pub(crate) mod mock_model;

pub use core_trait::{InferenceOutput, StatefulModel};
