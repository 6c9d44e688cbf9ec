//! # Hearth
//!
//! Request ingestion for **stateful** model serving: turning JSON predict
//! bodies into typed tensors, and keeping track of the sequences whose hidden
//! state a model carries from one request to the next.
//!
//! ## Overview
//!
//! A stateful model (a streaming speech recognizer, an RNN, ...) is fed a
//! conversation one request at a time. Every request names a sequence and
//! says whether it starts, continues or ends it. Hearth validates that
//! signal against a registry of live sequences, decodes the request body,
//! and hands both the inputs and the sequence's memory state to the model.
//!
//! Key components include:
//!
//! - [`codec`]: decoding of the four JSON body layouts into [`tensor::TensorBuffer`]s
//! - [`sequence`]: the sequence registry, id generation and idle timeouts
//! - [`backend`]: the [`backend::StatefulModel`] trait a model implements
//! - [`pipeline`]: one call that runs a request end to end
//!
//! ## Assumptions
//!
//! Hearth reserves the `0th` dimension of every declared input shape as the
//! batch dimension. A request body may choose its size freely; every other
//! dimension must match the declaration.
//!
//! ## Features
//!
//! - **candle** - Enables conversion of decoded buffers into candle tensors
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use hearth::backend::{InferenceOutput, StatefulModel};
//! use hearth::error::BackendError;
//! use hearth::pipeline::{PredictRequest, StatefulPipeline};
//! use hearth::tensor::{InputSignature, MemoryState, TensorMap};
//! use hearth::config::StatefulConfig;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl StatefulModel for Echo {
//!     async fn infer(&self, inputs: &TensorMap, _state: &MemoryState) -> Result<InferenceOutput, BackendError> {
//!         Ok(InferenceOutput { outputs: inputs.clone(), memory_state: inputs.clone() })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let signature = InputSignature::from_json(
//!     r#"{"inputs": [{"name": "audio", "shape": [1, 4], "datatype": "FP32"}]}"#
//! ).unwrap();
//! let pipeline = StatefulPipeline::from_config(signature, &StatefulConfig::default(), Arc::new(Echo));
//!
//! let body = r#"{"inputs": {"audio": [[0.1, 0.2, 0.3, 0.4]]}}"#;
//! let first = pipeline.predict(&PredictRequest::start(body)).await.unwrap();
//! let last = pipeline.predict(&PredictRequest::end(first.sequence_id, body)).await.unwrap();
//!
//! assert_eq!(first.sequence_id, last.sequence_id);
//! assert!(!pipeline.manager().sequence_exists(last.sequence_id));
//! # }
//! ```

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sequence;
pub mod tensor;

/// Constants for client reference
pub use tensor::constant;
