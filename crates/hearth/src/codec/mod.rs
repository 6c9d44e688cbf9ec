//! # Request Codec
//!
//! Turns a JSON request body into typed tensors for a model's
//! [`InputSignature`](crate::tensor::InputSignature).
//!
//! ## Layouts
//!
//! Four body layouts are accepted, classified by [`RequestFormat::detect`]:
//!
//! - column / named: `{"inputs": {"a": [[..]], "b": [[..]]}}`
//! - column / unnamed: `{"inputs": [[..]]}`
//! - row / named: `{"instances": [{"a": [..], "b": [..]}, ..]}`
//! - row / unnamed: `{"instances": [[..], ..]}`
//!
//! Unnamed layouts require a signature with exactly one input. Row layouts
//! stack instances along the batch dimension.
//!
//! ## Shapes
//!
//! Every input must be a rectangular nested array of numbers. The inferred
//! shape must have the declared rank and must match every declared dimension
//! except the `0th` (batch) dimension, which is free.
//!
//! ## Failure
//!
//! Decoding is all or nothing: the first malformed input rejects the request
//! with a [`CodecError`](crate::error::CodecError) and no tensors are returned.

mod format;
mod parser;
mod walker;

pub use format::{Format, Order, RequestFormat};
pub use parser::{DecodedRequest, RequestParser};
