//! # Stateful Request Pipeline
//!
//! Ties the request codec, the sequence manager and a [`StatefulModel`](crate::backend::StatefulModel)
//! together into a single predict call.
//!
//! ## Flow
//!
//! 1. Validate the control code and sequence id
//! 2. Decode the body against the model's input signature
//! 3. Admit the request: enforce the sequence limit on start, apply the
//!    lifecycle transition, snapshot the memory state
//! 4. Run the model
//! 5. Store the returned state, or drop the sequence on end
//!
//! Transports (HTTP, gRPC) sit outside this crate and map
//! [`PipelineError::status_code`](crate::error::PipelineError::status_code) onto their own
//! status reporting.

mod handler;
mod request;

pub use handler::StatefulPipeline;
pub use request::{PredictRequest, PredictResponse};
