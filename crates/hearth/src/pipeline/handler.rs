use std::sync::Arc;
use tracing::{debug, warn};
use crate::backend::StatefulModel;
use crate::codec::RequestParser;
use crate::config::StatefulConfig;
use crate::error::{PipelineError, SequenceError};
use crate::sequence::{ControlInput, SequenceManager, SequenceProcessingSpec};
use crate::tensor::InputSignature;
use super::request::{PredictRequest, PredictResponse};

/// Runs predict calls for one stateful model.
///
/// Each call decodes the body, moves the sequence through its lifecycle,
/// runs the model against the sequence's memory state and stores the state
/// the model returns. The pipeline is `Send + Sync` and is meant to be shared
/// behind an [`Arc`] by every request handler of a server.
///
/// A sequence is expected to receive its requests one at a time. Two
/// concurrent requests for the same sequence both see the same starting
/// state, and the one finishing last decides the stored state.
pub struct StatefulPipeline<M: StatefulModel> {
    parser: RequestParser,
    manager: Arc<SequenceManager>,
    model: Arc<M>,
}

impl<M: StatefulModel> StatefulPipeline<M> {
    pub fn new(signature: InputSignature, manager: Arc<SequenceManager>, model: Arc<M>) -> Self {
        Self {
            parser: RequestParser::new(signature),
            manager,
            model,
        }
    }

    /// A pipeline with its own manager built from `config`
    pub fn from_config(signature: InputSignature, config: &StatefulConfig, model: Arc<M>) -> Self {
        Self::new(signature, Arc::new(SequenceManager::from_config(config)), model)
    }

    pub fn parser(&self) -> &RequestParser {
        &self.parser
    }

    /// The manager, for sharing with a [`SequenceSweeper`](crate::sequence::SequenceSweeper)
    pub fn manager(&self) -> &Arc<SequenceManager> {
        &self.manager
    }

    /// Handle one predict call.
    ///
    /// Nothing is registered when the control input, the sequence id or the
    /// body is rejected. When the model fails on a start or an end, the
    /// sequence is dropped; on a continuation its state is left as it was.
    /// An end removes the sequence once the model has run.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidControlInput`] for an unknown control code
    /// - [`SequenceError::IdNotProvided`] for a continuation or end with id `0`
    /// - any [`CodecError`](crate::error::CodecError) raised by the body
    /// - any [`SequenceError`] raised by admission
    /// - [`PipelineError::Backend`] when the model fails
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, PipelineError> {
        let mut spec = SequenceProcessingSpec::from_codes(request.sequence_control_input, request.sequence_id)?;
        if spec.control() != ControlInput::Start && spec.needs_id() {
            return Err(SequenceError::IdNotProvided.into());
        }

        let decoded = self.parser.parse(&request.body)?;
        let state = self.manager.admit(&mut spec)?;
        let sequence_id = spec.sequence_id();
        debug!(sequence_id, control = ?spec.control(), inputs = decoded.inputs.len(), "admitted request");

        let output = match self.model.infer(&decoded.inputs, &state).await {
            Ok(output) => output,
            Err(e) => {
                warn!(sequence_id, error = %e, "model execution failed");
                if spec.control() != ControlInput::NoControl {
                    let _ = self.manager.remove_sequence(sequence_id);
                }
                return Err(e.into());
            }
        };

        match spec.control() {
            ControlInput::End => {
                // a sweep may already have removed it
                let _ = self.manager.remove_sequence(sequence_id);
            }
            ControlInput::Start | ControlInput::NoControl => {
                self.manager.update_memory_state(sequence_id, output.memory_state)?;
            }
        }

        Ok(PredictResponse {
            sequence_id,
            outputs: output.outputs,
        })
    }
}
