use crate::sequence::ControlInput;
use crate::tensor::constant::UNASSIGNED_SEQUENCE_ID;
use crate::tensor::TensorMap;

/// One predict call as it arrives from a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest {
    /// JSON request body
    pub body: String,

    /// Raw control code: `0` none, `1` start, `2` end
    pub sequence_control_input: u32,

    /// `0` asks for a generated id on start
    pub sequence_id: u64,
}

impl PredictRequest {
    pub fn new(body: impl Into<String>, sequence_control_input: u32, sequence_id: u64) -> Self {
        Self {
            body: body.into(),
            sequence_control_input,
            sequence_id,
        }
    }

    /// Start a sequence under a generated id
    pub fn start(body: impl Into<String>) -> Self {
        Self::new(body, ControlInput::Start as u32, UNASSIGNED_SEQUENCE_ID)
    }

    /// Continue sequence `sequence_id`
    pub fn next(sequence_id: u64, body: impl Into<String>) -> Self {
        Self::new(body, ControlInput::NoControl as u32, sequence_id)
    }

    /// Finish sequence `sequence_id` with one last request
    pub fn end(sequence_id: u64, body: impl Into<String>) -> Self {
        Self::new(body, ControlInput::End as u32, sequence_id)
    }
}

/// The reply to a successful predict call.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictResponse {
    /// The sequence the request belonged to; the generated id after a start with id `0`
    pub sequence_id: u64,

    /// Tensors produced by the model
    pub outputs: TensorMap,
}
