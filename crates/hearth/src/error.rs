//! # Errors
//!
//! Every failure in hearth is a value. Each concern owns a closed enum, and
//! [`StatusCode`] flattens all of them into the outcome codes a transport
//! layer reports back to its caller. Callers branch on the variant or the
//! code, never on the message text.

use thiserror::Error;

/// Failure to assemble a [`TensorBuffer`](crate::tensor::TensorBuffer) from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// The flat data does not hold `product(shape)` elements
    #[error("tensor data holds {actual} elements but shape {shape:?} requires {expected}")]
    LengthMismatch {
        /// Declared shape
        shape: Vec<usize>,
        /// Number of elements the shape requires
        expected: usize,
        /// Number of elements supplied
        actual: usize,
    },
}

/// Failures raised while decoding a request body into tensors.
///
/// A single malformed input rejects the whole request; no partial
/// output is ever returned alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The body text could not be parsed as JSON
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(String),

    /// The body parsed, but its top level is not a JSON object
    #[error("request body is not a JSON object")]
    BodyNotAnObject,

    /// The body carries both `inputs` and `instances`
    #[error("request carries both \"inputs\" and \"instances\"; format is ambiguous")]
    AmbiguousFormat,

    /// Neither `inputs` nor `instances` is present, or the one present is empty
    #[error("no inputs found in request")]
    NoInputsFound,

    /// `inputs` / `instances` is present but is neither an object nor an array
    #[error("request inputs are neither an object nor an array")]
    InputsNotAContainer,

    /// An input is not a rectangular numeric array matching its declared shape.
    ///
    /// `input` names the offending input. When the body cannot be attributed to
    /// a single declared input (an unnamed body against a multi-input signature)
    /// it names the container key instead.
    #[error("could not parse input '{input}'")]
    CouldNotParseInput {
        /// Input (or container) that failed to parse
        input: String,
    },
}

impl CodecError {
    pub(crate) fn could_not_parse(input: impl Into<String>) -> Self {
        CodecError::CouldNotParseInput { input: input.into() }
    }
}

/// Failures raised by the sequence lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// No sequence is registered under this id
    #[error("sequence {0} is missing")]
    Missing(u64),

    /// A sequence is already registered under this id
    #[error("sequence {0} already exists")]
    AlreadyExists(u64),

    /// The sequence exists but has received its end signal
    #[error("sequence {0} is terminated")]
    Terminated(u64),

    /// Starting another sequence would exceed the configured maximum
    #[error("maximum number of sequences ({0}) reached")]
    MaxSequenceNumberReached(u32),

    /// A continuation or end request arrived without a sequence id
    #[error("sequence id must be provided unless the request starts a sequence")]
    IdNotProvided,

    /// The control code is not one of none (0), start (1) or end (2)
    #[error("invalid sequence control input: {0}")]
    InvalidControlInput(u32),
}

/// The execution backend failed to run a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model execution failed: {0}")]
pub struct BackendError(pub String);

/// Configuration could not be loaded or is inconsistent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid for its schema
    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the system cannot run with
    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Any failure surfaced by the stateful request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl PipelineError {
    /// Outcome code for this failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            PipelineError::Codec(e) => StatusCode::from(e),
            PipelineError::Sequence(e) => StatusCode::from(e),
            PipelineError::Backend(_) => StatusCode::BackendFailure,
        }
    }
}

/// Outcome codes surfaced to the caller of the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    SequenceMissing,
    SequenceAlreadyExists,
    SequenceTerminated,
    SequenceMaxNumberReached,
    SequenceIdNotProvided,
    InvalidSequenceControlInput,
    InvalidJson,
    BodyNotAnObject,
    AmbiguousFormat,
    NoInputsFound,
    InputsNotAContainer,
    CouldNotParseInput,
    BackendFailure,
}

impl StatusCode {
    /// Returns `true` only for [`StatusCode::Ok`]
    pub fn is_ok(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }

    /// HTTP status a REST front end should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::SequenceMissing => 404,
            StatusCode::SequenceAlreadyExists | StatusCode::SequenceTerminated => 409,
            StatusCode::SequenceMaxNumberReached => 503,
            StatusCode::BackendFailure => 500,
            StatusCode::SequenceIdNotProvided
            | StatusCode::InvalidSequenceControlInput
            | StatusCode::InvalidJson
            | StatusCode::BodyNotAnObject
            | StatusCode::AmbiguousFormat
            | StatusCode::NoInputsFound
            | StatusCode::InputsNotAContainer
            | StatusCode::CouldNotParseInput => 400,
        }
    }
}

impl From<&CodecError> for StatusCode {
    fn from(error: &CodecError) -> Self {
        match error {
            CodecError::InvalidJson(_) => StatusCode::InvalidJson,
            CodecError::BodyNotAnObject => StatusCode::BodyNotAnObject,
            CodecError::AmbiguousFormat => StatusCode::AmbiguousFormat,
            CodecError::NoInputsFound => StatusCode::NoInputsFound,
            CodecError::InputsNotAContainer => StatusCode::InputsNotAContainer,
            CodecError::CouldNotParseInput { .. } => StatusCode::CouldNotParseInput,
        }
    }
}

impl From<&SequenceError> for StatusCode {
    fn from(error: &SequenceError) -> Self {
        match error {
            SequenceError::Missing(_) => StatusCode::SequenceMissing,
            SequenceError::AlreadyExists(_) => StatusCode::SequenceAlreadyExists,
            SequenceError::Terminated(_) => StatusCode::SequenceTerminated,
            SequenceError::MaxSequenceNumberReached(_) => StatusCode::SequenceMaxNumberReached,
            SequenceError::IdNotProvided => StatusCode::SequenceIdNotProvided,
            SequenceError::InvalidControlInput(_) => StatusCode::InvalidSequenceControlInput,
        }
    }
}

impl From<&PipelineError> for StatusCode {
    fn from(error: &PipelineError) -> Self {
        error.status_code()
    }
}

macro_rules! result_status_code {
    ($($error:ty),*) => {
        $(
            impl<T> From<&Result<T, $error>> for StatusCode {
                fn from(result: &Result<T, $error>) -> Self {
                    match result {
                        Ok(_) => StatusCode::Ok,
                        Err(e) => e.into(),
                    }
                }
            }
        )*
    };
}

result_status_code!(CodecError, SequenceError, PipelineError);
